//! Test-only helpers: scripted nodes and a recording listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use anyhow::{Result, bail};

use crate::core::descriptor::Descriptor;
use crate::core::listener::ExecutionListener;
use crate::core::node::{DynamicRegistrar, Node};
use crate::core::outcome::{ExecutionOutcome, SkipResult};
use crate::tree::ScriptPhase;

/// Listener event with descriptors reduced to their ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Dynamic(String),
    Started(String),
    Skipped(String, String),
    /// Failure messages, primary first; empty when successful.
    Finished(String, Vec<String>),
}

impl Event {
    pub fn succeeded(id: &str) -> Self {
        Event::Finished(id.to_string(), Vec::new())
    }

    pub fn failed(id: &str, messages: &[&str]) -> Self {
        Event::Finished(
            id.to_string(),
            messages.iter().map(|message| message.to_string()).collect(),
        )
    }
}

/// Listener that records every event in order.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Vec<Event>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl<C: Clone> ExecutionListener<C> for RecordingListener {
    fn dynamic_test_registered(&mut self, descriptor: &Descriptor<C>) {
        self.events.push(Event::Dynamic(descriptor.id().to_string()));
    }

    fn execution_started(&mut self, descriptor: &Descriptor<C>) {
        self.events.push(Event::Started(descriptor.id().to_string()));
    }

    fn execution_skipped(&mut self, descriptor: &Descriptor<C>, reason: &str) {
        self.events
            .push(Event::Skipped(descriptor.id().to_string(), reason.to_string()));
    }

    fn execution_finished(&mut self, descriptor: &Descriptor<C>, outcome: &ExecutionOutcome) {
        let messages = outcome
            .primary()
            .into_iter()
            .chain(outcome.suppressed())
            .map(|failure| failure.error.to_string())
            .collect();
        self.events
            .push(Event::Finished(descriptor.id().to_string(), messages));
    }
}

/// Context used by scripted nodes: a trail of the phases that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestContext(String);

impl TestContext {
    pub fn root() -> Self {
        Self::default()
    }

    fn extended(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared log of `"<name>:<step>"` entries, in call order.
pub type Calls = Rc<RefCell<Vec<String>>>;

type DynamicFactory = Box<dyn Fn() -> Vec<Descriptor<TestContext>>>;

/// Node whose phases log their calls and fail, panic, or skip on request.
///
/// `prepare` appends `/<name>` to the context; `before` and `execute` append
/// `+before` and `+execute`.
pub struct ScriptedNode {
    name: String,
    calls: Calls,
    failing: Vec<ScriptPhase>,
    panicking: Vec<ScriptPhase>,
    skip: Option<Option<String>>,
    dynamic: Option<DynamicFactory>,
    record_context: bool,
}

impl ScriptedNode {
    pub fn new(name: &str) -> (Self, Calls) {
        Self::with_calls(name, Calls::default())
    }

    /// Node logging into an existing call log, for checking order across nodes.
    pub fn with_calls(name: &str, calls: Calls) -> (Self, Calls) {
        let node = Self {
            name: name.to_string(),
            calls: Rc::clone(&calls),
            failing: Vec::new(),
            panicking: Vec::new(),
            skip: None,
            dynamic: None,
            record_context: false,
        };
        (node, calls)
    }

    pub fn failing(mut self, step: ScriptPhase) -> Self {
        self.failing.push(step);
        self
    }

    pub fn panicking(mut self, step: ScriptPhase) -> Self {
        self.panicking.push(step);
        self
    }

    pub fn skipped(mut self, reason: Option<&str>) -> Self {
        self.skip = Some(reason.map(str::to_string));
        self
    }

    /// Register the descriptors built by `factory` during `execute`.
    pub fn registering(
        mut self,
        factory: impl Fn() -> Vec<Descriptor<TestContext>> + 'static,
    ) -> Self {
        self.dynamic = Some(Box::new(factory));
        self
    }

    /// Log the received context with every step after `prepare`.
    pub fn recording_context(mut self) -> Self {
        self.record_context = true;
        self
    }

    fn enter(&self, step: ScriptPhase, context: Option<&TestContext>) -> Result<()> {
        let entry = match context {
            Some(context) if self.record_context => format!("{}:{}@{}", self.name, step, context),
            _ => format!("{}:{}", self.name, step),
        };
        self.calls.borrow_mut().push(entry);
        if self.panicking.contains(&step) {
            panic!("{} {} panicked", self.name, step);
        }
        if self.failing.contains(&step) {
            bail!("{} {} failed", self.name, step);
        }
        Ok(())
    }
}

impl Node<TestContext> for ScriptedNode {
    fn prepare(&self, parent: &TestContext) -> Result<TestContext> {
        self.enter(ScriptPhase::Prepare, None)?;
        Ok(parent.extended(&format!("/{}", self.name)))
    }

    fn should_be_skipped(&self, context: &TestContext) -> Result<SkipResult> {
        self.enter(ScriptPhase::SkipCheck, Some(context))?;
        Ok(match &self.skip {
            None => SkipResult::do_not_skip(),
            Some(Some(reason)) => SkipResult::skip(reason.clone()),
            Some(None) => SkipResult::skip_silently(),
        })
    }

    fn before(&self, context: &TestContext) -> Result<TestContext> {
        self.enter(ScriptPhase::Before, Some(context))?;
        Ok(context.extended("+before"))
    }

    fn execute(
        &self,
        context: &TestContext,
        dynamic: &mut dyn DynamicRegistrar<TestContext>,
    ) -> Result<TestContext> {
        self.enter(ScriptPhase::Execute, Some(context))?;
        if let Some(factory) = &self.dynamic {
            for descriptor in factory() {
                dynamic.register(descriptor);
            }
        }
        Ok(context.extended("+execute"))
    }

    fn after(&self, context: &TestContext) -> Result<()> {
        self.enter(ScriptPhase::After, Some(context))
    }

    fn clean_up(&self, context: &TestContext) -> Result<()> {
        self.enter(ScriptPhase::CleanUp, Some(context))
    }
}

/// Descriptor named `id` bound to `node`.
pub fn scripted(id: &str, node: ScriptedNode) -> Descriptor<TestContext> {
    Descriptor::new(id, id).with_node(node)
}

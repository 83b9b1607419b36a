//! Binds suite-file nodes to the node lifecycle.
//!
//! A [`ScriptNode`] does no real work: each phase succeeds unless the suite file
//! lists it under `fail` or `panic`. This lets suite files describe the exact
//! failure shapes a run should produce.

use anyhow::{Result, bail};
use regex::Regex;
use tracing::debug;

use crate::core::descriptor::Descriptor;
use crate::core::node::{DynamicRegistrar, Node};
use crate::core::outcome::SkipResult;
use crate::tree::{ScriptPhase, SuiteNode};

/// Context threaded through a scripted run.
#[derive(Debug, Clone, Default)]
pub struct ScriptContext {
    /// Ids from the root down to the node owning this context.
    pub path: Vec<String>,
    skip_pattern: Option<Regex>,
}

impl ScriptContext {
    pub fn new(skip_pattern: Option<Regex>) -> Self {
        Self {
            path: Vec::new(),
            skip_pattern,
        }
    }
}

/// Scripted behavior for one suite node.
#[derive(Debug, Clone)]
pub struct ScriptNode {
    id: String,
    skip: Option<String>,
    fail: Vec<ScriptPhase>,
    panic: Vec<ScriptPhase>,
    dynamic: Vec<SuiteNode>,
}

impl ScriptNode {
    pub fn from_suite(node: &SuiteNode) -> Self {
        Self {
            id: node.id.clone(),
            skip: node.skip.clone(),
            fail: node.fail.clone(),
            panic: node.panic.clone(),
            dynamic: node.dynamic.clone(),
        }
    }

    fn enter(&self, phase: ScriptPhase) -> Result<()> {
        debug!(id = %self.id, %phase, "scripted phase");
        if self.panic.contains(&phase) {
            panic!("scripted {phase} panic in '{}'", self.id);
        }
        if self.fail.contains(&phase) {
            bail!("scripted {phase} failure in '{}'", self.id);
        }
        Ok(())
    }
}

impl Node<ScriptContext> for ScriptNode {
    fn prepare(&self, parent: &ScriptContext) -> Result<ScriptContext> {
        self.enter(ScriptPhase::Prepare)?;
        let mut context = parent.clone();
        context.path.push(self.id.clone());
        Ok(context)
    }

    fn should_be_skipped(&self, context: &ScriptContext) -> Result<SkipResult> {
        self.enter(ScriptPhase::SkipCheck)?;
        if let Some(reason) = &self.skip {
            if reason.is_empty() {
                return Ok(SkipResult::skip_silently());
            }
            return Ok(SkipResult::skip(reason.clone()));
        }
        let matched = context
            .skip_pattern
            .as_ref()
            .filter(|pattern| pattern.is_match(&self.id));
        if let Some(pattern) = matched {
            return Ok(SkipResult::skip(format!(
                "id matches skip pattern '{}'",
                pattern.as_str()
            )));
        }
        Ok(SkipResult::do_not_skip())
    }

    fn before(&self, context: &ScriptContext) -> Result<ScriptContext> {
        self.enter(ScriptPhase::Before)?;
        Ok(context.clone())
    }

    fn execute(
        &self,
        context: &ScriptContext,
        dynamic: &mut dyn DynamicRegistrar<ScriptContext>,
    ) -> Result<ScriptContext> {
        self.enter(ScriptPhase::Execute)?;
        for node in &self.dynamic {
            dynamic.register(build_descriptor(node));
        }
        Ok(context.clone())
    }

    fn after(&self, _context: &ScriptContext) -> Result<()> {
        self.enter(ScriptPhase::After)
    }

    fn clean_up(&self, _context: &ScriptContext) -> Result<()> {
        self.enter(ScriptPhase::CleanUp)
    }
}

/// Build the descriptor tree for `node`. Dynamic nodes are left to registration.
pub fn build_descriptor(node: &SuiteNode) -> Descriptor<ScriptContext> {
    Descriptor::new(node.id.as_str(), node.title.as_str())
        .with_node(ScriptNode::from_suite(node))
        .with_children(node.children.iter().map(build_descriptor))
}

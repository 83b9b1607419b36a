//! Recursive execution of one descriptor and its subtree.
//!
//! Each descriptor goes through the same sequence:
//!
//! 1. `prepare` (failure ends the descriptor, no `execution_started` yet)
//! 2. `should_be_skipped`, only if nothing failed
//! 3. if not skipped: `execution_started`, then `before` / `execute` / static children
//!    as one unit, then `after` as a second unit
//! 4. `clean_up` whenever `prepare` produced a context
//! 5. report: `execution_skipped`, or `execution_finished` with every failure merged
//!
//! Failures never escape a descriptor; siblings and ancestors keep running. Listener
//! panics are the exception and unwind through every ancestor.

use tracing::{debug, instrument, warn};

use crate::core::collector::FailureCollector;
use crate::core::descriptor::Descriptor;
use crate::core::listener::{ExecutionListener, UNKNOWN_SKIP_REASON, notify};
use crate::core::node::{DynamicRegistrar, Node};
use crate::core::outcome::{Phase, SkipResult};
use crate::core::tracker::ExecutionTracker;

/// Drives a single descriptor through its lifecycle.
pub struct NodeExecutor<'d, C: Clone> {
    descriptor: &'d Descriptor<C>,
    collector: FailureCollector,
    skip_result: SkipResult,
    started: bool,
}

impl<'d, C: Clone> NodeExecutor<'d, C> {
    pub fn new(descriptor: &'d Descriptor<C>) -> Self {
        Self {
            descriptor,
            collector: FailureCollector::new(),
            skip_result: SkipResult::do_not_skip(),
            started: false,
        }
    }

    /// Execute the descriptor's subtree with `parent_context`.
    ///
    /// Does nothing if the tracker already holds this descriptor's id.
    #[instrument(name = "node", skip_all, fields(id = %self.descriptor.id()))]
    pub fn execute(
        mut self,
        parent_context: &C,
        tracker: &mut ExecutionTracker,
        listener: &mut dyn ExecutionListener<C>,
    ) {
        if !tracker.mark_executed(self.descriptor.id()) {
            warn!("descriptor already executed in this run, ignoring");
            return;
        }
        let node = self.descriptor.node();

        if let Some(context) = self
            .collector
            .execute(Phase::Prepare, || node.prepare(parent_context))
        {
            let context = self.run_prepared(node, context, tracker, listener);
            self.collector
                .execute(Phase::CleanUp, || node.clean_up(&context));
        }

        self.report_done(listener);
    }

    /// Skip check plus, when not skipped, the run phase. Returns the latest context.
    fn run_prepared(
        &mut self,
        node: &dyn Node<C>,
        context: C,
        tracker: &mut ExecutionTracker,
        listener: &mut dyn ExecutionListener<C>,
    ) -> C {
        if let Some(skip_result) = self
            .collector
            .execute(Phase::SkipCheck, || node.should_be_skipped(&context))
        {
            self.skip_result = skip_result;
        }
        if !self.collector.is_empty() || self.skip_result.is_skipped() {
            debug!(skipped = self.skip_result.is_skipped(), "not running");
            return context;
        }
        self.execute_recursively(node, context, tracker, listener)
    }

    fn execute_recursively(
        &mut self,
        node: &dyn Node<C>,
        mut context: C,
        tracker: &mut ExecutionTracker,
        listener: &mut dyn ExecutionListener<C>,
    ) -> C {
        let descriptor = self.descriptor;
        notify(|| listener.execution_started(descriptor));
        self.started = true;

        self.collector.execute(Phase::Run, || {
            context = node.before(&context)?;

            let mut registrar = DynamicTestExecutor {
                context: &context,
                tracker: &mut *tracker,
                listener: &mut *listener,
            };
            let next = node.execute(&context, &mut registrar)?;
            context = next;

            for child in descriptor.children() {
                if tracker.was_already_executed(child.id()) {
                    debug!(child = %child.id(), "child already executed");
                    continue;
                }
                NodeExecutor::new(child).execute(&context, tracker, listener);
            }
            Ok(())
        });
        self.collector.execute(Phase::After, || node.after(&context));

        context
    }

    fn report_done(self, listener: &mut dyn ExecutionListener<C>) {
        if self.collector.is_empty() && self.skip_result.is_skipped() {
            let reason = self.skip_result.reason().unwrap_or(UNKNOWN_SKIP_REASON);
            debug!(reason, "skipped");
            notify(|| listener.execution_skipped(self.descriptor, reason));
            return;
        }
        if !self.started {
            // Finished must always follow a started event.
            notify(|| listener.execution_started(self.descriptor));
        }
        let outcome = self.collector.into_outcome();
        debug!(successful = outcome.is_successful(), "finished");
        notify(|| listener.execution_finished(self.descriptor, &outcome));
    }
}

/// Registrar handed to [`Node::execute`]; runs each registered child on the spot.
struct DynamicTestExecutor<'a, C: Clone> {
    context: &'a C,
    tracker: &'a mut ExecutionTracker,
    listener: &'a mut dyn ExecutionListener<C>,
}

impl<C: Clone> DynamicRegistrar<C> for DynamicTestExecutor<'_, C> {
    fn register(&mut self, descriptor: Descriptor<C>) {
        if self.tracker.was_already_executed(descriptor.id()) {
            warn!(id = %descriptor.id(), "dynamic descriptor already executed, ignoring");
            return;
        }
        notify(|| self.listener.dynamic_test_registered(&descriptor));
        NodeExecutor::new(&descriptor).execute(self.context, self.tracker, self.listener);
    }
}

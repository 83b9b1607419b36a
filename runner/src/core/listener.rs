//! Receiver of execution events.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::core::descriptor::Descriptor;
use crate::core::outcome::ExecutionOutcome;

/// Skip reason reported when a node skips without giving one.
pub const UNKNOWN_SKIP_REASON: &str = "<unknown>";

/// Observer of one engine run.
///
/// For each descriptor exactly one of `execution_skipped` or the pair
/// `execution_started` .. `execution_finished` is delivered. Listeners are assumed
/// not to fail. A panicking listener is not recovered from: no node records it as
/// a failure, and the panic leaves [`ExecutionEngine::execute`] with its original
/// payload.
///
/// [`ExecutionEngine::execute`]: crate::engine::ExecutionEngine::execute
pub trait ExecutionListener<C: Clone> {
    /// A node discovered `descriptor` while executing. Its own events follow immediately.
    fn dynamic_test_registered(&mut self, _descriptor: &Descriptor<C>) {}

    fn execution_started(&mut self, _descriptor: &Descriptor<C>) {}

    fn execution_skipped(&mut self, _descriptor: &Descriptor<C>, _reason: &str) {}

    fn execution_finished(&mut self, _descriptor: &Descriptor<C>, _outcome: &ExecutionOutcome) {}
}

/// Panic payload of a listener callback, wrapped so phase capture lets it through.
pub(crate) struct ListenerPanic(pub(crate) Box<dyn Any + Send>);

/// Deliver one event, tagging a panic raised while delivering it.
pub(crate) fn notify(deliver: impl FnOnce()) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(deliver)) {
        panic::resume_unwind(Box::new(ListenerPanic(payload)));
    }
}

/// Forwards every event to each wrapped listener, in registration order.
pub struct Fanout<'a, C: Clone> {
    listeners: Vec<&'a mut dyn ExecutionListener<C>>,
}

impl<'a, C: Clone> Fanout<'a, C> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn push(&mut self, listener: &'a mut dyn ExecutionListener<C>) {
        self.listeners.push(listener);
    }
}

impl<C: Clone> Default for Fanout<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clone> ExecutionListener<C> for Fanout<'_, C> {
    fn dynamic_test_registered(&mut self, descriptor: &Descriptor<C>) {
        for listener in &mut self.listeners {
            listener.dynamic_test_registered(descriptor);
        }
    }

    fn execution_started(&mut self, descriptor: &Descriptor<C>) {
        for listener in &mut self.listeners {
            listener.execution_started(descriptor);
        }
    }

    fn execution_skipped(&mut self, descriptor: &Descriptor<C>, reason: &str) {
        for listener in &mut self.listeners {
            listener.execution_skipped(descriptor, reason);
        }
    }

    fn execution_finished(&mut self, descriptor: &Descriptor<C>, outcome: &ExecutionOutcome) {
        for listener in &mut self.listeners {
            listener.execution_finished(descriptor, outcome);
        }
    }
}

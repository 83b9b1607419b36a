//! The six-phase lifecycle a descriptor can bind to.

use anyhow::Result;

use crate::core::descriptor::Descriptor;
use crate::core::outcome::SkipResult;

/// Lifecycle behavior of one descriptor.
///
/// Every method defaults to the no-op behavior, so an implementation only overrides
/// the phases it cares about. Phases run strictly in this order for a descriptor:
/// `prepare`, `should_be_skipped`, `before`, `execute`, `after`, `clean_up`.
/// A phase that returns a context replaces the previous one for all later phases
/// and for every child.
pub trait Node<C: Clone> {
    /// Derive this descriptor's context from its parent's.
    fn prepare(&self, parent: &C) -> Result<C> {
        Ok(parent.clone())
    }

    fn should_be_skipped(&self, _context: &C) -> Result<SkipResult> {
        Ok(SkipResult::do_not_skip())
    }

    fn before(&self, context: &C) -> Result<C> {
        Ok(context.clone())
    }

    /// Run the descriptor's own behavior.
    ///
    /// Children discovered while running are handed to `dynamic`; each is executed
    /// to completion before `register` returns.
    fn execute(&self, context: &C, _dynamic: &mut dyn DynamicRegistrar<C>) -> Result<C> {
        Ok(context.clone())
    }

    fn after(&self, _context: &C) -> Result<()> {
        Ok(())
    }

    /// Runs once whenever `prepare` succeeded, whatever happened afterwards.
    fn clean_up(&self, _context: &C) -> Result<()> {
        Ok(())
    }
}

/// Behavior bound to descriptors that carry none of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNode;

impl<C: Clone> Node<C> for NoOpNode {}

/// Sink for children discovered while a node executes.
pub trait DynamicRegistrar<C: Clone> {
    fn register(&mut self, descriptor: Descriptor<C>);
}

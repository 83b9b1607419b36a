//! Run-scoped record of which descriptors already executed.

use std::collections::HashSet;

use crate::core::descriptor::DescriptorId;

/// Identities executed during one engine run.
///
/// Shared by `&mut` across the whole recursion so a descriptor that is both
/// registered dynamically and declared statically runs only once.
#[derive(Debug, Default)]
pub struct ExecutionTracker {
    executed: HashSet<DescriptorId>,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as executed. Returns false if it was already recorded.
    pub fn mark_executed(&mut self, id: &DescriptorId) -> bool {
        self.executed.insert(id.clone())
    }

    pub fn was_already_executed(&self, id: &DescriptorId) -> bool {
        self.executed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}

//! Failure accumulation across a sequence of fallible lifecycle phases.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::{Result, anyhow};
use tracing::warn;

use crate::core::listener::ListenerPanic;
use crate::core::outcome::{ExecutionOutcome, Failure, Phase};

/// Runs operations and keeps every failure they produce, in order.
///
/// Nothing recorded here is ever re-raised: later phases (notably clean up) still
/// run after an earlier one failed. A panicking operation counts as a failure of
/// its phase, unless the panic came from a listener callback: those propagate.
#[derive(Debug, Default)]
pub struct FailureCollector {
    failures: Vec<Failure>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op`, returning its value on success and recording the failure otherwise.
    pub fn execute<T>(&mut self, phase: Phase, op: impl FnOnce() -> Result<T>) -> Option<T> {
        let error = match panic::catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(error)) => error,
            Err(payload) if payload.is::<ListenerPanic>() => panic::resume_unwind(payload),
            Err(payload) => anyhow!("panicked: {}", panic_message(payload.as_ref())),
        };
        warn!(%phase, error = %format!("{error:#}"), "phase failed");
        self.failures.push(Failure::new(phase, error));
        None
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn into_outcome(self) -> ExecutionOutcome {
        let mut failures = self.failures.into_iter();
        match failures.next() {
            None => ExecutionOutcome::Successful,
            Some(primary) => ExecutionOutcome::Failed {
                primary,
                suppressed: failures.collect(),
            },
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "<non-string panic payload>".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn empty_collector_is_successful() {
        let collector = FailureCollector::new();
        assert!(collector.is_empty());
        assert!(collector.into_outcome().is_successful());
    }

    #[test]
    fn returns_value_of_successful_operation() {
        let mut collector = FailureCollector::new();
        let value = collector.execute(Phase::Prepare, || Ok(42));
        assert_eq!(value, Some(42));
        assert!(collector.is_empty());
    }

    #[test]
    fn first_failure_is_primary_and_rest_are_suppressed_in_order() {
        let mut collector = FailureCollector::new();
        collector.execute(Phase::Run, || -> Result<()> { bail!("before broke") });
        collector.execute(Phase::After, || -> Result<()> { bail!("after broke") });
        collector.execute(Phase::CleanUp, || -> Result<()> { bail!("clean up broke") });
        assert_eq!(collector.len(), 3);

        let outcome = collector.into_outcome();
        let primary = outcome.primary().expect("primary failure");
        assert_eq!(primary.phase, Phase::Run);
        assert_eq!(primary.error.to_string(), "before broke");
        let suppressed: Vec<String> = outcome
            .suppressed()
            .iter()
            .map(|failure| failure.error.to_string())
            .collect();
        assert_eq!(suppressed, vec!["after broke", "clean up broke"]);
    }

    #[test]
    fn records_panics_as_failures() {
        let mut collector = FailureCollector::new();
        let value: Option<()> = collector.execute(Phase::After, || -> Result<()> { panic!("boom") });
        assert!(value.is_none());

        let outcome = collector.into_outcome();
        let primary = outcome.primary().expect("primary failure");
        assert_eq!(primary.phase, Phase::After);
        assert_eq!(primary.error.to_string(), "panicked: boom");
    }

    #[test]
    fn formats_owned_panic_messages() {
        let mut collector = FailureCollector::new();
        collector.execute(Phase::Run, || -> Result<()> { panic!("{} failed", "step") });
        let outcome = collector.into_outcome();
        assert_eq!(
            outcome.primary().expect("primary").error.to_string(),
            "panicked: step failed"
        );
    }

    #[test]
    fn lets_listener_panics_through() {
        let mut collector = FailureCollector::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            collector.execute(Phase::Run, || -> Result<()> {
                crate::core::listener::notify(|| panic!("listener broke"));
                Ok(())
            })
        }));

        assert!(result.expect_err("re-raised").is::<ListenerPanic>());
        assert!(collector.is_empty());
    }
}

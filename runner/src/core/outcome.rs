//! Result types produced by node execution.
//!
//! A descriptor's execution ends in exactly one [`ExecutionOutcome`]. Failures keep
//! the lifecycle [`Phase`] they were recorded in so reports can tell a broken
//! `prepare` apart from a failing test body.

use std::fmt;

use serde::Serialize;

/// Lifecycle phase a failure was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Prepare,
    SkipCheck,
    /// `before`, `execute`, or a child invocation.
    Run,
    After,
    CleanUp,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Prepare => "prepare",
            Phase::SkipCheck => "skip check",
            Phase::Run => "run",
            Phase::After => "after",
            Phase::CleanUp => "clean up",
        };
        f.write_str(name)
    }
}

/// One recorded failure.
#[derive(Debug)]
pub struct Failure {
    pub phase: Phase,
    pub error: anyhow::Error,
}

impl Failure {
    pub fn new(phase: Phase, error: anyhow::Error) -> Self {
        Self { phase, error }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {:#}", self.phase, self.error)
    }
}

/// Final result of executing one descriptor.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Successful,
    /// `primary` is the first failure recorded; `suppressed` holds the rest in
    /// recording order.
    Failed {
        primary: Failure,
        suppressed: Vec<Failure>,
    },
}

impl ExecutionOutcome {
    pub fn is_successful(&self) -> bool {
        matches!(self, ExecutionOutcome::Successful)
    }

    pub fn primary(&self) -> Option<&Failure> {
        match self {
            ExecutionOutcome::Successful => None,
            ExecutionOutcome::Failed { primary, .. } => Some(primary),
        }
    }

    pub fn suppressed(&self) -> &[Failure] {
        match self {
            ExecutionOutcome::Successful => &[],
            ExecutionOutcome::Failed { suppressed, .. } => suppressed,
        }
    }
}

/// Answer of a node's skip check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipResult {
    skipped: bool,
    reason: Option<String>,
}

impl SkipResult {
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            skipped: true,
            reason: Some(reason.into()),
        }
    }

    /// Skipped without a stated reason.
    pub fn skip_silently() -> Self {
        Self {
            skipped: true,
            reason: None,
        }
    }

    pub fn do_not_skip() -> Self {
        Self::default()
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn failure_display_names_phase_and_error_chain() {
        let error = anyhow!("connection refused").context("open fixture");
        let failure = Failure::new(Phase::CleanUp, error);
        assert_eq!(
            failure.to_string(),
            "clean up failed: open fixture: connection refused"
        );
    }

    #[test]
    fn successful_outcome_has_no_failures() {
        let outcome = ExecutionOutcome::Successful;
        assert!(outcome.is_successful());
        assert!(outcome.primary().is_none());
        assert!(outcome.suppressed().is_empty());
    }

    #[test]
    fn skip_result_defaults_to_not_skipped() {
        let result = SkipResult::default();
        assert!(!result.is_skipped());
        assert_eq!(result.reason(), None);
        assert_eq!(SkipResult::skip("ignored").reason(), Some("ignored"));
        assert!(SkipResult::skip_silently().is_skipped());
    }
}

//! Human-readable run report built from listener events.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::core::descriptor::{Descriptor, DescriptorId};
use crate::core::listener::ExecutionListener;
use crate::core::outcome::ExecutionOutcome;
use crate::io::config::ReportConfig;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub started: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub dynamic: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Listener that counts outcomes and renders an indented tree report.
///
/// Lines are written when a descriptor starts and completed when it finishes, so
/// the report keeps tree order even though outcomes arrive children-first.
#[derive(Debug, Default)]
pub struct SummaryListener {
    config: ReportConfig,
    summary: RunSummary,
    lines: Vec<String>,
    open: Vec<usize>,
    dynamic_ids: HashSet<DescriptorId>,
}

impl SummaryListener {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Render the tree report followed by a one-line summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        let s = &self.summary;
        let _ = writeln!(
            out,
            "{} started, {} succeeded, {} failed, {} skipped ({} dynamic)",
            s.started, s.succeeded, s.failed, s.skipped, s.dynamic
        );
        out
    }

    fn indent(&self) -> String {
        "  ".repeat(self.open.len())
    }

    fn label<C: Clone>(&self, descriptor: &Descriptor<C>) -> String {
        if self.dynamic_ids.contains(descriptor.id()) {
            format!("{} (dynamic)", descriptor.display_name())
        } else {
            descriptor.display_name().to_string()
        }
    }
}

impl<C: Clone> ExecutionListener<C> for SummaryListener {
    fn dynamic_test_registered(&mut self, descriptor: &Descriptor<C>) {
        self.summary.dynamic += 1;
        self.dynamic_ids.insert(descriptor.id().clone());
    }

    fn execution_started(&mut self, descriptor: &Descriptor<C>) {
        self.summary.started += 1;
        let line = format!("{}[running] {}", self.indent(), self.label(descriptor));
        self.lines.push(line);
        self.open.push(self.lines.len() - 1);
    }

    fn execution_skipped(&mut self, descriptor: &Descriptor<C>, reason: &str) {
        self.summary.skipped += 1;
        if self.config.show_skipped {
            let line = format!(
                "{}[skipped] {} ({})",
                self.indent(),
                self.label(descriptor),
                reason
            );
            self.lines.push(line);
        }
    }

    fn execution_finished(&mut self, descriptor: &Descriptor<C>, outcome: &ExecutionOutcome) {
        let status = match outcome {
            ExecutionOutcome::Successful => {
                self.summary.succeeded += 1;
                "[ok]"
            }
            ExecutionOutcome::Failed { .. } => {
                self.summary.failed += 1;
                "[FAILED]"
            }
        };
        let Some(index) = self.open.pop() else {
            return;
        };
        let indent = self.indent();
        self.lines[index] = format!("{indent}{status} {}", self.label(descriptor));

        if let Some(primary) = outcome.primary() {
            self.lines.push(format!("{indent}    {primary}"));
            if self.config.show_suppressed {
                for failure in outcome.suppressed() {
                    self.lines
                        .push(format!("{indent}    suppressed: {failure}"));
                }
            }
        }
    }
}

//! JSONL event stream for machine consumers of a run.
//!
//! One JSON object per listener event, in delivery order. Listener callbacks cannot
//! fail, so the first write error is kept and surfaced by [`EventLogWriter::finish`].

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::core::descriptor::{Descriptor, DescriptorId};
use crate::core::listener::ExecutionListener;
use crate::core::outcome::{ExecutionOutcome, Failure, Phase};

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum EventRecord<'a> {
    DynamicTestRegistered {
        id: &'a DescriptorId,
        name: &'a str,
    },
    Started {
        id: &'a DescriptorId,
        name: &'a str,
    },
    Skipped {
        id: &'a DescriptorId,
        name: &'a str,
        reason: &'a str,
    },
    Finished {
        id: &'a DescriptorId,
        name: &'a str,
        status: Status,
        failures: Vec<FailureRecord>,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Successful,
    Failed,
}

/// A failure as written to the log; the first entry is the primary one.
#[derive(Debug, Serialize)]
struct FailureRecord {
    phase: Phase,
    message: String,
}

impl From<&Failure> for FailureRecord {
    fn from(failure: &Failure) -> Self {
        Self {
            phase: failure.phase,
            message: format!("{:#}", failure.error),
        }
    }
}

/// Listener writing each event as one JSON line.
pub struct EventLogWriter<W: Write> {
    out: W,
    error: Option<anyhow::Error>,
}

impl EventLogWriter<BufWriter<File>> {
    /// Create (or truncate) the log at `path`, creating parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create event log dir {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("create event log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLogWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush and return the writer, or the first error hit while writing.
    pub fn finish(mut self) -> Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush().context("flush event log")?;
        Ok(self.out)
    }

    fn write(&mut self, record: &EventRecord<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.try_write(record) {
            warn!(error = %format!("{err:#}"), "event log write failed");
            self.error = Some(err);
        }
    }

    fn try_write(&mut self, record: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record).context("serialize event")?;
        writeln!(self.out, "{line}").context("write event log")
    }
}

impl<C: Clone, W: Write> ExecutionListener<C> for EventLogWriter<W> {
    fn dynamic_test_registered(&mut self, descriptor: &Descriptor<C>) {
        self.write(&EventRecord::DynamicTestRegistered {
            id: descriptor.id(),
            name: descriptor.display_name(),
        });
    }

    fn execution_started(&mut self, descriptor: &Descriptor<C>) {
        self.write(&EventRecord::Started {
            id: descriptor.id(),
            name: descriptor.display_name(),
        });
    }

    fn execution_skipped(&mut self, descriptor: &Descriptor<C>, reason: &str) {
        self.write(&EventRecord::Skipped {
            id: descriptor.id(),
            name: descriptor.display_name(),
            reason,
        });
    }

    fn execution_finished(&mut self, descriptor: &Descriptor<C>, outcome: &ExecutionOutcome) {
        let status = if outcome.is_successful() {
            Status::Successful
        } else {
            Status::Failed
        };
        let failures = outcome
            .primary()
            .into_iter()
            .chain(outcome.suppressed())
            .map(FailureRecord::from)
            .collect();
        self.write(&EventRecord::Finished {
            id: descriptor.id(),
            name: descriptor.display_name(),
            status,
            failures,
        });
    }
}

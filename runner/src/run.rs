//! Orchestration for `runner run`: load, execute, report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::listener::Fanout;
use crate::engine::ExecutionEngine;
use crate::io::config::load_config;
use crate::io::event_log::EventLogWriter;
use crate::io::report::{RunSummary, SummaryListener};
use crate::io::script::{ScriptContext, build_descriptor};
use crate::io::suite_store::load_suite;
use crate::logging::QuietPanics;

/// Inputs for a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub suite_path: PathBuf,
    pub config_path: PathBuf,
    /// Overrides `event_log` from the config file.
    pub events_path: Option<PathBuf>,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Tree report as printed by the CLI.
    pub rendered: String,
    pub events_path: Option<PathBuf>,
}

/// Load the suite and config, execute the suite, and collect the reports.
///
/// Node failures are part of the report, not errors; `Err` means the run could
/// not happen or its event log could not be written. Panics captured from node
/// phases are kept off stderr for the duration of the run.
#[instrument(skip_all, fields(suite = %options.suite_path.display()))]
pub fn run_suite(options: &RunOptions) -> Result<RunReport> {
    let cfg = load_config(&options.config_path)?;
    let suite = load_suite(&options.suite_path)?;
    let root = build_descriptor(&suite);
    let root_context = ScriptContext::new(cfg.compiled_skip_pattern()?);

    let events_path = options.events_path.clone().or(cfg.event_log.clone());
    let mut event_log = events_path
        .as_deref()
        .map(EventLogWriter::create)
        .transpose()?;
    let mut summary = SummaryListener::new(cfg.report.clone());

    {
        let mut listeners: Fanout<'_, ScriptContext> = Fanout::new();
        listeners.push(&mut summary);
        if let Some(writer) = event_log.as_mut() {
            listeners.push(writer);
        }
        let _quiet = QuietPanics::enter();
        ExecutionEngine::new().execute(&root, &root_context, &mut listeners);
    }

    if let (Some(writer), Some(path)) = (event_log, events_path.as_deref()) {
        writer
            .finish()
            .with_context(|| format!("finish event log {}", path.display()))?;
    }

    let run_summary = summary.summary();
    info!(
        failed = run_summary.failed,
        skipped = run_summary.skipped,
        "run complete"
    );
    Ok(RunReport {
        summary: run_summary,
        rendered: summary.render(),
        events_path,
    })
}

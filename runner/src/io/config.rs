//! Runner configuration stored in `runner.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Runner configuration (TOML).
///
/// Missing fields take their defaults, so an empty file is a valid config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Skip every node whose id matches this regex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_pattern: Option<String>,

    /// Write the JSONL event stream here. `--events` on the command line wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,

    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Print suppressed failures under the primary one.
    pub show_suppressed: bool,
    /// Print skipped nodes in the tree report.
    pub show_skipped: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_suppressed: true,
            show_skipped: true,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<()> {
        self.compiled_skip_pattern()?;
        if self
            .event_log
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(anyhow!("event_log must not be empty"));
        }
        Ok(())
    }

    pub fn compiled_skip_pattern(&self) -> Result<Option<Regex>> {
        self.skip_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).with_context(|| format!("compile skip_pattern '{pattern}'"))
            })
            .transpose()
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RunnerConfig::default()`.
pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    if !path.exists() {
        let cfg = RunnerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RunnerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RunnerConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, RunnerConfig::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("runner.toml");
        let cfg = RunnerConfig {
            skip_pattern: Some("^slow/".to_string()),
            event_log: Some(PathBuf::from("events.jsonl")),
            report: ReportConfig {
                show_suppressed: false,
                show_skipped: true,
            },
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("runner.toml");
        fs::write(&path, "[report]\nshow_skipped = false\n").expect("write");

        let cfg = load_config(&path).expect("load");
        assert!(cfg.report.show_suppressed);
        assert!(!cfg.report.show_skipped);
        assert_eq!(cfg.skip_pattern, None);
    }

    #[test]
    fn rejects_invalid_skip_pattern() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("runner.toml");
        fs::write(&path, "skip_pattern = \"(unclosed\"\n").expect("write");

        let err = load_config(&path).expect_err("invalid regex");
        assert!(format!("{err:#}").contains("compile skip_pattern"));
    }
}

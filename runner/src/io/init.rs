//! Scaffolding for `runner init`: a starter suite plus default config.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::io::config::{RunnerConfig, write_config};
use crate::io::suite_store::write_suite;
use crate::tree::default_suite;

pub const SUITE_FILE: &str = "suite.json";
pub const CONFIG_FILE: &str = "runner.toml";

/// Canonical file locations within a project root.
#[derive(Debug, Clone)]
pub struct RunnerPaths {
    pub root: PathBuf,
    pub suite_path: PathBuf,
    pub config_path: PathBuf,
}

impl RunnerPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            suite_path: root.join(SUITE_FILE),
            config_path: root.join(CONFIG_FILE),
            root,
        }
    }
}

/// Options for `init_runner`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing files.
    pub force: bool,
}

/// Write `suite.json` and `runner.toml` into `root`.
///
/// Fails if either file already exists unless `options.force` is set.
pub fn init_runner(root: &Path, options: &InitOptions) -> Result<RunnerPaths> {
    let paths = RunnerPaths::new(root);
    if !options.force {
        for path in [&paths.suite_path, &paths.config_path] {
            if path.exists() {
                return Err(anyhow!(
                    "runner init: {} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
        }
    }

    write_suite(&paths.suite_path, &default_suite())?;
    write_config(&paths.config_path, &RunnerConfig::default())?;
    Ok(paths)
}

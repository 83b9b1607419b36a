//! Suite file load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;

use crate::core::invariants::validate_invariants;
use crate::tree::SuiteNode;

/// JSON Schema every suite file must satisfy.
pub const SUITE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/suite/v1.schema.json"
));

/// Load and validate a suite file (schema + invariants).
pub fn load_suite(suite_path: &Path) -> Result<SuiteNode> {
    let contents = fs::read_to_string(suite_path)
        .with_context(|| format!("read suite {}", suite_path.display()))?;
    parse_suite(&contents).with_context(|| format!("load suite {}", suite_path.display()))
}

/// Parse and validate suite JSON.
pub fn parse_suite(contents: &str) -> Result<SuiteNode> {
    let value: Value = serde_json::from_str(contents).context("parse suite json")?;
    validate_schema(&value)?;
    let suite: SuiteNode = serde_json::from_value(value).context("deserialize suite")?;
    validate_suite_invariants(&suite)?;
    Ok(suite)
}

/// Write suite to disk as pretty JSON with a trailing newline.
pub fn write_suite(suite_path: &Path, suite: &SuiteNode) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(suite)?;
    buf.push('\n');
    fs::write(suite_path, buf).with_context(|| format!("write suite {}", suite_path.display()))
}

fn validate_schema(suite: &Value) -> Result<()> {
    let schema_value: Value = serde_json::from_str(SUITE_SCHEMA).context("parse suite schema")?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(suite) {
        let messages = compiled
            .iter_errors(suite)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "suite schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

fn validate_suite_invariants(suite: &SuiteNode) -> Result<()> {
    let errors = validate_invariants(suite);
    if errors.is_empty() {
        return Ok(());
    }
    Err(anyhow!("suite invariants failed: {}", errors.join("; ")))
}

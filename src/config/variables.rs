// Loading template variables from YAML/JSON files and KEY=VALUE pairs

use serde_json::Value;
use std::path::Path;

use crate::domain::template::Variables;
use crate::error::{Error, IoResultExt, Result};

/// Parse a YAML (or JSON) document whose top level is a mapping
pub fn variables_from_str(source: &str) -> Result<Variables> {
    if source.trim().is_empty() {
        return Ok(Variables::new());
    }
    let value: Value =
        serde_yaml::from_str(source).map_err(|e| Error::Variables(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Variables::new()),
        other => Err(Error::Variables(format!(
            "expected a mapping at the top level, found {}",
            kind(&other)
        ))),
    }
}

pub fn load_variables(path: &Path) -> Result<Variables> {
    let source = std::fs::read_to_string(path).with_path(path)?;
    variables_from_str(&source)
}

/// Split `key=value`. The value is read as JSON when it parses, otherwise it
/// is kept as a plain string.
pub fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| Error::Variables(format!("expected KEY=VALUE, got '{assignment}'")))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

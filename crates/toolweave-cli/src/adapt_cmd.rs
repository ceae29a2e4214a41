//! `toolweave adapt`: convert MCP-style descriptors to function definitions.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use toolweave_agent::schema::SchemaOptions;
use toolweave_agent::{ForeignTool, ProtocolAdapter};

use crate::helpers;

/// Run the adapt command.
pub fn run(file: &Path, strict: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let foreign = parse_foreign_tools(&content)
        .with_context(|| format!("invalid tool list in {}", file.display()))?;

    let definitions = ProtocolAdapter::new(SchemaOptions { strict }).adapt(&foreign);
    helpers::print_definitions(&definitions)
}

/// Accept either a bare array of tools or a `{"tools": [...]}` listing.
pub fn parse_foreign_tools(content: &str) -> Result<Vec<ForeignTool>> {
    let value: Value = serde_json::from_str(content)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove("tools")
            .context("expected a \"tools\" field")?,
        other => anyhow::bail!("expected an array or object, got {other}"),
    };
    Ok(serde_json::from_value(list)?)
}

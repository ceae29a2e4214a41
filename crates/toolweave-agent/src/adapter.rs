//! Foreign (MCP-style) tool descriptors → native function descriptors.
//!
//! Foreign descriptors carry a full JSON Schema per property and put the
//! parameter documentation inside the tool description. The adapter picks
//! out a single type per property, keeps enums verbatim, and recovers the
//! parameter descriptions from the description's argument section.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use toolweave_core::types::ToolDefinition;

use crate::schema::docstring::DocBlock;
use crate::schema::{CompiledSchema, ParameterSchema, PrimitiveKind, SchemaOptions, TypeDescriptor};

// ─────────────────────────────────────────────
// Foreign dialect
// ─────────────────────────────────────────────

/// A tool as listed by an MCP-style host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "inputSchema", default)]
    pub input_schema: ForeignInputSchema,
}

/// The `inputSchema` object. `title` and `type` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignInputSchema {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl From<&ToolDefinition> for ForeignTool {
    fn from(def: &ToolDefinition) -> Self {
        let params = &def.function.parameters;
        ForeignTool {
            name: def.function.name.clone(),
            description: Some(def.function.description.clone()),
            input_schema: ForeignInputSchema {
                properties: params
                    .get("properties")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default(),
                required: def.required().into_iter().map(String::from).collect(),
            },
        }
    }
}

// ─────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct ProtocolAdapter {
    options: SchemaOptions,
}

impl ProtocolAdapter {
    pub fn new(options: SchemaOptions) -> Self {
        Self { options }
    }

    /// Convert a batch of foreign descriptors, preserving order.
    pub fn adapt(&self, tools: &[ForeignTool]) -> Vec<ToolDefinition> {
        tools.iter().map(|t| self.adapt_one(t)).collect()
    }

    pub fn adapt_one(&self, tool: &ForeignTool) -> ToolDefinition {
        self.compile(tool).to_definition()
    }

    /// Intermediate compiled form, shared with the schema compiler's output.
    pub fn compile(&self, tool: &ForeignTool) -> CompiledSchema {
        let full_description = tool.description.as_deref().unwrap_or("");
        let doc = DocBlock::parse(full_description);

        let parameters: Vec<ParameterSchema> = tool
            .input_schema
            .properties
            .iter()
            .map(|(name, prop)| adapt_property(name, prop, &doc))
            .collect();

        let required = parameters.iter().map(|p| p.name.clone()).collect();

        debug!(
            tool = %tool.name,
            params = parameters.len(),
            "adapted foreign tool"
        );

        CompiledSchema {
            name: tool.name.clone(),
            description: full_description
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .to_string(),
            parameters,
            required,
            strict: self.options.strict,
        }
    }
}

fn adapt_property(name: &str, prop: &Value, doc: &DocBlock) -> ParameterSchema {
    let (descriptor, null_in_type) = resolve_property(prop);
    let default = prop.get("default").cloned();
    let nullable = default.is_some() || null_in_type || has_null_alternative(prop);

    let mut description = doc.param(name).to_string();
    if description.is_empty() {
        if let Some(own) = prop.get("description").and_then(Value::as_str) {
            description = own.to_string();
        }
    }

    ParameterSchema {
        name: name.to_string(),
        descriptor,
        nullable,
        description,
        default,
    }
}

/// Resolve one property schema. The flag reports a `null` entry in a
/// `type` array.
fn resolve_property(prop: &Value) -> (TypeDescriptor, bool) {
    let Some(owner) = find_owner(prop, "type") else {
        return (resolve_scalar(None, prop), false);
    };

    let (kind, null_in_type) = match owner.get("type") {
        Some(Value::String(s)) => (Some(s.as_str()), false),
        Some(Value::Array(entries)) => {
            let names: Vec<&str> = entries.iter().filter_map(Value::as_str).collect();
            (
                names.iter().copied().find(|n| *n != "null"),
                names.contains(&"null"),
            )
        }
        _ => (None, false),
    };

    let descriptor = match kind {
        Some("array") => {
            let item = owner
                .get("items")
                .filter(|v| v.is_object())
                .map(|items| resolve_property(items).0)
                .unwrap_or_else(TypeDescriptor::string);
            TypeDescriptor::Array(Box::new(item))
        }
        Some("object") => {
            let value = owner
                .get("additionalProperties")
                .filter(|v| v.is_object())
                .map(|schema| resolve_property(schema).0)
                .unwrap_or_else(TypeDescriptor::string);
            TypeDescriptor::Object(Box::new(value))
        }
        other => resolve_scalar(other, prop),
    };

    (descriptor, null_in_type)
}

fn resolve_scalar(kind: Option<&str>, prop: &Value) -> TypeDescriptor {
    let base = kind.and_then(PrimitiveKind::from_type_name);
    if kind.is_some() && base.is_none() {
        debug!(kind = ?kind, "unknown foreign type rendered as string");
    }

    match find_first(prop, "enum") {
        Some(Value::Array(values)) if !values.is_empty() => TypeDescriptor::Enumerated {
            base: base
                .or_else(|| PrimitiveKind::of_value(&values[0]))
                .unwrap_or(PrimitiveKind::String),
            values: values.clone(),
        },
        _ => TypeDescriptor::Primitive(base.unwrap_or(PrimitiveKind::String)),
    }
}

fn has_null_alternative(prop: &Value) -> bool {
    ["anyOf", "oneOf"].iter().any(|key| {
        prop.get(*key)
            .and_then(Value::as_array)
            .is_some_and(|alts| {
                alts.iter()
                    .any(|alt| alt.get("type").and_then(Value::as_str) == Some("null"))
            })
    })
}

/// Depth-first, first-match search for `key`, returning the object that
/// holds it. Object members are visited in document order.
fn find_owner<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => {
            if map.contains_key(key) {
                return Some(map);
            }
            map.values().find_map(|v| find_owner(v, key))
        }
        Value::Array(items) => items.iter().find_map(|v| find_owner(v, key)),
        _ => None,
    }
}

fn find_first<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    find_owner(value, key).and_then(|map| map.get(key))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

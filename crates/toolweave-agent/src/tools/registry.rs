//! Tool registry: name → {descriptor, invocable, defaults}.
//!
//! The agent loop registers tools here and dispatches model tool calls by
//! name. Registration order is kept so the model always sees tools in the
//! same order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use toolweave_core::types::{ToolCall, ToolDefinition};
use toolweave_core::ToolError;

use super::base::Tool;
use super::function::FunctionTool;
use super::remote::{RemoteTool, ToolHost};
use crate::adapter::ProtocolAdapter;
use crate::schema::{SchemaCompiler, SchemaOptions, ToolSignature};

struct Entry {
    definition: ToolDefinition,
    tool: Arc<dyn Tool>,
    defaults: HashMap<String, Value>,
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by name and dispatches calls.
///
/// Owns `Arc<dyn Tool>` so tools can be shared across tasks.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Entry>,
    options: SchemaOptions,
}

impl ToolRegistry {
    /// Create an empty registry with non-strict schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that compiles schemas with `options`.
    pub fn with_options(options: SchemaOptions) -> Self {
        Self {
            tools: IndexMap::new(),
            options,
        }
    }

    pub fn options(&self) -> SchemaOptions {
        self.options
    }

    /// Register a tool under its own name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.register_as(name, tool);
    }

    /// Register a tool under an explicit name.
    ///
    /// An existing entry with the same name is replaced in place.
    pub fn register_as(&mut self, name: impl Into<String>, tool: Arc<dyn Tool>) {
        let name = name.into();
        let mut definition = tool.to_definition();
        definition.function.name = name.clone();
        let entry = Entry {
            definition,
            defaults: tool.defaults(),
            tool,
        };

        if self.tools.insert(name.clone(), entry).is_some() {
            warn!(tool = %name, "tool re-registered, previous entry replaced");
        } else {
            info!(tool = %name, "registered tool");
        }
    }

    /// Compile `signature` with this registry's options and register the
    /// closure as its body.
    pub fn register_function<F, Fut>(&mut self, signature: &ToolSignature, handler: F)
    where
        F: Fn(HashMap<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let schema = SchemaCompiler::new(self.options).compile(signature);
        self.register(Arc::new(FunctionTool::from_schema(&schema, handler)));
    }

    /// Adapt every tool a host offers and register it. Returns the count.
    pub async fn register_host(&mut self, host: Arc<dyn ToolHost>) -> anyhow::Result<usize> {
        let foreign = host.list_tools().await?;
        let definitions = ProtocolAdapter::new(self.options).adapt(&foreign);
        let count = definitions.len();
        for definition in definitions {
            self.register(Arc::new(RemoteTool::new(definition, host.clone())));
        }
        info!(count, "registered host tools");
        Ok(count)
    }

    /// Remove a tool by name. Returns whether it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        let removed = self.tools.shift_remove(name).is_some();
        if removed {
            info!(tool = name, "unregistered tool");
        }
        removed
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name).map(|e| &e.tool)
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Model-facing definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|e| e.definition.clone()).collect()
    }

    /// Execute a tool by name.
    ///
    /// Arguments that are missing or `null` are filled from the tool's
    /// declared defaults.
    pub async fn execute(
        &self,
        name: &str,
        mut args: HashMap<String, Value>,
    ) -> Result<String, ToolError> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        for (key, default) in &entry.defaults {
            if matches!(args.get(key), None | Some(Value::Null)) {
                args.insert(key.clone(), default.clone());
            }
        }

        debug!(tool = name, args = args.len(), "executing tool");

        entry.tool.execute(args).await.map_err(|source| {
            warn!(tool = name, error = %source, "tool execution failed");
            ToolError::Execution {
                tool: name.to_string(),
                source,
            }
        })
    }

    /// Resolve, parse and execute one model tool call.
    pub async fn execute_call(&self, call: &ToolCall) -> Result<String, ToolError> {
        let name = call.function.name.as_str();
        if !self.has(name) {
            return Err(ToolError::NotFound(name.to_string()));
        }
        let args = parse_arguments(name, &call.function.arguments)?;
        self.execute(name, args).await
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Parse a raw argument payload.
///
/// Empty payloads and `{}` mean no arguments; anything else must be a JSON
/// object.
pub fn parse_arguments(tool: &str, raw: &str) -> Result<HashMap<String, Value>, ToolError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "{}" {
        return Ok(HashMap::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(other) => Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: format!("expected a JSON object, got {other}"),
        }),
        Err(e) => Err(ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: e.to_string(),
        }),
    }
}

//! Closure-backed tools with compiled schemas.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use toolweave_core::types::ToolDefinition;

use super::base::Tool;
use crate::schema::{CompiledSchema, Param, SchemaCompiler, SchemaOptions, ToolSignature};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Handler = Arc<dyn Fn(HashMap<String, Value>) -> BoxFuture<anyhow::Result<Value>> + Send + Sync>;

/// A tool whose schema is compiled from a [`ToolSignature`] and whose body
/// is an async closure.
///
/// String results are passed through unchanged; any other JSON value is
/// serialized so the model sees `5` rather than `"5"`.
pub struct FunctionTool {
    definition: ToolDefinition,
    defaults: HashMap<String, Value>,
    handler: Handler,
}

impl std::fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.definition.function.name)
            .finish()
    }
}

impl FunctionTool {
    /// Start building a tool from its name and documentation block.
    pub fn builder(name: impl Into<String>, doc: impl Into<String>) -> FunctionToolBuilder {
        FunctionToolBuilder {
            signature: ToolSignature::new(name, doc),
            options: SchemaOptions::default(),
        }
    }

    /// Wrap a closure around an already compiled schema.
    pub fn from_schema<F, Fut>(schema: &CompiledSchema, handler: F) -> Self
    where
        F: Fn(HashMap<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        FunctionTool {
            definition: schema.to_definition(),
            defaults: schema.defaults(),
            handler: Arc::new(move |args| -> BoxFuture<anyhow::Result<Value>> {
                Box::pin(handler(args))
            }),
        }
    }
}

pub struct FunctionToolBuilder {
    signature: ToolSignature,
    options: SchemaOptions,
}

impl FunctionToolBuilder {
    pub fn param(mut self, param: Param) -> Self {
        self.signature.params.push(param);
        self
    }

    pub fn options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    /// Compile the signature and attach the body.
    pub fn build<F, Fut>(self, handler: F) -> FunctionTool
    where
        F: Fn(HashMap<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let schema = SchemaCompiler::new(self.options).compile(&self.signature);
        FunctionTool::from_schema(&schema, handler)
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.definition.function.name
    }

    fn description(&self) -> &str {
        &self.definition.function.description
    }

    fn parameters(&self) -> Value {
        self.definition.function.parameters.clone()
    }

    fn defaults(&self) -> HashMap<String, Value> {
        self.defaults.clone()
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        match (self.handler)(params).await? {
            Value::String(s) => Ok(s),
            other => Ok(serde_json::to_string(&other)?),
        }
    }

    fn to_definition(&self) -> ToolDefinition {
        self.definition.clone()
    }
}

//! Tools served by a protocol host (e.g. an MCP server).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use toolweave_core::types::ToolDefinition;

use super::base::Tool;
use crate::adapter::ForeignTool;

/// A process or connection that lists and runs tools in the foreign dialect.
#[async_trait]
pub trait ToolHost: Send + Sync {
    /// Descriptors for every tool the host offers.
    async fn list_tools(&self) -> anyhow::Result<Vec<ForeignTool>>;

    /// Run `name` with a JSON object of arguments and return its text output.
    async fn call_tool(&self, name: &str, arguments: Value) -> anyhow::Result<String>;
}

/// Wraps a single host tool as a local [`Tool`].
pub struct RemoteTool {
    definition: ToolDefinition,
    host: Arc<dyn ToolHost>,
}

impl RemoteTool {
    /// `definition` is the adapted (native) descriptor of the host tool.
    pub fn new(definition: ToolDefinition, host: Arc<dyn ToolHost>) -> Self {
        Self { definition, host }
    }
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.definition.function.name
    }

    fn description(&self) -> &str {
        &self.definition.function.description
    }

    fn parameters(&self) -> Value {
        self.definition.function.parameters.clone()
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let arguments: Map<String, Value> = params.into_iter().collect();
        let output = self
            .host
            .call_tool(self.name(), Value::Object(arguments))
            .await
            .map_err(|e| anyhow::anyhow!("remote tool '{}' call failed: {}", self.name(), e))?;

        if output.is_empty() {
            Ok("(no output)".to_string())
        } else {
            Ok(output)
        }
    }

    fn to_definition(&self) -> ToolDefinition {
        self.definition.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ProtocolAdapter;
    use serde_json::json;

    struct EchoHost;

    #[async_trait]
    impl ToolHost for EchoHost {
        async fn list_tools(&self) -> anyhow::Result<Vec<ForeignTool>> {
            Ok(vec![serde_json::from_value(json!({
                "name": "echo",
                "description": "Echo text.\nArgs:\n    text: what to echo",
                "inputSchema": { "properties": { "text": { "type": "string" } } }
            }))?])
        }

        async fn call_tool(&self, name: &str, arguments: Value) -> anyhow::Result<String> {
            match name {
                "echo" => Ok(arguments["text"].as_str().unwrap_or_default().to_string()),
                other => anyhow::bail!("no such tool: {other}"),
            }
        }
    }

    async fn echo_tool() -> RemoteTool {
        let host: Arc<dyn ToolHost> = Arc::new(EchoHost);
        let foreign = host.list_tools().await.unwrap();
        let def = ProtocolAdapter::default().adapt_one(&foreign[0]);
        RemoteTool::new(def, host)
    }

    #[tokio::test]
    async fn forwards_arguments_to_host() {
        let tool = echo_tool().await;
        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.description(), "Echo text.");

        let mut params = HashMap::new();
        params.insert("text".to_string(), json!("ping"));
        assert_eq!(tool.execute(params).await.unwrap(), "ping");
    }

    #[tokio::test]
    async fn empty_output_is_marked() {
        let tool = echo_tool().await;
        assert_eq!(tool.execute(HashMap::new()).await.unwrap(), "(no output)");
    }

    #[tokio::test]
    async fn host_errors_name_the_tool() {
        let host: Arc<dyn ToolHost> = Arc::new(EchoHost);
        let def = ToolDefinition::new("missing", "", json!({"type": "object"}));
        let err = RemoteTool::new(def, host)
            .execute(HashMap::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("remote tool 'missing'"));
        assert!(err.to_string().contains("no such tool"));
    }
}

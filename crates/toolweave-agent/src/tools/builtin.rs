//! Built-in tools: `terminate`, `add`, `get_current_time`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::base::{require_i64, require_string, Tool};
use super::function::FunctionTool;
use crate::schema::{Param, SchemaOptions, TypeShape};

/// Reserved name of the tool that ends an agent run.
pub const TERMINATE_TOOL: &str = "terminate";

// ─────────────────────────────────────────────
// terminate
// ─────────────────────────────────────────────

/// Signals that the task is finished (or cannot be finished).
///
/// The agent loop watches for calls to this name; the tool itself only
/// reports the status back.
pub struct TerminateTool;

#[async_trait]
impl Tool for TerminateTool {
    fn name(&self) -> &str {
        TERMINATE_TOOL
    }

    fn description(&self) -> &str {
        "Terminate the interaction when the request is met or when you cannot proceed further with the task."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "enum": ["success", "failure"],
                    "description": "The finish status of the interaction."
                }
            },
            "required": ["status"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String> {
        let status = require_string(&params, "status")?;
        if status != "success" && status != "failure" {
            anyhow::bail!("status must be \"success\" or \"failure\", got {status:?}");
        }
        Ok(format!(
            "The interaction has been completed with status: {status}"
        ))
    }
}

// ─────────────────────────────────────────────
// add / get_current_time
// ─────────────────────────────────────────────

/// `add(a, b)`: integer addition.
pub fn add_tool(options: SchemaOptions) -> FunctionTool {
    FunctionTool::builder(
        "add",
        "Add two integers and return their sum.\n\nArgs:\n    a (int): first addend\n    b (int): second addend\n\nReturns:\n    int: the sum",
    )
    .param(Param::required("a", TypeShape::Integer))
    .param(Param::required("b", TypeShape::Integer))
    .options(options)
    .build(|args| async move {
        let a = require_i64(&args, "a")?;
        let b = require_i64(&args, "b")?;
        let sum = a
            .checked_add(b)
            .ok_or_else(|| anyhow::anyhow!("{a} + {b} overflows a 64-bit integer"))?;
        Ok(json!(sum))
    })
}

/// `get_current_time()`: local time as `YYYY-MM-DD HH:MM:SS`.
pub fn current_time_tool(options: SchemaOptions) -> FunctionTool {
    FunctionTool::builder(
        "get_current_time",
        "Get the current local date and time, formatted as YYYY-MM-DD HH:MM:SS.",
    )
    .options(options)
    .build(|_| async {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(Value::String(now))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn terminate_reports_status() {
        let mut params = HashMap::new();
        params.insert("status".to_string(), json!("success"));
        let out = TerminateTool.execute(params).await.unwrap();
        assert!(out.contains("success"));
    }

    #[tokio::test]
    async fn terminate_rejects_unknown_status() {
        let mut params = HashMap::new();
        params.insert("status".to_string(), json!("maybe"));
        assert!(TerminateTool.execute(params).await.is_err());
        assert!(TerminateTool.execute(HashMap::new()).await.is_err());
    }

    #[test]
    fn terminate_definition() {
        let def = TerminateTool.to_definition();
        assert_eq!(def.name(), TERMINATE_TOOL);
        assert_eq!(def.required(), vec!["status"]);
    }

    #[tokio::test]
    async fn add_sums_integers() {
        let tool = add_tool(SchemaOptions::default());
        let def = tool.to_definition();
        assert_eq!(def.required(), vec!["a", "b"]);
        assert_eq!(def.function.parameters["properties"]["a"]["type"], "integer");
        assert_eq!(def.function.parameters["properties"]["b"]["description"], "second addend");

        let mut args = HashMap::new();
        args.insert("a".to_string(), json!(2));
        args.insert("b".to_string(), json!(3));
        assert_eq!(tool.execute(args).await.unwrap(), "5");
    }

    #[tokio::test]
    async fn add_reports_overflow() {
        let mut args = HashMap::new();
        args.insert("a".to_string(), json!(i64::MAX));
        args.insert("b".to_string(), json!(1));
        let err = add_tool(SchemaOptions::default()).execute(args).await.unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[tokio::test]
    async fn add_rejects_huge_float() {
        let mut args = HashMap::new();
        args.insert("a".to_string(), json!(1e30));
        args.insert("b".to_string(), json!(0));
        let err = add_tool(SchemaOptions::default()).execute(args).await.unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[tokio::test]
    async fn current_time_format() {
        let tool = current_time_tool(SchemaOptions::default());
        assert!(tool.to_definition().required().is_empty());

        let out = tool.execute(HashMap::new()).await.unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(&out, "%Y-%m-%d %H:%M:%S").is_ok());
    }
}

//! Tool trait: the interface every agent tool implements.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use toolweave_core::types::ToolDefinition;

// ─────────────────────────────────────────────
// Tool trait
// ─────────────────────────────────────────────

/// Every agent tool implements this trait.
///
/// The registry sends `to_definition()` to the model and dispatches calls
/// to `execute()`. Implementations come in three flavours: closures wrapped
/// in a [`FunctionTool`](super::FunctionTool), hand-written structs such as
/// [`TerminateTool`](super::TerminateTool), and [`RemoteTool`](super::RemoteTool)s
/// backed by a protocol host.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used by the model to call this tool (e.g. `"add"`).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the parameters.
    ///
    /// Must be `{"type": "object", "properties": {...}, "required": [...]}`.
    fn parameters(&self) -> Value;

    /// Values for parameters the model may omit.
    fn defaults(&self) -> HashMap<String, Value> {
        HashMap::new()
    }

    /// Execute the tool with the given arguments.
    ///
    /// Returns the tool output as a string (the model reads this).
    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<String>;

    /// Build the `ToolDefinition` sent to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

// ─────────────────────────────────────────────
// Param helpers
// ─────────────────────────────────────────────

/// Extract a required `String` param, returning a user-friendly error.
pub fn require_string(params: &HashMap<String, Value>, key: &str) -> anyhow::Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))
}

/// Extract a required integer param.
///
/// Integral floats (`3.0`) and numeric strings (`"3"`) are accepted since
/// models produce both. Floats outside the `i64` range are rejected rather
/// than saturated.
pub fn require_i64(params: &HashMap<String, Value>, key: &str) -> anyhow::Result<i64> {
    let value = params
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {key}"))?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| anyhow::anyhow!("Parameter {key} must be an integer, got {value}"))
}

/// Exact `i64` for a whole, in-range float. `i64::MAX` itself is not
/// representable as `f64`, so the upper bound is exclusive.
fn integral_f64(f: f64) -> Option<i64> {
    const BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    (f.is_finite() && f.fract() == 0.0 && (-BOUND..BOUND).contains(&f)).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_string_present() {
        let mut params = HashMap::new();
        params.insert("status".into(), json!("success"));
        assert_eq!(require_string(&params, "status").unwrap(), "success");
    }

    #[test]
    fn test_require_string_missing() {
        let params = HashMap::new();
        assert!(require_string(&params, "status").is_err());
    }

    #[test]
    fn test_require_string_wrong_type() {
        let mut params = HashMap::new();
        params.insert("status".into(), json!(42));
        assert!(require_string(&params, "status").is_err());
    }

    #[test]
    fn test_require_i64_variants() {
        let mut params = HashMap::new();
        params.insert("a".into(), json!(2));
        params.insert("b".into(), json!(3.0));
        params.insert("c".into(), json!(" 7 "));
        params.insert("d".into(), json!(1.5));
        params.insert("e".into(), json!(true));
        assert_eq!(require_i64(&params, "a").unwrap(), 2);
        assert_eq!(require_i64(&params, "b").unwrap(), 3);
        assert_eq!(require_i64(&params, "c").unwrap(), 7);
        assert!(require_i64(&params, "d").is_err());
        assert!(require_i64(&params, "e").is_err());
        assert!(require_i64(&params, "missing").is_err());
    }

    #[test]
    fn test_require_i64_rejects_out_of_range_floats() {
        let mut params = HashMap::new();
        params.insert("big".into(), json!(1e30));
        params.insert("small".into(), json!(-1e19));
        params.insert("edge".into(), json!(9_223_372_036_854_775_808.0_f64));
        params.insert("low".into(), json!(-9_223_372_036_854_775_808.0_f64));
        assert!(require_i64(&params, "big").is_err());
        assert!(require_i64(&params, "small").is_err());
        assert!(require_i64(&params, "edge").is_err());
        assert_eq!(require_i64(&params, "low").unwrap(), i64::MIN);
    }

    /// Verify the default `to_definition()` produces the right shape.
    #[tokio::test]
    async fn test_to_definition_default() {
        struct DummyTool;

        #[async_trait]
        impl Tool for DummyTool {
            fn name(&self) -> &str {
                "dummy"
            }
            fn description(&self) -> &str {
                "A test tool"
            }
            fn parameters(&self) -> Value {
                json!({
                    "type": "object",
                    "properties": { "msg": { "type": "string" } },
                    "required": ["msg"]
                })
            }
            async fn execute(&self, _params: HashMap<String, Value>) -> anyhow::Result<String> {
                Ok("ok".into())
            }
        }

        let def = DummyTool.to_definition();
        assert_eq!(def.function.name, "dummy");
        assert_eq!(def.function.description, "A test tool");
        assert_eq!(def.tool_type, "function");
        assert!(DummyTool.defaults().is_empty());
        assert_eq!(DummyTool.execute(HashMap::new()).await.unwrap(), "ok");
    }
}

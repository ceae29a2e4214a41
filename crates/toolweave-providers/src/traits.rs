//! LLM provider trait: the model boundary.
//!
//! The agent loop only ever talks to a `dyn LlmProvider`; `HttpProvider`
//! covers every OpenAI-compatible API and tests substitute scripted mocks.

use async_trait::async_trait;
use toolweave_core::types::{LlmResponse, Message, ToolDefinition};
use toolweave_core::ProviderError;

/// How the model may use the advertised tools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolChoice {
    /// The model decides.
    #[default]
    Auto,
    /// Tools are visible but must not be called.
    None,
    /// The model must call at least one tool.
    Required,
}

impl ToolChoice {
    /// Wire value for the `tool_choice` request field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::None => "none",
            ToolChoice::Required => "required",
        }
    }
}

/// Configuration passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Tool usage policy; only sent when tools are advertised.
    pub tool_choice: ToolChoice,
    /// Request an SSE stream instead of a single JSON body.
    pub stream: bool,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
            tool_choice: ToolChoice::Auto,
            stream: false,
        }
    }
}

impl LlmRequestConfig {
    /// Same settings with a different tool policy.
    pub fn with_tool_choice(&self, tool_choice: ToolChoice) -> Self {
        Self {
            tool_choice,
            ..self.clone()
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` : Conversation in OpenAI format.
    /// * `tools`    : Optional list of tool definitions the LLM can call.
    /// * `model`    : Model identifier (e.g. `"gpt-4o"`).
    /// * `config`   : Temperature, max_tokens, tool choice, streaming.
    ///
    /// # Returns
    /// An `LlmResponse` with content and/or tool calls, or a
    /// [`ProviderError`] the caller should treat as fatal for the run.
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

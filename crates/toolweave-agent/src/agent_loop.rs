//! Agent loop: the THINK → ACT → SUMMARIZE state machine.
//!
//! One `run` takes a user prompt through bounded reasoning cycles. Each cycle
//! asks the model for a step (THINK) and executes the tool calls it returns
//! (ACT). The run ends when the model answers without tools, or with one
//! final tool-free summary call (SUMMARIZE) after `terminate` or after the
//! step budget is spent.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use toolweave_core::config::AgentDefaults;
use toolweave_core::types::{LlmResponse, Message, ToolCall, ToolDefinition};
use toolweave_core::ProviderError;
use toolweave_providers::{LlmProvider, LlmRequestConfig, ToolChoice};

use crate::context::{is_terminate, ContextBuilder, Directive};
use crate::memory::{ConversationMemory, DEFAULT_MEMORY_CAPACITY};
use crate::tools::ToolRegistry;

/// Default maximum THINK/ACT cycles per run.
const DEFAULT_MAX_STEPS: u32 = 20;

/// Tool result recorded for calls left in a batch after `terminate`.
const SKIPPED_AFTER_TERMINATE: &str = "Skipped: the run was terminated by an earlier call.";

// ─────────────────────────────────────────────
// Config / outcome / error
// ─────────────────────────────────────────────

/// Per-agent settings.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Model to use (falls back to the provider default when `None`).
    pub model: Option<String>,
    /// Maximum THINK/ACT cycles before a forced summary.
    pub max_steps: u32,
    /// Conversation memory capacity, in messages.
    pub memory_capacity: usize,
    /// Request SSE streaming from the provider.
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Replaces the built-in system prompt.
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_steps: DEFAULT_MAX_STEPS,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            stream: false,
            max_tokens: 8192,
            temperature: 0.7,
            system_prompt: None,
        }
    }
}

impl From<&AgentDefaults> for AgentConfig {
    fn from(defaults: &AgentDefaults) -> Self {
        Self {
            model: Some(defaults.model.clone()).filter(|m| !m.is_empty()),
            max_steps: defaults.max_steps,
            memory_capacity: defaults.memory_capacity,
            stream: defaults.stream,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            system_prompt: defaults.system_prompt.clone(),
        }
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The model replied without tool calls.
    Answered,
    /// The model called `terminate`.
    Terminated,
    /// `max_steps` cycles ran without a final answer.
    StepLimit,
}

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct AgentOutcome {
    /// Final answer text (empty if the model returned no content).
    pub answer: String,
    /// THINK/ACT cycles executed.
    pub steps: u32,
    pub stop_reason: StopReason,
    /// Conversation memory as it stood when the run ended.
    pub transcript: Vec<Message>,
}

/// Fatal failure of a run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model call failed at step {step}: {source}")]
    Provider {
        step: u32,
        #[source]
        source: ProviderError,
    },
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

pub struct AgentLoop {
    /// LLM provider.
    provider: Arc<dyn LlmProvider>,
    /// Model to use (overrides provider default if set).
    model: String,
    max_steps: u32,
    /// LLM request config (temperature, max_tokens, streaming).
    request_config: LlmRequestConfig,
    tools: ToolRegistry,
    context: ContextBuilder,
    memory: ConversationMemory,
}

impl AgentLoop {
    pub fn new(provider: Arc<dyn LlmProvider>, tools: ToolRegistry, config: AgentConfig) -> Self {
        let model = config
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());

        let request_config = LlmRequestConfig {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            tool_choice: ToolChoice::Auto,
            stream: config.stream,
        };

        info!(
            model = %model,
            provider = provider.display_name(),
            max_steps = config.max_steps,
            tools = tools.len(),
            "agent loop initialized"
        );

        Self {
            provider,
            model,
            max_steps: config.max_steps,
            request_config,
            tools,
            context: ContextBuilder::new(config.system_prompt.as_deref()),
            memory: ConversationMemory::new(config.memory_capacity),
        }
    }

    /// Run one prompt to completion.
    ///
    /// Memory is cleared when the run ends, successfully or not.
    pub async fn run(&mut self, prompt: &str) -> Result<AgentOutcome, AgentError> {
        let result = self.drive(prompt).await;
        self.memory.clear();
        result
    }

    async fn drive(&mut self, prompt: &str) -> Result<AgentOutcome, AgentError> {
        self.memory.append(Message::user(prompt));
        let definitions = self.tools.definitions();

        let mut step = 0;
        let mut terminated = false;

        while step < self.max_steps {
            step += 1;

            // THINK
            debug!(step, "think");
            let reply = self
                .call_model(Directive::NextStep, &definitions, ToolChoice::Auto, step)
                .await?;
            self.memory.append(reply.to_message());

            if !reply.has_tool_calls() {
                info!(step, "agent answered");
                return Ok(self.finish(reply.content, step, StopReason::Answered));
            }

            // ACT
            terminated = self.act(&reply.tool_calls, step).await;
            if terminated {
                break;
            }
        }

        // SUMMARIZE
        let stop_reason = if terminated {
            StopReason::Terminated
        } else {
            warn!(max_steps = self.max_steps, "step limit reached");
            StopReason::StepLimit
        };
        debug!(step, reason = ?stop_reason, "summarize");
        let reply = self
            .call_model(Directive::FinalStep, &definitions, ToolChoice::None, step)
            .await?;
        self.memory.append(reply.to_message());

        Ok(self.finish(reply.content, step, stop_reason))
    }

    /// Execute a batch of tool calls in order. Returns whether `terminate`
    /// was called.
    ///
    /// Every call id in the batch is answered by a tool message, so the
    /// assistant turn stays well-formed for the provider. Failure notices
    /// follow the tool messages as assistant messages.
    async fn act(&mut self, calls: &[ToolCall], step: u32) -> bool {
        let mut failures = Vec::new();
        let mut terminated = false;

        for call in calls {
            let name = call.function.name.as_str();
            if terminated {
                debug!(tool = %name, step, "tool call skipped after terminate");
                self.memory
                    .append(Message::tool_result(&call.id, SKIPPED_AFTER_TERMINATE));
                continue;
            }

            info!(tool = %name, step, "executing tool call");
            match self.tools.execute_call(call).await {
                Ok(result) => {
                    debug!(tool = %name, result_len = result.len(), "tool result");
                    self.memory.append(Message::tool_result(&call.id, result));
                }
                Err(e) => {
                    warn!(tool = %name, error = %e, "tool call failed");
                    let detail = e.detail();
                    self.memory
                        .append(Message::tool_result(&call.id, format!("Error: {detail}")));
                    failures.push(format!(
                        "Tool `{name}` failed: {detail}. Consider a different tool."
                    ));
                }
            }

            if is_terminate(name) && self.tools.has(name) {
                info!(step, "terminate called");
                terminated = true;
            }
        }

        self.memory
            .extend(failures.into_iter().map(Message::assistant));
        terminated
    }

    async fn call_model(
        &self,
        directive: Directive,
        definitions: &[ToolDefinition],
        tool_choice: ToolChoice,
        step: u32,
    ) -> Result<LlmResponse, AgentError> {
        let messages = self.context.build_messages(self.memory.snapshot(), directive);
        let config = self.request_config.with_tool_choice(tool_choice);
        let tools = (!definitions.is_empty()).then_some(definitions);

        let reply = self
            .provider
            .chat(&messages, tools, &self.model, &config)
            .await
            .map_err(|source| AgentError::Provider { step, source })?;

        if let Some(reasoning) = &reply.reasoning_content {
            debug!(step, reasoning_len = reasoning.len(), "model reasoning");
        }
        Ok(reply)
    }

    fn finish(&self, answer: Option<String>, steps: u32, stop_reason: StopReason) -> AgentOutcome {
        AgentOutcome {
            answer: answer.unwrap_or_default(),
            steps,
            stop_reason,
            transcript: self.memory.snapshot().to_vec(),
        }
    }

    /// Clear conversation memory.
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

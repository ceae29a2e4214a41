//! Folding a streamed chat completion back into one [`LlmResponse`].
//!
//! Providers emit tool calls as fragments keyed by `index`: the first
//! fragment usually carries the id and name, later ones append to the
//! argument string. Fragments for different calls may interleave.

use std::collections::BTreeMap;

use toolweave_core::types::{ChatCompletionChunk, LlmResponse, ToolCall, UsageInfo};
use tracing::{trace, warn};

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Reducer over stream chunks.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
    reasoning: String,
    calls: BTreeMap<usize, PartialToolCall>,
    last_index: Option<usize>,
    finish_reason: Option<String>,
    usage: Option<UsageInfo>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the running state.
    pub fn push(&mut self, chunk: ChatCompletionChunk) {
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }

        for choice in chunk.choices {
            let delta = choice.delta;
            if let Some(text) = delta.content {
                self.content.push_str(&text);
            }
            if let Some(text) = delta.reasoning_content {
                self.reasoning.push_str(&text);
            }
            for fragment in delta.tool_calls.unwrap_or_default() {
                let index = fragment.index.or(self.last_index).unwrap_or(0);
                self.last_index = Some(index);

                let slot = self.calls.entry(index).or_default();
                if let Some(id) = fragment.id.filter(|id| !id.is_empty()) {
                    slot.id = id;
                }
                if let Some(function) = fragment.function {
                    if let Some(name) = function.name.filter(|n| !n.is_empty()) {
                        slot.name = name;
                    }
                    if let Some(args) = function.arguments {
                        slot.arguments.push_str(&args);
                    }
                }
            }
            if let Some(reason) = choice.finish_reason {
                trace!(finish_reason = %reason, "Stream finish reason");
                self.finish_reason = Some(reason);
            }
        }
    }

    /// Number of distinct tool calls seen so far.
    pub fn pending_tool_calls(&self) -> usize {
        self.calls.len()
    }

    /// Consume the accumulator and assemble the final response.
    pub fn finish(self) -> LlmResponse {
        let mut tool_calls = Vec::with_capacity(self.calls.len());
        for (index, call) in self.calls {
            if call.name.is_empty() {
                warn!(index, "Dropping streamed tool call with no function name");
                continue;
            }
            let id = if call.id.is_empty() {
                format!("call_{index}")
            } else {
                call.id
            };
            tool_calls.push(ToolCall::new(id, call.name, call.arguments));
        }

        LlmResponse {
            content: (!self.content.is_empty()).then_some(self.content),
            tool_calls,
            finish_reason: self.finish_reason,
            usage: self.usage,
            reasoning_content: (!self.reasoning.is_empty()).then_some(self.reasoning),
        }
    }

    /// Fold a complete sequence of chunks.
    pub fn fold(chunks: impl IntoIterator<Item = ChatCompletionChunk>) -> LlmResponse {
        let mut acc = Self::new();
        for chunk in chunks {
            acc.push(chunk);
        }
        acc.finish()
    }
}

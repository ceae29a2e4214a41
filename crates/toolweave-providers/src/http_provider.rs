//! Generic HTTP-based LLM provider for OpenAI-compatible APIs.
//!
//! Talks directly to any `/chat/completions` endpoint, either as a single
//! JSON body or as an SSE stream folded by [`StreamAccumulator`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use toolweave_core::config::ProviderConfig;
use toolweave_core::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message,
    ToolDefinition,
};
use toolweave_core::ProviderError;

use crate::stream::StreamAccumulator;
use crate::traits::{LlmProvider, LlmRequestConfig};

const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A generic LLM provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider from a provider config.
    ///
    /// # Arguments
    /// * `config`  : api_key, api_base, extra_headers
    /// * `model`   : The default model to use
    pub fn new(config: &ProviderConfig, model: &str) -> Result<Self, ProviderError> {
        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!("Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(HttpProvider {
            client,
            api_base: config.base_url().to_string(),
            api_key: config.api_key.clone(),
            default_model: model.to_string(),
            extra_headers,
        })
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    fn build_request(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> ChatCompletionRequest {
        let tools = tools.filter(|t| !t.is_empty());
        ChatCompletionRequest {
            model: if model.is_empty() {
                self.default_model.clone()
            } else {
                model.to_string()
            },
            messages: messages.to_vec(),
            tools: tools.map(|t| t.to_vec()),
            tool_choice: tools.map(|_| config.tool_choice.as_str().to_string()),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
            stream: config.stream.then_some(true),
        }
    }

    async fn send(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .headers(self.extra_headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                ProviderError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %body, "API error");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<LlmResponse, ProviderError> {
        let chat_resp = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(error = %e, "Failed to parse LLM response");
            ProviderError::Decode(e.to_string())
        })?;
        chat_resp
            .into_response()
            .ok_or_else(|| ProviderError::Decode("response contained no choices".to_string()))
    }

    /// Read an SSE body chunk by chunk, folding each `data:` payload.
    async fn read_stream(
        &self,
        mut response: reqwest::Response,
    ) -> Result<LlmResponse, ProviderError> {
        let mut acc = StreamAccumulator::new();
        let mut lines = SseLineBuffer::default();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProviderError::Stream(format!("failed to read streaming chunk: {e}")))?
        {
            lines.push(&chunk);
            while let Some(line) = lines.next_line()? {
                if feed_sse_line(line.trim(), &mut acc) {
                    return Ok(acc.finish());
                }
            }
        }

        let rest = lines.finish()?;
        feed_sse_line(rest.trim(), &mut acc);
        Ok(acc.finish())
    }
}

/// Byte buffer that yields complete lines.
///
/// Network chunks may split a multi-byte UTF-8 character, so bytes are only
/// decoded once a full line has arrived.
#[derive(Debug, Default)]
struct SseLineBuffer {
    bytes: Vec<u8>,
}

impl SseLineBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Next complete line (without its `\n`), if one is buffered.
    fn next_line(&mut self) -> Result<Option<String>, ProviderError> {
        let Some(pos) = self.bytes.iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };
        let mut line: Vec<u8> = self.bytes.drain(..=pos).collect();
        line.pop();
        decode_line(line).map(Some)
    }

    /// Whatever trails the last newline.
    fn finish(self) -> Result<String, ProviderError> {
        decode_line(self.bytes)
    }
}

fn decode_line(bytes: Vec<u8>) -> Result<String, ProviderError> {
    String::from_utf8(bytes)
        .map_err(|e| ProviderError::Stream(format!("stream line is not valid UTF-8: {e}")))
}

/// Apply one SSE line to the accumulator. Returns true on `[DONE]`.
fn feed_sse_line(line: &str, acc: &mut StreamAccumulator) -> bool {
    if line.is_empty() || line.starts_with(':') {
        return false;
    }
    let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
        return false;
    };
    if data == "[DONE]" {
        return true;
    }
    match serde_json::from_str::<ChatCompletionChunk>(data) {
        Ok(chunk) => acc.push(chunk),
        Err(e) => warn!("Skipping malformed SSE chunk: {e}; data: {data}"),
    }
    false
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        model: &str,
        config: &LlmRequestConfig,
    ) -> Result<LlmResponse, ProviderError> {
        let request_body = self.build_request(messages, tools, model, config);

        debug!(
            model = %request_body.model,
            messages = messages.len(),
            tools = request_body.tools.as_ref().map_or(0, |t| t.len()),
            tool_choice = request_body.tool_choice.as_deref().unwrap_or("-"),
            stream = config.stream,
            "Calling LLM"
        );

        let response = self.send(&request_body).await?;
        let llm_resp = if config.stream {
            self.read_stream(response).await?
        } else {
            self.read_json(response).await?
        };

        debug!(
            has_content = llm_resp.content.is_some(),
            tool_calls = llm_resp.tool_calls.len(),
            finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );
        Ok(llm_resp)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        "OpenAI-compatible"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

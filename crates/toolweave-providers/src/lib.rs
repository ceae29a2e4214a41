//! Model boundary for Toolweave.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`]: trait every chat-completion backend implements
//! - [`http_provider::HttpProvider`]: OpenAI-compatible HTTP client (JSON and SSE)
//! - [`stream::StreamAccumulator`]: folds streamed deltas into one response

pub mod http_provider;
pub mod stream;
pub mod traits;

pub use http_provider::HttpProvider;
pub use stream::StreamAccumulator;
pub use traits::{LlmProvider, LlmRequestConfig, ToolChoice};

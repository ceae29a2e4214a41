//! Typed errors for the two boundaries the agent loop crosses.
//!
//! Tool failures are recoverable: the loop turns them into a conversation
//! message and keeps going. Provider failures are fatal for the run.

use thiserror::Error;

/// Failure while looking up, preparing, or running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{0}' is not registered")]
    NotFound(String),

    #[error("invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ToolError {
    /// Name of the tool the error refers to.
    pub fn tool_name(&self) -> &str {
        match self {
            ToolError::NotFound(tool)
            | ToolError::InvalidArguments { tool, .. }
            | ToolError::Execution { tool, .. } => tool,
        }
    }

    /// The failure without the tool name, for messages that already name it.
    pub fn detail(&self) -> String {
        match self {
            ToolError::NotFound(_) => "not registered".to_string(),
            ToolError::InvalidArguments { message, .. } => format!("invalid arguments: {message}"),
            ToolError::Execution { source, .. } => source.to_string(),
        }
    }
}

/// Failure at the model boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to model provider failed: {0}")]
    Request(String),

    #[error("model provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("could not decode model response: {0}")]
    Decode(String),

    #[error("model stream failed: {0}")]
    Stream(String),
}

impl ProviderError {
    /// Whether the failure came from the HTTP status rather than transport.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

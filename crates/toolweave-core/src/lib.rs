//! Toolweave core: OpenAI-format wire types, typed errors, configuration,
//! and small path helpers shared by every other crate.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{ProviderError, ToolError};

//! Tool modules for the Toolweave agent.

pub mod base;
pub mod builtin;
pub mod function;
pub mod registry;
pub mod remote;

pub use base::{require_i64, require_string, Tool};
pub use builtin::{add_tool, current_time_tool, TerminateTool, TERMINATE_TOOL};
pub use function::FunctionTool;
pub use registry::ToolRegistry;
pub use remote::{RemoteTool, ToolHost};

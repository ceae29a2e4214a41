//! Toolweave agent: schema compiler, tools, memory, protocol adapter and loop.
//!
//! This crate contains:
//! - **schema**: declared signatures → JSON-Schema tool descriptors
//! - **tools**: Tool trait, closure/remote tools, registry, built-ins
//! - **memory**: bounded conversation log
//! - **adapter**: MCP-style descriptors → native function descriptors
//! - **context**: working-view construction and directive prompts
//! - **agent_loop**: THINK → ACT → SUMMARIZE state machine

pub mod adapter;
pub mod agent_loop;
pub mod context;
pub mod memory;
pub mod schema;
pub mod tools;

pub use adapter::{ForeignInputSchema, ForeignTool, ProtocolAdapter};
pub use agent_loop::{AgentConfig, AgentError, AgentLoop, AgentOutcome, StopReason};
pub use context::ContextBuilder;
pub use memory::ConversationMemory;
pub use schema::{
    CompiledSchema, Described, Param, SchemaCompiler, SchemaOptions, ToolSignature, TypeShape,
};
pub use tools::{FunctionTool, RemoteTool, Tool, ToolHost, ToolRegistry, TERMINATE_TOOL};

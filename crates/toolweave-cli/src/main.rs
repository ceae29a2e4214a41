//! Toolweave CLI: entry point.
//!
//! # Commands
//!
//! - `toolweave agent [-m MESSAGE] [--logs]`: run the agent (single-shot or REPL)
//! - `toolweave adapt FILE [--strict]`: convert MCP-style tool descriptors
//! - `toolweave tools`: print the built-in tool definitions
//! - `toolweave onboard`: write a default config
//! - `toolweave status`: show configuration and provider status

mod adapt_cmd;
mod helpers;
mod onboard;
mod repl;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use toolweave_agent::schema::SchemaOptions;
use toolweave_agent::tools::{add_tool, current_time_tool, TerminateTool};
use toolweave_agent::{AgentConfig, AgentLoop, ToolRegistry};
use toolweave_core::config::{load_config, Config};
use toolweave_providers::HttpProvider;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Toolweave: a tool-calling agent runtime
#[derive(Parser)]
#[command(name = "toolweave", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent (single-shot or interactive REPL)
    Agent {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Convert MCP-style tool descriptors into function-calling definitions
    Adapt {
        /// JSON file: an array of tools, or an object with a "tools" array
        file: PathBuf,

        /// Emit strict schemas (every parameter required, no extra properties)
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Print the built-in tool definitions
    Tools,

    /// Write a default configuration file
    Onboard,

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Agent { message, logs } => {
            init_logging(logs);
            run_agent(message).await
        }
        Commands::Adapt { file, strict } => adapt_cmd::run(&file, strict),
        Commands::Tools => {
            let config = load_config(None);
            helpers::print_definitions(&builtin_registry(&config).definitions())
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

// ─────────────────────────────────────────────
// Agent command
// ─────────────────────────────────────────────

async fn run_agent(message: Option<String>) -> Result<()> {
    let config = load_config(None);
    let mut agent = build_agent(&config)?;

    match message {
        Some(msg) => {
            info!("processing single message");
            let outcome = agent.run(&msg).await.context("agent run failed")?;
            helpers::print_outcome(&outcome);
        }
        None => {
            repl::run(agent).await?;
        }
    }

    Ok(())
}

/// Build an `AgentLoop` from the loaded configuration.
pub fn build_agent(config: &Config) -> Result<AgentLoop> {
    if !config.provider.is_configured() {
        anyhow::bail!("no API key configured; run `toolweave onboard` and set provider.apiKey");
    }

    let provider = HttpProvider::new(&config.provider, &config.agent.model)
        .context("failed to create provider")?;

    Ok(AgentLoop::new(
        Arc::new(provider),
        builtin_registry(config),
        AgentConfig::from(&config.agent),
    ))
}

/// Registry holding the built-in tools, compiled with the configured strictness.
pub fn builtin_registry(config: &Config) -> ToolRegistry {
    let options = SchemaOptions {
        strict: config.agent.strict_schemas,
    };
    let mut tools = ToolRegistry::with_options(options);
    tools.register(Arc::new(TerminateTool));
    tools.register(Arc::new(add_tool(options)));
    tools.register(Arc::new(current_time_tool(options)));
    tools
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("toolweave=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

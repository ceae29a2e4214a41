//! Shared CLI helpers: outcome printing, definition listing, banner.

use anyhow::Result;
use colored::Colorize;

use toolweave_agent::{AgentOutcome, StopReason};
use toolweave_core::types::ToolDefinition;
use toolweave_core::utils::truncate_string;

/// Print an agent outcome to stdout.
pub fn print_outcome(outcome: &AgentOutcome) {
    println!();
    println!("{}", "toolweave".cyan().bold());
    if outcome.answer.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{}", outcome.answer);
    }
    println!(
        "{}",
        format!("{} step(s), {}", outcome.steps, stop_label(outcome.stop_reason)).dimmed()
    );
    println!();
}

fn stop_label(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Answered => "answered",
        StopReason::Terminated => "terminated",
        StopReason::StepLimit => "step limit reached",
    }
}

/// Print tool definitions as pretty JSON, with a one-line summary per tool
/// on stderr.
pub fn print_definitions(definitions: &[ToolDefinition]) -> Result<()> {
    for def in definitions {
        eprintln!(
            "{} {}",
            def.name().green().bold(),
            truncate_string(&def.function.description, 60).dimmed()
        );
    }
    println!("{}", serde_json::to_string_pretty(definitions)?);
    Ok(())
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "toolweave".cyan().bold(), version.dimmed());
    println!("{}", "Type a message, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print a "thinking" placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_labels() {
        assert_eq!(stop_label(StopReason::Answered), "answered");
        assert_eq!(stop_label(StopReason::StepLimit), "step limit reached");
    }

    #[test]
    fn print_definitions_serializes() {
        let defs = vec![ToolDefinition::new(
            "add",
            "Add two integers",
            serde_json::json!({"type": "object", "properties": {}, "required": []}),
        )];
        assert!(print_definitions(&defs).is_ok());
    }
}

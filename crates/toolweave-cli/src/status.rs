//! `toolweave status`: show configuration and provider status.

use anyhow::Result;
use colored::Colorize;

use toolweave_core::config::{get_config_path, load_config};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "toolweave status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    let agent = &config.agent;
    println!("  {:<18} {}", "Model:".bold(), agent.model);
    println!(
        "  {:<18} {} | max_tokens: {}",
        "Parameters:".bold(),
        format!("temp: {}", agent.temperature).dimmed(),
        format!("{}", agent.max_tokens).dimmed(),
    );
    println!(
        "  {:<18} max_steps: {} | memory: {} | stream: {} | strict: {}",
        "Loop:".bold(),
        agent.max_steps,
        agent.memory_capacity,
        agent.stream,
        agent.strict_schemas,
    );

    println!();
    let key_status = if config.provider.is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    };
    println!("  {:<18} {}", "Provider:".bold(), key_status);
    println!("  {:<18} {}", "API base:".bold(), config.provider.base_url());

    println!();

    Ok(())
}

//! `toolweave onboard`: write a default configuration.
//!
//! - Creates `~/.toolweave/config.json` with defaults (env overrides are
//!   not applied)
//! - Creates the REPL history directory

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use toolweave_core::config::{get_config_path, save_config, Config};
use toolweave_core::utils::get_history_path;

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "toolweave setup".cyan().bold());
    println!();

    let config_path = get_config_path();
    let verb = if write_default_config(&config_path)? {
        "created config at"
    } else {
        "config already exists at"
    };
    println!("  {} {} {}", "✓".green(), verb, config_path.display());

    let history_dir = get_history_path();
    std::fs::create_dir_all(&history_dir)?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    println!();
    println!(
        "{}",
        "Set provider.apiKey in the config (or TOOLWEAVE_PROVIDER__API_KEY), then run `toolweave agent`."
            .dimmed()
    );
    println!();

    Ok(())
}

/// Write `Config::default()` to `path` unless a file is already there.
/// Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_ignores_env_key() {
        std::env::set_var("TOOLWEAVE_PROVIDER__API_KEY", "sk-from-env");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert!(write_default_config(&path).unwrap());
        let written = std::fs::read_to_string(&path).unwrap();
        std::env::remove_var("TOOLWEAVE_PROVIDER__API_KEY");

        assert!(!written.contains("sk-from-env"));
        assert!(written.contains("gpt-4o-mini"));
    }

    #[test]
    fn existing_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"agent\": {\"model\": \"custom\"}}").unwrap();

        assert!(!write_default_config(&path).unwrap());
        assert!(std::fs::read_to_string(&path).unwrap().contains("custom"));
    }
}

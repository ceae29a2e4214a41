//! Config loader: reads `~/.toolweave/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.toolweave/config.json`
//! 3. Environment variables `TOOLWEAVE_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given path (or the default one) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Read and parse a config file without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `TOOLWEAVE_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `TOOLWEAVE_AGENT__MODEL`
/// - `TOOLWEAVE_AGENT__MAX_STEPS`
/// - `TOOLWEAVE_AGENT__MEMORY_CAPACITY`
/// - `TOOLWEAVE_AGENT__STREAM`
/// - `TOOLWEAVE_AGENT__MAX_TOKENS`
/// - `TOOLWEAVE_AGENT__TEMPERATURE`
/// - `TOOLWEAVE_AGENT__STRICT_SCHEMAS`
/// - `TOOLWEAVE_PROVIDER__API_KEY`
/// - `TOOLWEAVE_PROVIDER__API_BASE`
///
/// Values that fail to parse are ignored with a warning.
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("TOOLWEAVE_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Some(n) = env_parsed("TOOLWEAVE_AGENT__MAX_STEPS") {
        config.agent.max_steps = n;
    }
    if let Some(n) = env_parsed("TOOLWEAVE_AGENT__MEMORY_CAPACITY") {
        config.agent.memory_capacity = n;
    }
    if let Ok(val) = std::env::var("TOOLWEAVE_AGENT__STREAM") {
        config.agent.stream = is_truthy(&val);
    }
    if let Some(n) = env_parsed("TOOLWEAVE_AGENT__MAX_TOKENS") {
        config.agent.max_tokens = n;
    }
    if let Some(t) = env_parsed("TOOLWEAVE_AGENT__TEMPERATURE") {
        config.agent.temperature = t;
    }
    if let Ok(val) = std::env::var("TOOLWEAVE_AGENT__STRICT_SCHEMAS") {
        config.agent.strict_schemas = is_truthy(&val);
    }

    if let Ok(val) = std::env::var("TOOLWEAVE_PROVIDER__API_KEY") {
        config.provider.api_key = val;
    }
    if let Ok(val) = std::env::var("TOOLWEAVE_PROVIDER__API_BASE") {
        config.provider.api_base = Some(val);
    }

    config
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {key}={raw:?}: not a valid value");
            None
        }
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(val, "true" | "1" | "yes")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

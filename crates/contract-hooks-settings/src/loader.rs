//! Settings loading with deep merge and environment variable overrides.
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::HooksSettings;

/// Env var overriding `server.host`.
pub const ENV_HOST: &str = "CONTRACT_HOOKS_HOST";
/// Env var overriding `server.port` (1-65535).
pub const ENV_PORT: &str = "CONTRACT_HOOKS_PORT";
/// Env var overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "CONTRACT_HOOKS_LOG_LEVEL";

/// Resolve the path to the settings file (`~/.contract-hooks/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".contract-hooks")
        .join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<HooksSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<HooksSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    });
    validate(&settings)?;
    Ok(settings)
}

/// Defaults with the settings file (if any) merged on top.
fn load_file_layer(path: &Path) -> Result<HooksSettings> {
    let defaults = serde_json::to_value(HooksSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply overrides read through `lookup` (the process environment in
/// production). Invalid values are ignored with a warning.
pub fn apply_overrides(settings: &mut HooksSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(ENV_HOST) {
        settings.server.host = v;
    }
    if let Some(raw) = lookup(ENV_PORT) {
        match parse_u16_range(&raw, 1, u16::MAX) {
            Some(port) => settings.server.port = port,
            None => warn!(key = ENV_PORT, value = %raw, "invalid port env var, ignoring"),
        }
    }
    if let Some(v) = lookup(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

fn validate(settings: &HooksSettings) -> Result<()> {
    if settings.server.host.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "server.host must not be empty".to_string(),
        ));
    }
    if settings.logging.level.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "logging.level must not be empty".to_string(),
        ));
    }
    Ok(())
}

//! # contract-hooks-settings
//!
//! Configuration for the hooks-handler server, loaded from three layers
//! (in priority order):
//! 1. **Compiled defaults** — [`HooksSettings::default()`]
//! 2. **User file** — `~/.contract-hooks/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `CONTRACT_HOOKS_*` overrides (highest priority)
//!
//! Command-line flags, where the binary offers them, override all three.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{HooksSettings, LoggingSettings, ServerSettings};

//! Application settings loaded from `config.toml` with environment
//! overrides.
//!
//! Settings cover the knobs the accounting rules leave open: how far a
//! member account may be overdrawn when consuming, and how often the
//! expired-plan sweep runs. A missing file yields the defaults.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const CONFIG_FILE: &str = "config.toml";

/// Application-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// How far a member account may go below zero when paying for
    /// consumption. `None` disables the balance check entirely.
    pub allowed_member_overdraw: Option<f64>,
    /// Seconds between two runs of the expired-plan sweep.
    pub expiry_tick_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            allowed_member_overdraw: Some(0.0),
            expiry_tick_seconds: 3600,
        }
    }
}

impl AppSettings {
    /// The overdraw threshold as an exact decimal, `None` when the check is
    /// disabled.
    #[must_use]
    pub fn allowed_overdraw(&self) -> Option<Decimal> {
        self.allowed_member_overdraw
            .and_then(|raw| Decimal::try_from(raw).ok())
    }
}

/// Loads settings from `config.toml` in the working directory, falling back
/// to defaults when the file does not exist.
pub fn load_settings() -> Result<AppSettings> {
    load_settings_from(Path::new(CONFIG_FILE))
}

fn load_settings_from(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        info!("No {} found, using default settings.", path.display());
        return Ok(AppSettings::default());
    }
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

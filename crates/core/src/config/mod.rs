use std::{collections::BTreeMap, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{CortexError, KeyBindings, Result, Stage, Transport, QUIT_KEYS};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub display: DisplayConfig,
    /// Key bindings layered over the defaults.
    pub keys: BTreeMap<String, Transport>,
}

impl AppConfig {
    /// Reads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(?path, "loaded configuration");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.playback.tick_interval_ms == 0 {
            return Err(CortexError::InvalidConfig(
                "playback.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if let Some(key) = self.keys.keys().find(|key| QUIT_KEYS.contains(&key.as_str())) {
            return Err(CortexError::InvalidConfig(format!(
                "key \"{key}\" is reserved for quitting and cannot be rebound"
            )));
        }
        Ok(())
    }

    pub fn key_bindings(&self) -> KeyBindings {
        KeyBindings::with_overrides(&self.keys)
    }
}

/// Configuration of the playback controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    pub autoplay: bool,
    pub start_stage: Stage,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            autoplay: false,
            start_stage: Stage::FIRST,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Configuration of the terminal presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_descriptions: bool,
    band_height: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_descriptions: true,
            band_height: 2,
        }
    }
}

impl DisplayConfig {
    /// Rows per band, never less than one.
    pub fn band_height(&self) -> u16 {
        self.band_height.max(1)
    }

    pub fn with_band_height(mut self, rows: u16) -> Self {
        self.band_height = rows;
        self
    }
}

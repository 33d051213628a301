use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tag_input::TagInputOptions;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tag_input: TagInputOptions,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_cancel")]
    pub cancel: String,
    #[serde(default = "default_toggle_read_only")]
    pub toggle_read_only: String,
    #[serde(default = "default_toggle_focus")]
    pub toggle_focus: String,
    #[serde(default = "default_paste")]
    pub paste: String,
    #[serde(default = "default_help")]
    pub help: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_chip_bg")]
    pub chip_bg: String,
    #[serde(default = "default_pending_bg")]
    pub pending_bg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_input: TagInputOptions::default(),
            key_bindings: KeyBindings::default(),
            theme: Theme::default(),
            status_timeout_secs: default_status_timeout_secs(),
            log_level: default_log_level(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            cancel: default_cancel(),
            toggle_read_only: default_toggle_read_only(),
            toggle_focus: default_toggle_focus(),
            paste: default_paste(),
            help: default_help(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            chip_bg: default_chip_bg(),
            pending_bg: default_pending_bg(),
        }
    }
}

// Default value functions
fn default_status_timeout_secs() -> u64 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_quit() -> String {
    "Ctrl+q".to_string()
}

fn default_cancel() -> String {
    "Ctrl+c".to_string()
}

fn default_toggle_read_only() -> String {
    "Ctrl+r".to_string()
}

fn default_toggle_focus() -> String {
    "Tab".to_string()
}

fn default_paste() -> String {
    "Ctrl+v".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_chip_bg() -> String {
    "darkgray".to_string()
}

fn default_pending_bg() -> String {
    "red".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid key binding for '{name}': {reason}")]
    InvalidKeyBinding { name: String, reason: String },
}

impl Config {
    /// Load configuration for a profile, creating the default file if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_or_create(&config_path)
    }

    /// Load from an explicit path. A missing file gets the defaults written to it.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "config loaded");
            Ok(config)
        } else {
            let mut config = Config::default();
            config.save_to(path)?;
            tracing::info!(path = %path.display(), "default config written");
            Ok(config)
        }
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Reject key bindings that would never match a key press
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bindings = [
            ("quit", &self.key_bindings.quit),
            ("cancel", &self.key_bindings.cancel),
            ("toggle_read_only", &self.key_bindings.toggle_read_only),
            ("toggle_focus", &self.key_bindings.toggle_focus),
            ("paste", &self.key_bindings.paste),
            ("help", &self.key_bindings.help),
        ];
        for (name, binding) in bindings {
            utils::parse_key_binding(binding).map_err(|reason| ConfigError::InvalidKeyBinding {
                name: name.to_string(),
                reason,
            })?;
        }
        Ok(())
    }
}

use anyhow::{anyhow, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Encoding label forced for subtitle decoding; detected per file
    /// when absent
    #[serde(default)]
    pub default_encoding: Option<String>,

    /// Allowed relative difference between caption span and media
    /// duration during sync validation
    #[serde(default = "default_sync_tolerance")]
    pub sync_tolerance: f64,

    /// Chunk size in bytes for media delivery
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level used by the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_sync_tolerance() -> f64 {
    0.05 // 5% relative difference
}

fn default_chunk_size() -> usize {
    1024 * 1024 // 1 MiB chunks
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_encoding: None,
            sync_tolerance: default_sync_tolerance(),
            chunk_size: default_chunk_size(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !(self.sync_tolerance > 0.0 && self.sync_tolerance <= 1.0) {
            return Err(anyhow!(
                "sync_tolerance must be in (0, 1], got {}",
                self.sync_tolerance
            ));
        }

        if self.chunk_size == 0 {
            return Err(anyhow!("chunk_size must be greater than zero"));
        }

        if let Some(label) = &self.default_encoding {
            if Encoding::for_label(label.as_bytes()).is_none() {
                return Err(anyhow!("Unknown encoding label: {}", label));
            }
        }

        Ok(())
    }
}

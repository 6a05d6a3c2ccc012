//! Process-wide logging setup on top of `env_logger`.
//!
//! Code logs through the `log` macros; this module only installs the backend.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static LOGGING_CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level for all modules
    #[serde(default = "default_level")]
    pub default_level: String,
    /// Per-module levels, e.g. `"access_ledger::ledger" = "DEBUG"`
    #[serde(default)]
    pub module_levels: HashMap<String, String>,
}

fn default_level() -> String {
    "INFO".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            module_levels: HashMap::new(),
        }
    }
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Failed to install logger: {0}")]
    Install(#[from] log::SetLoggerError),
}

pub fn parse_level(level: &str) -> Result<log::LevelFilter, LoggingError> {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Ok(log::LevelFilter::Trace),
        "DEBUG" => Ok(log::LevelFilter::Debug),
        "INFO" => Ok(log::LevelFilter::Info),
        "WARN" => Ok(log::LevelFilter::Warn),
        "ERROR" => Ok(log::LevelFilter::Error),
        "OFF" => Ok(log::LevelFilter::Off),
        _ => Err(LoggingError::InvalidLevel(level.to_string())),
    }
}

pub struct LoggingSystem;

impl LoggingSystem {
    /// Installs `env_logger` configured from `config`. `RUST_LOG`, when set,
    /// is applied last and wins.
    pub fn init_with_config(config: &LogConfig) -> Result<(), LoggingError> {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(parse_level(&config.default_level)?);
        for (module, level) in &config.module_levels {
            builder.filter_module(module, parse_level(level)?);
        }
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }

        LOGGING_CONFIG
            .set(config.clone())
            .map_err(|_| LoggingError::AlreadyInitialized)?;
        builder.try_init()?;
        Ok(())
    }

    /// The configuration logging was initialized with, if any.
    pub fn config() -> Option<&'static LogConfig> {
        LOGGING_CONFIG.get()
    }
}

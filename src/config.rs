use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file consulted when no path is given and `ACCESS_LEDGER_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/access_ledger.toml";

pub const ENV_CONFIG_PATH: &str = "ACCESS_LEDGER_CONFIG";
pub const ENV_STORAGE_PATH: &str = "ACCESS_LEDGER_STORAGE_PATH";
pub const ENV_BIND_ADDRESS: &str = "ACCESS_LEDGER_BIND_ADDRESS";
pub const ENV_RECOGNIZER_URL: &str = "ACCESS_LEDGER_RECOGNIZER_URL";
pub const ENV_RECOGNIZER_TIMEOUT: &str = "ACCESS_LEDGER_RECOGNIZER_TIMEOUT_SECONDS";
pub const ENV_LOG_LEVEL: &str = "ACCESS_LEDGER_LOG_LEVEL";

const MAX_RECOGNIZER_TIMEOUT_SECONDS: u64 = 300;

/// Where and how to reach the biometric recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    #[serde(default = "default_recognizer_url")]
    pub base_url: String,
    /// Upper bound for one recognition call
    #[serde(default = "default_recognizer_timeout")]
    pub timeout_seconds: u64,
}

fn default_recognizer_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_recognizer_timeout() -> u64 {
    30
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            base_url: default_recognizer_url(),
            timeout_seconds: default_recognizer_timeout(),
        }
    }
}

impl RecognizerConfig {
    pub fn validate(&self) -> AccessLedgerResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AccessLedgerError::Config(
                "Recognizer base_url must not be empty".to_string(),
            ));
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_RECOGNIZER_TIMEOUT_SECONDS {
            return Err(AccessLedgerError::Config(format!(
                "Recognizer timeout must be between 1 and {} seconds, got {}",
                MAX_RECOGNIZER_TIMEOUT_SECONDS, self.timeout_seconds
            )));
        }
        Ok(())
    }
}

/// Configuration for an access ledger node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Path where the node will store its data
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    /// Origins allowed by CORS; empty means any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data")
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            bind_address: default_bind_address(),
            recognizer: RecognizerConfig::default(),
            cors_allowed_origins: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Create a new node configuration with the specified storage path
    pub fn new(storage_path: PathBuf) -> Self {
        Self {
            storage_path,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> AccessLedgerResult<()> {
        if self.bind_address.trim().is_empty() {
            return Err(AccessLedgerError::Config(
                "bind_address must not be empty".to_string(),
            ));
        }
        self.recognizer.validate()
    }

    /// Applies `ACCESS_LEDGER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AccessLedgerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(address) = lookup(ENV_BIND_ADDRESS) {
            self.bind_address = address;
        }
        if let Some(url) = lookup(ENV_RECOGNIZER_URL) {
            self.recognizer.base_url = url;
        }
        if let Some(raw) = lookup(ENV_RECOGNIZER_TIMEOUT) {
            self.recognizer.timeout_seconds = raw.trim().parse().map_err(|_| {
                AccessLedgerError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_RECOGNIZER_TIMEOUT, raw
                ))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log.default_level = level.trim().to_uppercase();
        }
        Ok(())
    }
}

/// Parses a config file. `.toml` files are TOML, anything else is JSON.
pub fn parse_node_config(path: &Path, contents: &str) -> AccessLedgerResult<NodeConfig> {
    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(contents).map_err(|e| {
            AccessLedgerError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    } else {
        serde_json::from_str(contents).map_err(|e| {
            AccessLedgerError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

/// Load a node configuration from `path`, the `ACCESS_LEDGER_CONFIG`
/// environment variable, or [`DEFAULT_CONFIG_PATH`], in that order.
///
/// A missing file yields defaults. Environment overrides are applied after
/// the file and the result is validated.
pub fn load_node_config(path: Option<&Path>) -> AccessLedgerResult<NodeConfig> {
    let config_path = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = match std::fs::read_to_string(&config_path) {
        Ok(contents) => parse_node_config(&config_path, &contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "Config file {} not found, using defaults",
                config_path.display()
            );
            NodeConfig::default()
        }
        Err(e) => {
            return Err(AccessLedgerError::Config(format!(
                "Failed to read {}: {}",
                config_path.display(),
                e
            )));
        }
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     XPENSE_SELF_ID=u1                                                  │
//! │     XPENSE_SNAPSHOT=./ledger.json                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/xpense/xpense.toml (Linux)                               │
//! │     ~/Library/Application Support/com.easyxpense.xpense/xpense.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     ./ledger.json, default LedgerPolicy                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # xpense.toml
//! [source]
//! snapshot_path = "ledger.json"
//! self_id = "u1"
//!
//! [ledger]
//! payer_share = "as_recorded"   # as_recorded | always_include_payer
//! max_participants = 50
//! currency_symbol = "₹"
//! grouping = "indian"           # indian | western
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xpense_core::{LedgerPolicy, UserId};

pub const CONFIG_FILE_NAME: &str = "xpense.toml";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Where the records come from and whose view to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// JSON snapshot `{ "expenses": [...], "settlements": [...] }`.
    pub snapshot_path: PathBuf,

    /// The user whose balances are shown.
    pub self_id: Option<UserId>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            snapshot_path: PathBuf::from("ledger.json"),
            self_id: None,
        }
    }
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub source: SourceSettings,

    #[serde(default)]
    pub ledger: LedgerPolicy,
}

impl CliConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or xpense.toml in the platform config dir)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.snapshot_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("source.snapshot_path".into()));
        }

        if let Some(ref id) = self.source.self_id {
            if id.as_str().trim().is_empty() {
                return Err(ConfigError::InvalidValue("source.self_id".into()));
            }
        }

        if !self.ledger.max_expense_amount.is_positive() {
            return Err(ConfigError::InvalidValue("ledger.max_expense_amount".into()));
        }

        if self.ledger.max_participants == 0 {
            return Err(ConfigError::InvalidValue("ledger.max_participants".into()));
        }

        if self.ledger.max_description_len == 0 {
            return Err(ConfigError::InvalidValue("ledger.max_description_len".into()));
        }

        Ok(())
    }

    /// Applies `XPENSE_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("XPENSE_SNAPSHOT") {
            debug!(path = %path, "Overriding snapshot path from environment");
            self.source.snapshot_path = PathBuf::from(path);
        }

        if let Some(id) = lookup("XPENSE_SELF_ID") {
            debug!(self_id = %id, "Overriding self id from environment");
            self.source.self_id = Some(UserId::new(id));
        }

        if let Some(mode) = lookup("XPENSE_PAYER_SHARE") {
            self.ledger.payer_share = mode
                .parse()
                .map_err(|_| ConfigError::InvalidValue("XPENSE_PAYER_SHARE".into()))?;
        }

        if let Some(grouping) = lookup("XPENSE_GROUPING") {
            self.ledger.grouping = grouping
                .parse()
                .map_err(|_| ConfigError::InvalidValue("XPENSE_GROUPING".into()))?;
        }

        if let Some(symbol) = lookup("XPENSE_CURRENCY_SYMBOL") {
            self.ledger.currency_symbol = symbol;
        }

        if let Some(max) = lookup("XPENSE_MAX_PARTICIPANTS") {
            self.ledger.max_participants = max
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("XPENSE_MAX_PARTICIPANTS".into()))?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "easyxpense", "xpense")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The observer, if one was configured.
    pub fn self_id(&self) -> Option<&UserId> {
        self.source.self_id.as_ref()
    }
}

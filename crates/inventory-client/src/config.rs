//! # Client Configuration
//!
//! Where the product and auth services live, how long to wait for them, and
//! a few display settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INVENTORY_API_URL=http://localhost:3000                            │
//! │     INVENTORY_AUTH_URL=http://localhost:3000                           │
//! │     INVENTORY_TIMEOUT_SECS=10                                          │
//! │     INVENTORY_PAGE_LIMIT=10                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/inventory-dashboard/dashboard.toml (Linux)               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # dashboard.toml
//! [api]
//! base_url = "http://localhost:3000"
//! auth_url = "http://localhost:3000"
//! timeout_secs = 10
//! connect_timeout_secs = 5
//!
//! [ui]
//! page_limit = 10
//! currency_symbol = "$"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use inventory_core::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

use crate::error::{ClientError, ClientResult};

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "dashboard.toml";

// =============================================================================
// API Settings
// =============================================================================

/// Remote service endpoints and timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the product service (`/products` is appended).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the auth service (`/auth/login` is appended).
    #[serde(default = "default_base_url")]
    pub auth_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            auth_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// =============================================================================
// UI Settings
// =============================================================================

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Products per list page when the path does not say.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            page_limit: default_page_limit(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML config file without applying overrides.
    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        for (name, value) in [("base_url", &self.api.base_url), ("auth_url", &self.api.auth_url)] {
            let url = url::Url::parse(value)
                .map_err(|e| ClientError::InvalidUrl(format!("{}: {} ({})", name, value, e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ClientError::InvalidUrl(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, value
                )));
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.ui.page_limit == 0 || self.ui.page_limit > MAX_PAGE_LIMIT {
            return Err(ClientError::InvalidConfig(format!(
                "page_limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT, self.ui.page_limit
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("INVENTORY_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = lookup("INVENTORY_AUTH_URL") {
            debug!(url = %url, "Overriding auth URL from environment");
            self.api.auth_url = url;
        }

        if let Some(secs) = lookup("INVENTORY_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric INVENTORY_TIMEOUT_SECS"),
            }
        }

        if let Some(limit) = lookup("INVENTORY_PAGE_LIMIT") {
            match limit.parse::<u32>() {
                Ok(l) => self.ui.page_limit = l,
                Err(_) => warn!(value = %limit, "Ignoring non-numeric INVENTORY_PAGE_LIMIT"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "inventory", "inventory-dashboard")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Same config pointed at a different product service.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api.auth_url = url.clone();
        self.api.base_url = url;
        self
    }
}

//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CLOUDMART_DATA_DIR` - Directory holding the persisted cart (default: `.cloudmart`)
//! - `CLOUDMART_CART_KEY` - Storage key for the cart (default: `cloudmart_cart`)
//! - `CLOUDMART_API_URL` - Base URL of the order API (required by `order place`)

use std::path::PathBuf;

use cloudmart_cart::CART_KEY;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Key the cart is persisted under
    pub cart_key: String,
    /// Order API base URL, if configured
    pub api_url: Option<Url>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(
            lookup("CLOUDMART_DATA_DIR").unwrap_or_else(|| ".cloudmart".to_string()),
        );

        let cart_key = lookup("CLOUDMART_CART_KEY").unwrap_or_else(|| CART_KEY.to_string());
        if cart_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CLOUDMART_CART_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let api_url = lookup("CLOUDMART_API_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("CLOUDMART_API_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            data_dir,
            cart_key,
            api_url,
        })
    }

    /// The order API URL, required for placing orders.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `CLOUDMART_API_URL` is unset.
    pub fn require_api_url(&self) -> Result<&Url, ConfigError> {
        self.api_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CLOUDMART_API_URL".to_string()))
    }
}

//! Configuration module for dmail.

use candid::Principal;
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::{DmailError, Result};

/// Backend (replica and registry) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Replica or boundary node URL.
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Canister id of the mail registry.
    #[serde(default)]
    pub registry_canister_id: String,
    /// Fetch the root key before the first call (local replicas only).
    #[serde(default)]
    pub fetch_root_key: bool,
}

fn default_backend_url() -> String {
    "https://icp-api.io".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            registry_canister_id: String::new(),
            fetch_root_key: false,
        }
    }
}

impl BackendConfig {
    /// Parsed registry canister id.
    pub fn registry_principal(&self) -> Result<Principal> {
        Principal::from_text(&self.registry_canister_id).map_err(|e| {
            DmailError::Config(format!(
                "invalid registry_canister_id '{}': {e}",
                self.registry_canister_id
            ))
        })
    }
}

/// Identity configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IdentityConfig {
    /// Path to a PEM encoded identity. Unset means the session stays
    /// unauthenticated.
    #[serde(default)]
    pub pem_file: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dmail.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Webmail server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Whether the webmail server is enabled.
    #[serde(default = "default_web_enabled")]
    pub enabled: bool,
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the webmail API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the frontend bundle.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to the frontend bundle.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_web_enabled() -> bool {
    true
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: default_web_enabled(),
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Identity configuration.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Webmail configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DmailError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DmailError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DMAIL_REGISTRY_CANISTER_ID`: Override the registry canister id
    /// - `DMAIL_IDENTITY_PEM`: Override the identity PEM file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("DMAIL_REGISTRY_CANISTER_ID") {
            if !id.is_empty() {
                self.backend.registry_canister_id = id;
            }
        }

        if let Ok(pem) = std::env::var("DMAIL_IDENTITY_PEM") {
            if !pem.is_empty() {
                self.identity.pem_file = Some(pem);
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The backend URL is not an absolute http(s) URL
    /// - The registry canister id is not a valid principal
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.backend.url)
            .map_err(|e| DmailError::Config(format!("invalid backend url: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DmailError::Config(format!(
                "backend url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        self.backend.registry_principal()?;
        Ok(())
    }
}

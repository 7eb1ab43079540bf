//! Client configuration.
//!
//! Loaded from YAML, from a file, or from the environment:
//!
//! ```yaml
//! discover_url: "https://platform.example.com/platformservice/discover"
//! application_endpoint_id: "sip:app@contoso.com"
//! timeout_secs: 30
//! default_headers:
//!   Authorization: "Bearer ..."
//! ```

use std::collections::HashMap;
use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable holding the discover URL.
pub const ENV_DISCOVER_URL: &str = "PLATFORM_DISCOVER_URL";
/// Environment variable holding the application endpoint id.
pub const ENV_ENDPOINT_ID: &str = "PLATFORM_ENDPOINT_ID";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PLATFORM_TIMEOUT_SECS";

/// Configuration for connecting to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Absolute URL of the discovery document.
    pub discover_url: String,
    /// Endpoint identity used to select the application.
    pub application_endpoint_id: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Headers added to every request.
    #[serde(default)]
    pub default_headers: HashMap<String, String>,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_user_agent() -> String { format!("platform-sdk/{}", crate::VERSION) }

impl PlatformConfig {
    /// Create a config with default timeout, user agent and no extra headers.
    pub fn new(discover_url: impl Into<String>, application_endpoint_id: impl Into<String>) -> Self {
        Self {
            discover_url: discover_url.into(),
            application_endpoint_id: application_endpoint_id.into(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            default_headers: HashMap::new(),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Build from `PLATFORM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discover_url = lookup(ENV_DISCOVER_URL).ok_or(ConfigError::Missing(ENV_DISCOVER_URL))?;
        let endpoint_id = lookup(ENV_ENDPOINT_ID).ok_or(ConfigError::Missing(ENV_ENDPOINT_ID))?;

        let mut config = Self::new(discover_url, endpoint_id);
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS,
                reason: format!("{}", e),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the discover URL is absolute http(s) and the endpoint id is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.discover_url()?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::Invalid {
                key: "discover_url",
                reason: format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        if self.application_endpoint_id.trim().is_empty() {
            return Err(ConfigError::Missing("application_endpoint_id"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// The discover URL, parsed.
    pub fn discover_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.discover_url).map_err(|e| ConfigError::Invalid {
            key: "discover_url",
            reason: e.to_string(),
        })
    }

    /// Base URL (scheme, host and port) that relative hrefs resolve against.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        base_url_of(&self.discover_url()?).ok_or(ConfigError::Invalid {
            key: "discover_url",
            reason: "URL has no host".to_string(),
        })
    }
}

/// Strip path, query and fragment from an absolute URL.
pub fn base_url_of(absolute: &Url) -> Option<Url> {
    if absolute.cannot_be_a_base() || absolute.host_str().is_none() {
        return None;
    }
    let mut base = absolute.clone();
    base.set_path("/");
    base.set_query(None);
    base.set_fragment(None);
    Some(base)
}

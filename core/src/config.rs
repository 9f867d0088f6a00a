//! Client configuration: credentials and base URL.
//!
//! Set once when a client is constructed and never changed afterwards.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://bibles.org/v2";
pub const API_KEY_VAR: &str = "BIBLESEARCH_API_KEY";
pub const BASE_URL_VAR: &str = "BIBLESEARCH_BASE_URL";

/// Deserialization goes through [`ClientConfig::new`], so a loaded config is
/// normalized exactly like a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Deserialize)]
struct RawClientConfig {
    api_key: String,
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
        Self::new(raw.api_key, &raw.base_url)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.to_string(),
        })
    }

    /// Read `BIBLESEARCH_API_KEY` and optionally `BIBLESEARCH_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(default_base_url);
        Self::new(api_key, &base_url)
    }

    /// HTTP basic credentials: the API key as user name, `X` as password.
    pub fn authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:X", self.api_key)))
    }
}

use crate::error::QueryDeskError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "QUERYDESK_";
pub const CONFIG_FILE: &str = "querydesk.toml";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const GRAPHQL_PATH: &str = "graphql";

/// Settings as they appear in the provider block or on the command line.
/// `None` means "not set here", so the environment value is used instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Layered configuration: defaults, then `querydesk.toml`, then `QUERYDESK_*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub loglevel: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            api_key: None,
            loglevel: "info".to_string(),
            timeout_secs: 30,
            user_agent: format!("querydesk-provider/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, QueryDeskError> {
        Ok(Self::figment().extract()?)
    }

    /// Explicit settings win over whatever the layered sources produced.
    pub fn with_settings(mut self, settings: &ProviderSettings) -> Self {
        if let Some(host) = settings.host.as_ref() {
            self.host = Some(host.clone());
        }
        if let Some(api_key) = settings.api_key.as_ref() {
            self.api_key = Some(api_key.clone());
        }
        self
    }

    /// The API key, or a configuration error when it is missing or blank.
    pub fn require_api_key(&self) -> Result<&str, QueryDeskError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(QueryDeskError::MissingApiKey)
    }

    pub fn require_host(&self) -> Result<&str, QueryDeskError> {
        self.host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or(QueryDeskError::MissingHost)
    }
}

//! Client configuration
//!
//! Defaults in code, overridden by `RIM_API_URL` and `RIM_API_TIMEOUT_SECS`.

use config::{ConfigError, Environment};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8001/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the version prefix
    #[serde(rename = "url")]
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        config::Config::builder()
            .set_default("url", DEFAULT_API_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(Environment::with_prefix("RIM_API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// `path` appended to the API root with exactly one slash between them
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

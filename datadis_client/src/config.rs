//! Client configuration: base URL, timeout and retry policy.
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! base_url = "https://datadis.es"
//! timeout_ms = 30000
//!
//! [retry]
//! retries = 3
//! delay_ms = 1000
//! retry_on_rate_limit = false
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use snafu::ResultExt;
use tracing::error;

use crate::endpoints::BASE_URL;
use crate::errors::{ClientInitError, ConfigParseSnafu, ConfigReadSnafu, InvalidConfigSnafu};
use crate::retry::RetryPolicy;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "DATADIS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    pub retry: Option<RetryConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: None,
        }
    }
}

/// Serializable form of a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub retries: u32,
    pub delay_ms: u64,
    /// Also retry HTTP 429 answers. Off by default.
    pub retry_on_rate_limit: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
            retry_on_rate_limit: false,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        let policy = if self.retry_on_rate_limit {
            RetryPolicy::new(self.retries).with_condition(|_| true)
        } else {
            RetryPolicy::excluding_rate_limit(self.retries)
        };
        policy.with_fixed_delay(Duration::from_millis(self.delay_ms))
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.retry.as_ref().map(RetryConfig::to_policy)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ClientInitError> {
        let config: Self = toml::from_str(toml_str).context(ConfigParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientInitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(ConfigReadSnafu {
            path: path.display().to_string(),
        });
        let text = match text {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read config file: {e}");
                return Err(e);
            }
        };
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ClientInitError> {
        if self.timeout_ms == 0 {
            return InvalidConfigSnafu {
                message: "timeout_ms must be greater than zero",
            }
            .fail();
        }
        let base = self.base_url.trim();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return InvalidConfigSnafu {
                message: format!("base_url must be an http(s) URL, got {base:?}"),
            }
            .fail();
        }
        Ok(())
    }
}

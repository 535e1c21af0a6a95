//! Connection settings: tenant base URL, API key and request timeout.
//!
//! Built directly with `ClientConfig::new` or read from `ARMIS_BASE_URL`,
//! `ARMIS_API_KEY` and `ARMIS_TIMEOUT_SECS`. The API key never appears in
//! `Debug` output.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::info;

use crate::error::{Error, Result};

/// Default request timeout, also used when `ARMIS_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable connection settings for an Armis tenant.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Trailing slashes on `base_url` are stripped.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Transport timeout applied to every request. `None` disables it; a
    /// `CallContext` deadline still applies.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `ARMIS_BASE_URL`, `ARMIS_API_KEY` and the optional
    /// `ARMIS_TIMEOUT_SECS` (`0` disables the timeout).
    pub fn from_env() -> Result<Self> {
        let base_url = required_var("ARMIS_BASE_URL")?;
        let api_key = required_var("ARMIS_API_KEY")?;
        let mut config = Self::new(base_url, api_key);

        if let Ok(raw) = env::var("ARMIS_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("ARMIS_TIMEOUT_SECS is not a number: {raw:?}")))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        info!(base_url = %config.base_url, timeout = ?config.timeout, "loaded Armis client configuration");
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{name} must be set"))),
    }
}

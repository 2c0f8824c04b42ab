use crate::ConfigError;
use alloy::signers::local::PrivateKeySigner;
use std::{env, fmt, time::Duration};

/// The Flashbots mainnet relay.
pub const DEFAULT_RELAY_URL: &str = "https://relay.flashbots.net";

/// Default bound on a single relay call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable holding the hex-encoded signing key.
pub const SIGNER_KEY_ENV: &str = "SIGNER_PRIVATE_KEY";

/// Environment variable holding the relay URL.
pub const RELAY_URL_ENV: &str = "RELAY_URL";

/// Environment variable holding the request timeout, in milliseconds.
pub const RELAY_TIMEOUT_MS_ENV: &str = "RELAY_TIMEOUT_MS";

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load a variable from the environment
pub fn load_string_opt(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Load a variable from the environment
pub fn load_u64_opt(key: &str) -> Result<Option<u64>, ConfigError> {
    load_string_opt(key).map(|val| val.parse::<u64>()).transpose().map_err(Into::into)
}

/// Configuration for a [`RelayClient`].
///
/// The signing key is injected explicitly. [`RelayConfig::from_env`] is a
/// convenience for binaries.
///
/// [`RelayClient`]: crate::RelayClient
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    url: String,
    signer_key: String,
    timeout: Duration,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("url", &self.url)
            .field("signer_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Create a new config for the given relay URL and hex-encoded signing
    /// key, with the default timeout.
    pub fn new(url: impl Into<String>, signer_key: impl Into<String>) -> Self {
        Self { url: url.into(), signer_key: signer_key.into(), timeout: DEFAULT_TIMEOUT }
    }

    /// Load the config from the environment.
    ///
    /// - `SIGNER_PRIVATE_KEY` is required.
    /// - `RELAY_URL` defaults to [`DEFAULT_RELAY_URL`].
    /// - `RELAY_TIMEOUT_MS` defaults to [`DEFAULT_TIMEOUT`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let signer_key = load_string(SIGNER_KEY_ENV)?;
        let url = load_string_opt(RELAY_URL_ENV).unwrap_or_else(|| DEFAULT_RELAY_URL.to_owned());
        let timeout =
            load_u64_opt(RELAY_TIMEOUT_MS_ENV)?.map_or(DEFAULT_TIMEOUT, Duration::from_millis);
        Ok(Self { url, signer_key, timeout })
    }

    /// Set the request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The relay URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parse the signing key.
    pub fn signer(&self) -> Result<PrivateKeySigner, ConfigError> {
        let key = self.signer_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingKey);
        }
        key.parse().map_err(Into::into)
    }
}

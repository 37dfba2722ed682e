//! Client configuration: credentials, timeout and base URL.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Fixed root of the Productive v2 API.
pub const API_BASE_URL: &str = "https://api.productive.io/api/v2";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const AUTH_TOKEN_VAR: &str = "PRODUCTIVE_AUTH_TOKEN";
pub const ORGANIZATION_ID_VAR: &str = "PRODUCTIVE_ORGANIZATION_ID";
pub const TIMEOUT_VAR: &str = "PRODUCTIVE_TIMEOUT";
pub const BASE_URL_VAR: &str = "PRODUCTIVE_BASE_URL";

/// Immutable settings for an `ApiClient`.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    auth_token: String,
    organization_id: u64,
    timeout: Duration,
    base_url: String,
}

impl ClientConfig {
    pub fn new(auth_token: impl Into<String>, organization_id: u64) -> Self {
        Self {
            auth_token: auth_token.into(),
            organization_id,
            timeout: DEFAULT_TIMEOUT,
            base_url: API_BASE_URL.to_string(),
        }
    }

    /// Read the configuration from `PRODUCTIVE_*` environment variables.
    ///
    /// `PRODUCTIVE_AUTH_TOKEN` and `PRODUCTIVE_ORGANIZATION_ID` are required;
    /// `PRODUCTIVE_TIMEOUT` (seconds) and `PRODUCTIVE_BASE_URL` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(AUTH_TOKEN_VAR).ok_or(ConfigError::MissingVar(AUTH_TOKEN_VAR))?;
        let org = lookup(ORGANIZATION_ID_VAR).ok_or(ConfigError::MissingVar(ORGANIZATION_ID_VAR))?;
        let organization_id = org
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidOrganizationId {
                name: ORGANIZATION_ID_VAR,
                value: org.clone(),
            })?;

        let mut config = Self::new(token, organization_id);
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: f64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout_secs(secs)?;
        }
        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    /// Bound each request by `timeout`. `Duration::ZERO` waits indefinitely.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout from fractional seconds. `0.0` waits indefinitely;
    /// negative, NaN and infinite values are rejected.
    pub fn with_timeout_secs(self, secs: f64) -> Result<Self, ConfigError> {
        let timeout = Duration::try_from_secs_f64(secs)
            .map_err(|_| ConfigError::InvalidTimeout(secs.to_string()))?;
        Ok(self.with_timeout(timeout))
    }

    /// Point the client at a different API root, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    pub fn organization_id(&self) -> u64 {
        self.organization_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_token", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

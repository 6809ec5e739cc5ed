use crate::utils::error::{RawgError, Result};
use crate::utils::validation::{self, Validate};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";
pub const API_KEY_ENV: &str = "RAWG_API_KEY";
pub const BASE_URL_ENV: &str = "RAWG_BASE_URL";

/// Settings for `RawgClient`.
///
/// # Example
///
/// ```
/// use rawg_client::RawgConfig;
/// use std::time::Duration;
///
/// let config = RawgConfig::new("my-api-key")
///     .with_timeout(Duration::from_secs(10))
///     .with_max_concurrent_requests(2);
/// assert_eq!(config.max_concurrent_requests, 2);
/// ```
#[derive(Clone)]
pub struct RawgConfig {
    pub api_key: String,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// First backoff delay; doubled on every further retry.
    pub retry_base_delay: Duration,
    pub max_concurrent_requests: usize,
}

impl RawgConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("rawg-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            max_concurrent_requests: 5,
        }
    }

    /// Reads `RAWG_API_KEY` and, when set, `RAWG_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| RawgError::MissingConfigError {
            field: API_KEY_ENV.to_string(),
        })?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }
}

impl fmt::Debug for RawgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawgConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay", &self.retry_base_delay)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

impl Validate for RawgConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_api_key("api.key", &self.api_key)?;
        validation::validate_url("api.base_url", &self.base_url)?;
        validation::validate_non_empty_string("api.user_agent", &self.user_agent)?;
        validation::validate_positive_number(
            "http.max_concurrent_requests",
            self.max_concurrent_requests,
            1,
        )?;
        if self.timeout.is_zero() {
            return Err(RawgError::InvalidConfigValueError {
                field: "http.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be positive".to_string(),
            });
        }
        Ok(())
    }
}

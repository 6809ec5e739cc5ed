use crate::config::rawg_config::{RawgConfig, DEFAULT_BASE_URL};
use crate::domain::query::MAX_PAGE_SIZE;
use crate::utils::error::{RawgError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const OUTPUT_FORMATS: &[&str] = &["table", "json", "csv"];

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is a valid regex")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub key: Option<String>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSection {
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub max_concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub format: Option<String>,
    pub page_size: Option<u32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RawgError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RAWG_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(key) = &self.api.key {
            validation::validate_api_key("api.key", key)?;
        }
        if let Some(base_url) = &self.api.base_url {
            validation::validate_url("api.base_url", base_url)?;
        }
        if let Some(max) = self.http.max_concurrent_requests {
            validation::validate_positive_number("http.max_concurrent_requests", max, 1)?;
        }
        if let Some(timeout) = self.http.timeout_seconds {
            validation::validate_range("http.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(format) = &self.output.format {
            validation::validate_one_of("output.format", format, OUTPUT_FORMATS)?;
        }
        if let Some(page_size) = self.output.page_size {
            validation::validate_range("output.page_size", page_size, 1, MAX_PAGE_SIZE)?;
        }
        Ok(())
    }

    /// 轉換為 client 配置；`api_key` 參數優先於檔案中的 key
    pub fn into_rawg_config(self, api_key: Option<String>) -> Result<RawgConfig> {
        let key = api_key.or(self.api.key);
        let key = validation::validate_required_field("api.key", &key)?;

        let defaults = RawgConfig::new(key.clone());
        let config = RawgConfig {
            base_url: self
                .api
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: self.api.user_agent.unwrap_or(defaults.user_agent.clone()),
            timeout: self
                .http
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: self.http.max_retries.unwrap_or(defaults.max_retries),
            retry_base_delay: self
                .http
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_base_delay),
            max_concurrent_requests: self
                .http
                .max_concurrent_requests
                .unwrap_or(defaults.max_concurrent_requests),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RawgError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("RAWG rejected the API key for {url}")]
    Unauthorized { url: String },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Rate limited by RAWG (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("RAWG API request failed with status {status}: {url}{}", detail_suffix(.message))]
    ApiRequestFailed {
        status: u16,
        url: String,
        message: Option<String>,
    },

    #[error("Invalid response from RAWG API: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({})", m))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RawgError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RawgError::Network(_) => ErrorCategory::Network,
            RawgError::Unauthorized { .. }
            | RawgError::NotFound { .. }
            | RawgError::RateLimited { .. }
            | RawgError::ApiRequestFailed { .. } => ErrorCategory::Api,
            RawgError::Json(_) | RawgError::InvalidResponse { .. } => ErrorCategory::Data,
            RawgError::InvalidUrl(_)
            | RawgError::ConfigError { .. }
            | RawgError::MissingConfigError { .. }
            | RawgError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RawgError::Io(_) | RawgError::Csv(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RawgError::NotFound { .. } => ErrorSeverity::Low,
            RawgError::Network(_) | RawgError::RateLimited { .. } => ErrorSeverity::Medium,
            RawgError::ApiRequestFailed { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            RawgError::ApiRequestFailed { .. }
            | RawgError::Json(_)
            | RawgError::InvalidResponse { .. }
            | RawgError::Io(_)
            | RawgError::Csv(_) => ErrorSeverity::High,
            RawgError::Unauthorized { .. }
            | RawgError::InvalidUrl(_)
            | RawgError::ConfigError { .. }
            | RawgError::MissingConfigError { .. }
            | RawgError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            RawgError::Network(e) => !e.is_builder() && !e.is_decode(),
            RawgError::RateLimited { .. } => true,
            RawgError::ApiRequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RawgError::Network(_) => "無法連線到 RAWG API".to_string(),
            RawgError::Unauthorized { .. } => "API 金鑰無效或未授權".to_string(),
            RawgError::NotFound { .. } => "找不到指定的資源".to_string(),
            RawgError::RateLimited { .. } => "請求過於頻繁，已被 RAWG 限流".to_string(),
            RawgError::ApiRequestFailed { status, .. } => {
                format!("RAWG API 回傳錯誤狀態 {}", status)
            }
            RawgError::Json(_) | RawgError::InvalidResponse { .. } => {
                "RAWG API 回應格式無法解析".to_string()
            }
            RawgError::Io(_) | RawgError::Csv(_) => "寫入輸出時發生錯誤".to_string(),
            RawgError::InvalidUrl(_)
            | RawgError::ConfigError { .. }
            | RawgError::MissingConfigError { .. }
            | RawgError::InvalidConfigValueError { .. } => format!("配置錯誤: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your network connection and try again",
            ErrorCategory::Api => match self {
                RawgError::Unauthorized { .. } => {
                    "Verify RAWG_API_KEY; keys are issued at https://rawg.io/apidocs"
                }
                RawgError::NotFound { .. } => "Check the id or slug you requested",
                RawgError::RateLimited { .. } => {
                    "Wait a moment, or lower http.max_concurrent_requests"
                }
                _ => "Retry later; the RAWG service may be degraded",
            },
            ErrorCategory::Data => "The API response changed shape; report this with --verbose logs",
            ErrorCategory::Configuration => "Fix the configuration value and run again",
            ErrorCategory::Io => "Check the output path and its permissions",
        }
    }
}

pub type RawgResult<T> = std::result::Result<T, RawgError>;
pub type Result<T> = RawgResult<T>;

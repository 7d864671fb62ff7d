use std::sync::Arc;
use thiserror::Error;

/// 查無觀察紀錄時顯示給使用者的訊息
pub const NO_OBSERVATIONS_MESSAGE: &str = "no observations recorded; try a different location";

#[derive(Error, Debug)]
pub enum WildlifeError {
    #[error("Network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Malformed response from {source_name}: {message}")]
    MalformedResponse { source_name: String, message: String },

    #[error("Empty result: {message}")]
    EmptyResult { message: String },

    #[error("Text generation failed: {message}")]
    Generation { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Generation,
    Configuration,
    Storage,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WildlifeError {
    /// 將 reqwest 錯誤分類為逾時或網路錯誤
    pub fn from_transport(url: &str, timeout_seconds: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                seconds: timeout_seconds,
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn malformed(source_name: &str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }

    /// 合併的快取請求共用同一個錯誤；取回擁有權，否則依內容重建
    pub fn from_shared(err: Arc<Self>) -> Self {
        match Arc::try_unwrap(err) {
            Ok(err) => err,
            Err(shared) => match &*shared {
                Self::Network { url, message } => Self::Network {
                    url: url.clone(),
                    message: message.clone(),
                },
                Self::Timeout { url, seconds } => Self::Timeout {
                    url: url.clone(),
                    seconds: *seconds,
                },
                Self::MalformedResponse {
                    source_name,
                    message,
                } => Self::malformed(source_name, message.clone()),
                Self::Generation { message } => Self::Generation {
                    message: message.clone(),
                },
                other => Self::Generation {
                    message: other.to_string(),
                },
            },
        }
    }

    pub fn no_observations() -> Self {
        Self::EmptyResult {
            message: NO_OBSERVATIONS_MESSAGE.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => ErrorCategory::Network,
            Self::MalformedResponse { .. } | Self::EmptyResult { .. } => ErrorCategory::Data,
            Self::SerializationError(_) => ErrorCategory::Data,
            Self::Generation { .. } => ErrorCategory::Generation,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 查無資料是正常分支
            Self::EmptyResult { .. } => ErrorSeverity::Low,
            Self::Network { .. } | Self::Timeout { .. } | Self::Generation { .. } => {
                ErrorSeverity::Medium
            }
            Self::MalformedResponse { .. }
            | Self::SerializationError(_)
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::CsvError(_) | Self::IoError(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the error is an expected branch rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Network { .. } => "Check your internet connection and try again",
            Self::Timeout { .. } => "The service is slow to respond; try again or raise timeout_seconds",
            Self::MalformedResponse { .. } | Self::SerializationError(_) => {
                "The API response format may have changed; check the service status"
            }
            Self::EmptyResult { .. } => "Try a different location or animal class",
            Self::Generation { .. } => "Check the completion API key and quota, then try again",
            Self::CsvError(_) | Self::IoError(_) => {
                "Check that the output path exists and is writable"
            }
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => "Review the configuration file and environment",
            Self::ValidationError { .. } => "Choose a location and an animal class first",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyResult { message } => message.clone(),
            Self::Network { .. } => "Could not reach the wildlife service".to_string(),
            Self::Timeout { seconds, .. } => {
                format!("The request took longer than {}s and was cancelled", seconds)
            }
            Self::MalformedResponse { source_name, .. } => {
                format!("Received unexpected data from {}", source_name)
            }
            Self::Generation { .. } => "Could not track down info for this animal".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WildlifeError>;

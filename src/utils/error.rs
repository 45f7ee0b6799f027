use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid API URL: {0}")]
    InvalidUrlError(#[from] url::ParseError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Limit source failed: {0}")]
    LimitSourceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Async runtime failed to start: {0}")]
    RuntimeError(#[source] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Where a failure came from. The adapter never recovers from any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Protocol,
    Deserialization,
    Input,
    Runtime,
}

impl ErrorCategory {
    /// Process exit code used by the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::Configuration | ErrorCategory::Input => 1,
            ErrorCategory::Transport => 2,
            ErrorCategory::Protocol => 3,
            ErrorCategory::Deserialization => 4,
            ErrorCategory::Runtime => 5,
        }
    }
}

impl FetchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FetchError::InvalidUrlError(_)
            | FetchError::IoError(_)
            | FetchError::ConfigError { .. }
            | FetchError::MissingConfigError { .. }
            | FetchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FetchError::ApiError(e) => {
                if e.is_builder() {
                    ErrorCategory::Configuration
                } else if e.is_status() {
                    ErrorCategory::Protocol
                } else if e.is_decode() {
                    ErrorCategory::Deserialization
                } else {
                    ErrorCategory::Transport
                }
            }
            FetchError::DeserializationError(_) => ErrorCategory::Deserialization,
            FetchError::LimitSourceError(_) => ErrorCategory::Input,
            FetchError::RuntimeError(_) => ErrorCategory::Runtime,
        }
    }

    /// HTTP status of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FetchError::ApiError(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

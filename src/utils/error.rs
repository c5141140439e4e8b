use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Request {index} timed out after {timeout_ms}ms")]
    TimeoutError { index: usize, timeout_ms: u128 },

    #[error("Request {index} panicked: {message}")]
    OperationPanicked { index: usize, message: String },

    #[error("Run processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Io,
    Data,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LoadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoadError::ApiError(_) | LoadError::TimeoutError { .. } => ErrorCategory::Network,
            LoadError::ConfigError { .. }
            | LoadError::ConfigValidationError { .. }
            | LoadError::MissingConfigError { .. }
            | LoadError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LoadError::IoError(_) => ErrorCategory::Io,
            LoadError::SerializationError(_) => ErrorCategory::Data,
            LoadError::OperationPanicked { .. } | LoadError::ProcessingError { .. } => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Runtime => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LoadError::ApiError(_) => "Check that the target endpoint is reachable and the TLS setup is valid",
            LoadError::TimeoutError { .. } => "Raise timeout_seconds or lower the concurrency",
            LoadError::MissingConfigError { .. } => {
                "Set the missing value in the config file or export the referenced environment variable"
            }
            LoadError::ConfigError { .. }
            | LoadError::ConfigValidationError { .. }
            | LoadError::InvalidConfigValueError { .. } => "Fix the configuration value and run again",
            LoadError::IoError(_) => "Check the file path and its permissions",
            LoadError::SerializationError(_) => "Make sure the request body is valid JSON",
            LoadError::OperationPanicked { .. } | LoadError::ProcessingError { .. } => {
                "Run again with --verbose and inspect the logs"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LoadError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            LoadError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            LoadError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = LoadError::MissingConfigError {
            field: "target.api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("target.api_key"));
    }

    #[test]
    fn test_timeout_is_network_error() {
        let err = LoadError::TimeoutError {
            index: 4,
            timeout_ms: 5000,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.to_string(), "Request 4 timed out after 5000ms");
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutofillError {
    #[error("Lookup request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Lookup endpoint {url} answered with status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Invalid lookup URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Malformed lookup response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AutofillError {
    /// 是否屬於查詢過程中的網路/回應錯誤（相對於設定錯誤）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AutofillError::HttpError(_)
                | AutofillError::UnexpectedStatus { .. }
                | AutofillError::InvalidUrl { .. }
                | AutofillError::MalformedResponse { .. }
                | AutofillError::SerializationError(_)
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AutofillError::HttpError(e) if e.is_timeout() => {
                "The lookup service did not answer in time".to_string()
            }
            AutofillError::HttpError(_) => "Could not reach the lookup service".to_string(),
            AutofillError::UnexpectedStatus { status, .. } => {
                format!("The lookup service returned an error (HTTP {})", status)
            }
            AutofillError::InvalidUrl { url, .. } => {
                format!("Cannot build a lookup request for '{}'", url)
            }
            AutofillError::MalformedResponse { .. } | AutofillError::SerializationError(_) => {
                "The lookup service returned an unreadable answer".to_string()
            }
            AutofillError::IoError(e) => format!("File access failed: {}", e),
            AutofillError::ConfigError { message } => format!("Configuration problem: {}", message),
            AutofillError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            AutofillError::InvalidConfigValueError { field, value, reason } => {
                format!("Setting '{}' has invalid value '{}': {}", field, value, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AutofillError::HttpError(_) => {
                "Check that the backend is running and that base_url points to it"
            }
            AutofillError::UnexpectedStatus { .. } => "Check the backend logs for the failing request",
            AutofillError::InvalidUrl { .. } => "Check base_url and api_prefix in the configuration",
            AutofillError::MalformedResponse { .. } | AutofillError::SerializationError(_) => {
                "Make sure the backend answers with a JSON object"
            }
            AutofillError::IoError(_) => "Check the file path and its permissions",
            AutofillError::ConfigError { .. }
            | AutofillError::ConfigValidationError { .. }
            | AutofillError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AutofillError>;

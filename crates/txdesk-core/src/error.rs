//! Error types for txdesk-core
//!
//! Every failure the view-models can report carries a stable code, a
//! severity and optional suggestions, so the web layer can render it and
//! the logger can tag it without matching on variants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// One or more fields failed validation
    ValidationFailed,
    /// Field key not present in the schema
    UnknownField,
    /// Value has the wrong shape for the field
    InvalidField,
    /// Attempt to write a read-only field
    ReadOnlyField,
    /// Form group index out of range
    InvalidGroup,
    /// Page size of zero
    InvalidPageSize,
    /// Sort requested on a column the table does not show
    UnknownColumn,
    /// Transaction not found
    TransactionNotFound,
    /// Form action with no form open
    NotEditing,
    /// Sub-editor action with the editor closed
    EditorClosed,
    /// Remote store call failed
    RemoteError,
    /// Field table is malformed
    SchemaError,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationFailed => write!(f, "VALIDATION_FAILED"),
            ErrorCode::UnknownField => write!(f, "UNKNOWN_FIELD"),
            ErrorCode::InvalidField => write!(f, "INVALID_FIELD"),
            ErrorCode::ReadOnlyField => write!(f, "READ_ONLY_FIELD"),
            ErrorCode::InvalidGroup => write!(f, "INVALID_GROUP"),
            ErrorCode::InvalidPageSize => write!(f, "INVALID_PAGE_SIZE"),
            ErrorCode::UnknownColumn => write!(f, "UNKNOWN_COLUMN"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::NotEditing => write!(f, "NOT_EDITING"),
            ErrorCode::EditorClosed => write!(f, "EDITOR_CLOSED"),
            ErrorCode::RemoteError => write!(f, "REMOTE_ERROR"),
            ErrorCode::SchemaError => write!(f, "SCHEMA_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - the action was refused, nothing was lost
    Warning,
    /// Error - the action failed
    Error,
    /// Critical - the front-end cannot work as configured
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for txdesk-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Validation failed for: {}", fields.join(", "))]
    ValidationFailed { fields: Vec<String> },

    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Field is read-only: {field}")]
    ReadOnlyField { field: String },

    #[error("Group {index} out of range (form has {count} groups)")]
    InvalidGroup { index: usize, count: usize },

    #[error("Invalid page size: {size}")]
    InvalidPageSize { size: usize },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    #[error("No form is open")]
    NotEditing,

    #[error("The {editor} editor is not open")]
    EditorClosed { editor: String },

    #[error("Remote call '{operation}' failed: {message}")]
    Remote { operation: String, message: String },

    #[error("Schema error: {message}")]
    SchemaError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl CoreError {
    /// Shorthand for a failed store call
    pub fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        CoreError::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CoreError::UnknownField { .. } => ErrorCode::UnknownField,
            CoreError::InvalidField { .. } => ErrorCode::InvalidField,
            CoreError::ReadOnlyField { .. } => ErrorCode::ReadOnlyField,
            CoreError::InvalidGroup { .. } => ErrorCode::InvalidGroup,
            CoreError::InvalidPageSize { .. } => ErrorCode::InvalidPageSize,
            CoreError::UnknownColumn { .. } => ErrorCode::UnknownColumn,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::NotEditing => ErrorCode::NotEditing,
            CoreError::EditorClosed { .. } => ErrorCode::EditorClosed,
            CoreError::Remote { .. } => ErrorCode::RemoteError,
            CoreError::SchemaError { .. } => ErrorCode::SchemaError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationFailed { .. } => ErrorSeverity::Warning,
            CoreError::UnknownField { .. } => ErrorSeverity::Warning,
            CoreError::InvalidField { .. } => ErrorSeverity::Warning,
            CoreError::ReadOnlyField { .. } => ErrorSeverity::Warning,
            CoreError::InvalidGroup { .. } => ErrorSeverity::Warning,
            CoreError::InvalidPageSize { .. } => ErrorSeverity::Warning,
            CoreError::UnknownColumn { .. } => ErrorSeverity::Warning,
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::NotEditing => ErrorSeverity::Info,
            CoreError::EditorClosed { .. } => ErrorSeverity::Info,
            CoreError::Remote { .. } => ErrorSeverity::Error,
            CoreError::SchemaError { .. } => ErrorSeverity::Critical,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ValidationFailed { fields } => {
                details = details.with_detail(serde_json::json!({ "fields": fields }));
                details = details.with_suggestion(
                    "Fill in the highlighted fields and submit again.".to_string(),
                );
            }
            CoreError::InvalidGroup { count, .. } => {
                details = details.with_suggestion(format!(
                    "Pick a group between 0 and {}.",
                    count.saturating_sub(1)
                ));
            }
            CoreError::InvalidPageSize { .. } => {
                details = details
                    .with_suggestion("Page size must be greater than 0.".to_string());
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion(
                    "The list may be out of date; refresh it and try again.".to_string(),
                );
            }
            CoreError::Remote { operation, message } => {
                details = details.with_detail(serde_json::json!({
                    "operation": operation,
                    "remote_message": message,
                }));
                details = details.with_suggestion(
                    "Check that the transaction service is reachable at the configured base_url."
                        .to_string(),
                );
            }
            CoreError::SchemaError { .. } => {
                details = details.with_suggestion(
                    "Review form.fields in the configuration file.".to_string(),
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<txdesk_config::ConfigError> for CoreError {
    fn from(error: txdesk_config::ConfigError) -> Self {
        CoreError::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "txdesk::error",
            "ERROR [{}] {} - Operation: {} - Data: {}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "txdesk::error",
            "WARNING: {} - Operation: {} - Data: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "VALIDATION_FAILED");
        assert_eq!(ErrorCode::RemoteError.to_string(), "REMOTE_ERROR");
        assert_eq!(ErrorCode::InvalidPageSize.to_string(), "INVALID_PAGE_SIZE");
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Info.to_string(), "info");
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::remote("create_transaction", "connection refused");
        assert_eq!(error.code(), ErrorCode::RemoteError);
        assert_eq!(error.severity(), ErrorSeverity::Error);

        let error = CoreError::ValidationFailed {
            fields: vec!["amount".to_string()],
        };
        assert_eq!(error.severity(), ErrorSeverity::Warning);
        assert_eq!(error.to_string(), "Validation failed for: amount");
    }

    #[test]
    fn test_validation_details_list_fields() {
        let error = CoreError::ValidationFailed {
            fields: vec!["amount".to_string(), "status".to_string()],
        };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::ValidationFailed);
        assert_eq!(
            details.details,
            Some(serde_json::json!({ "fields": ["amount", "status"] }))
        );
        assert_eq!(details.suggestions.len(), 1);
    }

    #[test]
    fn test_remote_details() {
        let error = CoreError::remote("fetch_transactions", "HTTP 500");
        let details = error.to_details();
        assert!(details.message.contains("fetch_transactions"));
        assert!(details.to_string().contains("base_url"));
    }

    #[test]
    fn test_from_config_error() {
        let error: CoreError = txdesk_config::ConfigError::ValidationError {
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::ConfigError);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("submit")
            .with_data("transaction_id", serde_json::json!(7));
        assert_eq!(context.operation, "submit");
        assert_eq!(context.data["transaction_id"], 7);
    }
}

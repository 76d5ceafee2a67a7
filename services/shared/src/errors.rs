/// Shared error vocabulary for the ledger admin API
///
/// Every failure a client can observe is described by a category (which
/// fixes the HTTP status), a stable machine-readable code, and a message.
/// Error codes follow the pattern `<CATEGORY>_<DETAIL>`.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Error categories that map to HTTP status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Request failed shape, range or enum checks (422)
    Validation,

    /// Targeted row does not exist (404)
    NotFound,

    /// Missing or wrong API key (401)
    Unauthorized,

    /// Service is running without a configured store (503)
    Configuration,

    /// Store unreachable or statement rejected by the store (500)
    Storage,

    /// Unexpected failures, programming errors (500)
    Internal,
}

impl ErrorCategory {
    /// Map error category to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 422,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Unauthorized => 401,
            ErrorCategory::Configuration => 503,
            ErrorCategory::Storage => 500,
            ErrorCategory::Internal => 500,
        }
    }

    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::NotFound => "info",
            ErrorCategory::Unauthorized => "warn",
            ErrorCategory::Configuration => "error",
            ErrorCategory::Storage => "error",
            ErrorCategory::Internal => "error",
        }
    }
}

/// Standard error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_INPUT: ErrorCode = ErrorCode("VALIDATION_INVALID_INPUT");
    pub const VALIDATION_MISSING_FIELD: ErrorCode = ErrorCode("VALIDATION_MISSING_FIELD");
    pub const VALIDATION_MALFORMED_BODY: ErrorCode = ErrorCode("VALIDATION_MALFORMED_BODY");
    pub const VALIDATION_INVALID_PATH: ErrorCode = ErrorCode("VALIDATION_INVALID_PATH");
    pub const VALIDATION_INVALID_QUERY: ErrorCode = ErrorCode("VALIDATION_INVALID_QUERY");

    // Authentication errors
    pub const AUTH_INVALID_API_KEY: ErrorCode = ErrorCode("AUTH_INVALID_API_KEY");

    // Resource errors
    pub const NOT_FOUND_RESOURCE: ErrorCode = ErrorCode("NOT_FOUND_RESOURCE");

    // Configuration errors
    pub const CONFIG_STORE_DISABLED: ErrorCode = ErrorCode("CONFIG_STORE_DISABLED");

    // Storage errors
    pub const STORAGE_UNAVAILABLE: ErrorCode = ErrorCode("STORAGE_UNAVAILABLE");
    pub const STORAGE_QUERY_FAILED: ErrorCode = ErrorCode("STORAGE_QUERY_FAILED");

    // Internal errors
    pub const INTERNAL_ROW_DECODE: ErrorCode = ErrorCode("INTERNAL_ROW_DECODE");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field path (e.g. `stake.amount`) to the reasons it was rejected
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Standardized error structure returned in every error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Field-level detail for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
            fields: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        if !fields.is_empty() {
            self.fields = Some(fields);
        }
        self
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, code, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            ErrorCategory::Unauthorized,
            ErrorCode::AUTH_INVALID_API_KEY,
            "Invalid or missing API key",
        )
    }

    /// `resource` is the human singular, e.g. "Team" yields "Team not found".
    pub fn not_found(resource: &str, key: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_RESOURCE,
            format!("{} not found", resource),
        )
        .with_context(format!("key: {}", key))
    }

    pub fn store_disabled() -> Self {
        Self::new(
            ErrorCategory::Configuration,
            ErrorCode::CONFIG_STORE_DISABLED,
            "Database is not configured for this deployment",
        )
    }

    pub fn storage_unavailable() -> Self {
        Self::new(
            ErrorCategory::Storage,
            ErrorCode::STORAGE_UNAVAILABLE,
            "Database unavailable",
        )
    }

    pub fn storage_failed() -> Self {
        Self::new(
            ErrorCategory::Storage,
            ErrorCode::STORAGE_QUERY_FAILED,
            "Database error",
        )
    }

    pub fn internal(code: ErrorCode) -> Self {
        Self::new(ErrorCategory::Internal, code, "Internal server error")
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

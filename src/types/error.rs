//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Every failure of a model round-trip is classified into an [`ErrorCategory`]
//! so the coach can log it and tag the fallback it returns.
//!
//! ## Error Categories
//!
//! - **Network**: Connectivity issues and timeouts
//! - **RateLimit**: Quota exhausted on the hosted model
//! - **Auth**: Missing or rejected API key
//! - **Unavailable**: Model or endpoint unavailable
//! - **ParseError**: Response present but not the expected JSON
//! - **NoOutput**: Service answered without any text
//! - **Validation**: Parsed values rejected by the strict policy

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for logging and fallback tagging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or quota exceeded
    RateLimit,
    /// Authentication failed
    Auth,
    /// Network/connectivity issues, including timeouts
    Network,
    /// Provider unavailable
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Parsing the model response failed
    ParseError,
    /// The model returned no text at all
    NoOutput,
    /// Parsed values failed validation
    Validation,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::NoOutput => write!(f, "NO_OUTPUT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether a manual retry by the user has a reasonable chance to succeed.
    ///
    /// Nothing is retried automatically; this only drives the hint shown next
    /// to a fallback.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Network | Self::Transient | Self::ParseError | Self::NoOutput
        )
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Hosted-model error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// HTTP status, when the error came from a response
    pub status: Option<u16>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            status: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
            status: None,
        }
    }

    /// Attach the HTTP status code
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport-level failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code returned by the hosted model
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider).status(status)
    }

    /// Classify a transport error from the HTTP client
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, format!("request failed: {}", err), provider)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
    /// Expected value or format
    pub expected: Option<String>,
    /// Actual value received
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)
        } else {
            write!(f, "Validation failed: {}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add expected/actual values
    pub fn with_comparison(
        mut self,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Shorthand for an out-of-range numeric field
    pub fn out_of_range(field: &str, expected: &str, actual: impl ToString) -> Self {
        Self::new(ValidationErrorKind::Range, "value out of range")
            .with_field(field)
            .with_comparison(expected, actual.to_string())
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Required field missing
    MissingField,
    /// Invalid format
    Format,
    /// Value out of range
    Range,
    /// Value not in the enumerated set
    Enum,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum NutriError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Model Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("No output returned for {task}")]
    NoOutput { task: String },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(ValidationError),

    // -------------------------------------------------------------------------
    // Application Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error for {path}: {message}")]
    Image { path: String, message: String },

    #[error("{0} is still working on the previous request")]
    Busy(String),
}

impl From<LlmError> for NutriError {
    fn from(err: LlmError) -> Self {
        NutriError::Llm(err)
    }
}

impl From<ValidationError> for NutriError {
    fn from(err: ValidationError) -> Self {
        NutriError::Validation(err)
    }
}

pub type Result<T> = std::result::Result<T, NutriError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl NutriError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a no-output error
    pub fn no_output(task: impl Into<String>) -> Self {
        Self::NoOutput { task: task.into() }
    }

    /// Category used for logging and fallback tagging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Llm(e) => e.category,
            Self::Timeout { .. } | Self::Io(_) => ErrorCategory::Network,
            Self::Json(_) | Self::Parse(_) => ErrorCategory::ParseError,
            Self::NoOutput { .. } => ErrorCategory::NoOutput,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Config(_) => ErrorCategory::BadRequest,
            Self::Image { .. } | Self::Busy(_) => ErrorCategory::Unknown,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Error types for the CS Tools core library.
//!
//! Every failure surfaces to the immediate caller as a [`CsToolsError`]; nothing
//! is retried or swallowed inside the middlewares or the task board.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Content | Missing, ambiguous or mis-selected platform content, task lookups |
//! | E2001-E2099 | API | Transport, response shape, authentication and timeout errors |
//! | E3001-E3099 | Config | Config file, environment and validation errors |
//! | E9001-E9099 | General | Internal, IO and serialization errors |

use std::fmt;
use thiserror::Error;

/// The main error type for the CS Tools core library.
#[derive(Debug, Error)]
pub enum CsToolsError {
    // ========================================================================
    // Content Errors (E1001-E1099)
    // ========================================================================
    /// A lookup or aggregation produced no content after filtering
    #[error("[E1001] Content does not exist ({object_type}): {reason}")]
    ContentNotFound { object_type: String, reason: String },

    /// A name-based lookup matched more than one object
    #[error("[E1002] Multiple {object_type} objects found with the name '{name}'")]
    AmbiguousContent { object_type: String, name: String },

    /// Mutually exclusive selectors were both supplied, or all omitted
    #[error("[E1003] Invalid argument: {0}")]
    InvalidArgument(String),

    /// Task board lookup by an unregistered name
    #[error("[E1004] No task found with name '{0}'")]
    TaskNotFound(String),

    // ========================================================================
    // API Errors (E2001-E2099)
    // ========================================================================
    /// API request failed
    #[error("[E2001] API request failed: {0}")]
    ApiRequestFailed(String),

    /// API response could not be decoded or had an unexpected shape
    #[error("[E2002] Failed to parse API response: {0}")]
    ApiParseError(String),

    /// API authentication failed
    #[error("[E2003] API authentication failed for {host}: {message}")]
    ApiAuthenticationFailed { host: String, message: String },

    /// API service unavailable
    #[error("[E2004] API service unavailable: {0}")]
    ApiServiceUnavailable(String),

    /// Request timed out
    #[error("[E2005] Request timed out: {0}")]
    RequestTimeout(String),

    // ========================================================================
    // Configuration Errors (E3001-E3099)
    // ========================================================================
    /// Configuration file parse error
    #[error("[E3001] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E3002] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Required configuration is missing
    #[error("[E3003] Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// Internal error (catch-all for unexpected conditions)
    #[error("[E9001] Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("[E9002] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9003] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for CS Tools operations.
pub type CsToolsResult<T> = Result<T, CsToolsError>;

impl CsToolsError {
    /// Create a content-not-found error.
    pub fn content_not_found(object_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CsToolsError::ContentNotFound {
            object_type: object_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an ambiguous-content error.
    pub fn ambiguous(object_type: impl Into<String>, name: impl Into<String>) -> Self {
        CsToolsError::AmbiguousContent {
            object_type: object_type.into(),
            name: name.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CsToolsError::InvalidArgument(message.into())
    }
}

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

fn host_of(err: &reqwest::Error) -> String {
    err.url()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

impl From<reqwest::Error> for CsToolsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CsToolsError::RequestTimeout(err.to_string())
        } else if err.is_connect() {
            CsToolsError::ApiServiceUnavailable(err.to_string())
        } else if err.is_status() {
            if let Some(status) = err.status() {
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    return CsToolsError::ApiAuthenticationFailed {
                        host: host_of(&err),
                        message: status.to_string(),
                    };
                }
                if status.is_server_error() {
                    return CsToolsError::ApiServiceUnavailable(err.to_string());
                }
            }
            CsToolsError::ApiRequestFailed(err.to_string())
        } else if err.is_decode() {
            CsToolsError::ApiParseError(err.to_string())
        } else {
            CsToolsError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CsToolsError {
    fn from(err: serde_json::Error) -> Self {
        CsToolsError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for CsToolsError {
    fn from(err: std::io::Error) -> Self {
        CsToolsError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for CsToolsError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => CsToolsError::MissingConfig(key),
            config::ConfigError::FileParse { uri, cause } => CsToolsError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => CsToolsError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => CsToolsError::ConfigParseError(err.to_string()),
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl CsToolsError {
    /// Returns true if this error describes missing, ambiguous or mis-selected content.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            CsToolsError::ContentNotFound { .. }
                | CsToolsError::AmbiguousContent { .. }
                | CsToolsError::InvalidArgument(_)
                | CsToolsError::TaskNotFound(_)
        )
    }

    /// Returns true if this error came from the transport or the response shape.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            CsToolsError::ApiRequestFailed(_)
                | CsToolsError::ApiParseError(_)
                | CsToolsError::ApiAuthenticationFailed { .. }
                | CsToolsError::ApiServiceUnavailable(_)
                | CsToolsError::RequestTimeout(_)
        )
    }

    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CsToolsError::ConfigParseError(_)
                | CsToolsError::InvalidConfigValue { .. }
                | CsToolsError::MissingConfig(_)
        )
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            CsToolsError::ContentNotFound { .. } => "E1001",
            CsToolsError::AmbiguousContent { .. } => "E1002",
            CsToolsError::InvalidArgument(_) => "E1003",
            CsToolsError::TaskNotFound(_) => "E1004",
            CsToolsError::ApiRequestFailed(_) => "E2001",
            CsToolsError::ApiParseError(_) => "E2002",
            CsToolsError::ApiAuthenticationFailed { .. } => "E2003",
            CsToolsError::ApiServiceUnavailable(_) => "E2004",
            CsToolsError::RequestTimeout(_) => "E2005",
            CsToolsError::ConfigParseError(_) => "E3001",
            CsToolsError::InvalidConfigValue { .. } => "E3002",
            CsToolsError::MissingConfig(_) => "E3003",
            CsToolsError::Internal(_) => "E9001",
            CsToolsError::IoError(_) => "E9002",
            CsToolsError::SerializationError(_) => "E9003",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            CsToolsError::ContentNotFound { .. } => {
                Some("Check your filters, or pass --include-system to widen the search")
            }
            CsToolsError::AmbiguousContent { .. } => {
                Some("Use the object's GUID instead of its name")
            }
            CsToolsError::ApiAuthenticationFailed { .. } => {
                Some("Check thoughtspot.username and thoughtspot.password in your configuration")
            }
            CsToolsError::ApiServiceUnavailable(_) => {
                Some("Check that thoughtspot.url is reachable from this machine")
            }
            CsToolsError::MissingConfig(_) => {
                Some("Create cstools.toml or set CSTOOLS_URL")
            }
            _ => None,
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with an optional suggestion line.
pub struct CliErrorDisplay<'a> {
    error: &'a CsToolsError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a CsToolsError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                write!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        Ok(())
    }
}

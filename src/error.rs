use std::fmt;

/// Build-time router error
///
/// Every variant is raised synchronously while routes are being registered or
/// composed. Nothing is appended to a registry when one of these is returned.
/// Failures inside handlers are not represented here; they travel through
/// [`Router::handle`](crate::router::Router::handle) as `anyhow::Error`
/// values, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The pattern (or base path) could not be compiled
    InvalidPattern {
        /// The offending pattern source
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
    /// A route names a handler that cannot be resolved
    InvalidHandler {
        /// The handler name as written in the route
        name: String,
    },
    /// A textual method token is not a valid HTTP method
    InvalidMethod {
        /// The rejected token
        method: String,
    },
    /// A route table document could not be read or parsed
    Table {
        /// Parser or I/O message
        reason: String,
    },
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern '{}': {}", pattern, reason)
            }
            RouterError::InvalidHandler { name } => {
                write!(
                    f,
                    "invalid handler: route references '{}', which is not registered",
                    name
                )
            }
            RouterError::InvalidMethod { method } => {
                write!(f, "invalid HTTP method token '{}'", method)
            }
            RouterError::Table { reason } => write!(f, "invalid route table: {}", reason),
        }
    }
}

impl std::error::Error for RouterError {}

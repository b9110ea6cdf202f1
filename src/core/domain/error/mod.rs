use std::fmt;
use thiserror::Error;

/// The main error type for Proxmox engine operations.
///
/// Every failure of construction, login, or a forwarded API call surfaces as
/// one of these variants. Only a stale-ticket `401` is ever absorbed by the
/// engine (once, by retrying); everything else reaches the caller.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    /// Invalid or missing connection/credential material at construction time
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Configuration error: {source}")]
    Configuration {
        #[from]
        source: ValidationError,
    },

    /// The HTTP call could not be issued (DNS, connection refused, timeout)
    ///
    /// # Fields
    /// * `method` - The HTTP verb of the failed call
    /// * `url` - The full URL that was requested
    /// * `source` - The transport error reported by the HTTP client
    #[error("Failed to call {method} {url}: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The login exchange did not produce a usable ticket
    ///
    /// # Fields
    /// * `url` - The ticket endpoint that was called
    /// * `reason` - What went wrong
    #[error("Authentication against {url} failed: {reason}")]
    Authentication { url: String, reason: String },

    /// The remote service answered with a non-success status
    ///
    /// # Fields
    /// * `method` - The HTTP verb of the call
    /// * `url` - The full URL that was requested
    /// * `status` - The HTTP status code
    /// * `status_text` - The reason phrase sent by the server
    /// * `body` - The decoded response envelope, serialized as JSON
    /// * `kind` - Whether the status was a known rejection or an unexpected one
    #[error("{method} {url} {kind} {status} {status_text}: {body}")]
    Request {
        method: String,
        url: String,
        status: u16,
        status_text: String,
        body: String,
        kind: RequestErrorKind,
    },

    /// The response could not be interpreted (unexpected content type or
    /// undecodable JSON)
    #[error("{method} {url} unexpected response (status {status}, content type {content_type:?}): {body}")]
    Protocol {
        method: String,
        url: String,
        status: u16,
        content_type: Option<String>,
        body: String,
    },

    /// Reading or writing a persisted session failed
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted session could not be encoded or decoded
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProxmoxError {
    /// Returns the HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProxmoxError::Request { status, .. } | ProxmoxError::Protocol { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Distinguishes statuses the API documents as failures from statuses the
/// engine does not recognise at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// `400`, `401` or `500`
    Rejected,
    /// Any other non-`200` status
    ConnectionFailed,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestErrorKind::Rejected => f.write_str("returned error"),
            RequestErrorKind::ConnectionFailed => f.write_str("connection failed with"),
        }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Type alias for Results that may fail with a ProxmoxError
pub type ProxmoxResult<T> = Result<T, ProxmoxError>;

use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A Proxmox CSRF protection token, issued together with a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxmoxCSRFToken(String);

impl ProxmoxCSRFToken {
    /// Name of the request header carrying the token.
    pub const HEADER: &'static str = "CSRFPreventionToken";

    /// Creates a new CSRF token without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    /// Validates and wraps a CSRF token.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_csrf_token(&value)?;
        Ok(Self::new_unchecked(value))
    }

    /// Returns the token value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates a CSRF token string.
pub(crate) fn validate_csrf_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::field("csrf_token", "CSRF token cannot be empty"));
    }
    Ok(())
}

use crate::core::domain::error::ValidationError;
use std::fmt;

/// A validated Proxmox host: a DNS name, an IPv4 literal, or a bracketed
/// IPv6 literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxHost(String);

impl ProxmoxHost {
    /// Creates a new host without validation.
    pub(crate) fn new_unchecked(host: String) -> Self {
        Self(host)
    }

    /// Validates and wraps a host.
    pub fn new(host: impl Into<String>) -> Result<Self, ValidationError> {
        let host = host.into();
        validate_host(&host)?;
        Ok(Self::new_unchecked(host))
    }

    /// Returns the host as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProxmoxHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a host string.
pub(crate) fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.trim().is_empty() {
        return Err(ValidationError::field("host", "Host cannot be empty"));
    }
    if host.len() > 253 {
        return Err(ValidationError::ConstraintViolation(format!(
            "Host length exceeds maximum of 253 characters (got {})",
            host.len()
        )));
    }
    url::Host::parse(host)
        .map(|_| ())
        .map_err(|e| ValidationError::Format(format!("Invalid host '{}': {}", host, e)))
}

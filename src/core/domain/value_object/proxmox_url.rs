use crate::core::domain::{
    error::ValidationError,
    value_object::{ProxmoxHost, ProxmoxPort, ProxmoxScheme},
};
use std::fmt;

/// Base URL of a PVE API endpoint: `scheme://host:port`, no trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUrl(String);

impl ProxmoxUrl {
    /// Builds the base URL and checks that it parses.
    pub fn new(
        host: &ProxmoxHost,
        port: &ProxmoxPort,
        scheme: ProxmoxScheme,
    ) -> Result<Self, ValidationError> {
        let base = format!("{}://{}:{}", scheme, host, port.get());
        validate_url(&base)?;
        Ok(Self(base))
    }

    /// Appends a resource path, inserting the leading slash if missing.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProxmoxUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates an absolute URL.
pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme '{}'. Must be one of: http, https",
            other
        ))),
    }
}

use crate::core::domain::error::ValidationError;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::LazyLock;

static TOKEN_SECRET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid token secret pattern")
});

/// An API token secret: a lowercase UUID, kept out of `Debug` output.
#[derive(Debug)]
pub struct ProxmoxTokenSecret(SecretString);

impl ProxmoxTokenSecret {
    /// Validates and wraps a token secret.
    pub fn new(secret: String) -> Result<Self, ValidationError> {
        validate_token_secret(&secret)?;
        Ok(Self(SecretString::from(secret)))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

pub(crate) fn validate_token_secret(secret: &str) -> Result<(), ValidationError> {
    if !TOKEN_SECRET_PATTERN.is_match(secret) {
        return Err(ValidationError::Field {
            field: "token_secret".to_string(),
            message: "invalid tokenSecret, format should be a lowercased UUID like 12345678-1234-1234-1234-1234567890ab".to_string(),
        });
    }
    Ok(())
}

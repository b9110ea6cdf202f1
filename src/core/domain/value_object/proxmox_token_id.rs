use crate::core::domain::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^!\s]+![^\s]+$").expect("valid token id pattern"));

/// A validated API token id in the form `USER@REALM!TOKENID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxTokenId(String);

impl ProxmoxTokenId {
    /// Validates and wraps a token id.
    pub fn new(token_id: impl Into<String>) -> Result<Self, ValidationError> {
        let token_id = token_id.into();
        validate_token_id(&token_id)?;
        Ok(Self(token_id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn validate_token_id(token_id: &str) -> Result<(), ValidationError> {
    if !TOKEN_ID_PATTERN.is_match(token_id) {
        return Err(ValidationError::Field {
            field: "token_id".to_string(),
            message: "invalid tokenID, format should look like USER@REALM!TOKENID".to_string(),
        });
    }
    Ok(())
}

use crate::core::domain::error::ValidationError;

/// A validated Proxmox user id (`user@realm`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUsername(String);

impl ProxmoxUsername {
    /// User the engine logs in as when none is configured.
    pub const DEFAULT: &'static str = "root@pam";

    /// Creates a new username without validation.
    pub(crate) fn new_unchecked(username: String) -> Self {
        Self(username)
    }

    /// Validates and wraps a username.
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self::new_unchecked(username))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProxmoxUsername {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

/// Validates a username.
///
/// The realm part is not checked against a fixed list: PVE realms are
/// operator-defined.
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::field("username", "Username cannot be empty"));
    }
    if username.len() > 64 {
        return Err(ValidationError::Format(format!(
            "Username length must not exceed 64 characters (got {})",
            username.len()
        )));
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control() || c == ':') {
        return Err(ValidationError::Format(
            "Username cannot contain whitespace, control characters or ':'".to_string(),
        ));
    }
    Ok(())
}

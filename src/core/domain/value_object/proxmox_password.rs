use crate::core::domain::error::ValidationError;
use secrecy::{ExposeSecret, SecretString};
use zxcvbn::{Score, zxcvbn};

/// A Proxmox password, kept out of `Debug` output.
#[derive(Debug)]
pub struct ProxmoxPassword(SecretString);

impl ProxmoxPassword {
    /// Creates a new password without validation.
    pub(crate) fn new_unchecked(password: String) -> Self {
        Self(SecretString::from(password))
    }

    /// Validates and wraps a password, optionally enforcing a zxcvbn score.
    pub fn new(password: String, min_score: Option<Score>) -> Result<Self, ValidationError> {
        validate_password(&password, min_score)?;
        Ok(Self::new_unchecked(password))
    }

    /// Returns the plaintext password.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Maps the numeric strength levels (0-4) used in configuration to a zxcvbn
/// score.
pub(crate) fn score_from_level(level: u8) -> Result<Score, ValidationError> {
    match level {
        0 => Ok(Score::Zero),
        1 => Ok(Score::One),
        2 => Ok(Score::Two),
        3 => Ok(Score::Three),
        4 => Ok(Score::Four),
        other => Err(ValidationError::Format(format!(
            "Password strength level must be between 0 and 4 (got {})",
            other
        ))),
    }
}

/// Validates a password.
pub(crate) fn validate_password(
    password: &str,
    min_score: Option<Score>,
) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::field(
            "password",
            "password is missing for Proxmox connection",
        ));
    }
    if let Some(min_score) = min_score {
        let entropy = zxcvbn(password, &[]);
        if entropy.score() < min_score {
            return Err(ValidationError::ConstraintViolation(
                "Password is too weak (increase complexity)".to_string(),
            ));
        }
    }
    Ok(())
}

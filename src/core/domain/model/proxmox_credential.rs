//! Credential material an engine authenticates with.

use crate::core::domain::{
    error::ValidationError,
    value_object::{ProxmoxPassword, ProxmoxTokenId, ProxmoxTokenSecret, ProxmoxUsername},
};
use secrecy::SecretString;
use zxcvbn::Score;

/// How an engine authenticates. Chosen at construction and fixed for the
/// engine's lifetime.
#[derive(Debug)]
pub enum ProxmoxCredential {
    /// Username/password, exchanged for a ticket + CSRF token on login.
    Password {
        username: ProxmoxUsername,
        password: ProxmoxPassword,
    },
    /// Pre-issued API token, sent as a static `Authorization` header.
    Token {
        token_id: ProxmoxTokenId,
        secret: ProxmoxTokenSecret,
    },
}

impl ProxmoxCredential {
    /// Selects and validates a credential from loosely supplied fields.
    ///
    /// A token id together with a non-empty secret selects token
    /// authentication; anything else is treated as a password credential,
    /// with the username defaulting to `root@pam`.
    pub fn from_parts(
        username: Option<String>,
        password: Option<String>,
        token_id: Option<String>,
        token_secret: Option<String>,
        min_password_score: Option<Score>,
    ) -> Result<Self, ValidationError> {
        if let (Some(token_id), Some(secret)) = (token_id, token_secret.filter(|s| !s.is_empty())) {
            return Ok(ProxmoxCredential::Token {
                token_id: ProxmoxTokenId::new(token_id)?,
                secret: ProxmoxTokenSecret::new(secret)?,
            });
        }

        let username = match username.filter(|u| !u.is_empty()) {
            Some(username) => ProxmoxUsername::new(username)?,
            None => ProxmoxUsername::default(),
        };
        let password = ProxmoxPassword::new(password.unwrap_or_default(), min_password_score)?;
        Ok(ProxmoxCredential::Password { username, password })
    }

    #[must_use]
    pub fn is_token(&self) -> bool {
        matches!(self, ProxmoxCredential::Token { .. })
    }

    /// Username for password credentials; `None` for tokens.
    pub fn username(&self) -> Option<&ProxmoxUsername> {
        match self {
            ProxmoxCredential::Password { username, .. } => Some(username),
            ProxmoxCredential::Token { .. } => None,
        }
    }

    /// The static `PVEAPIToken=<id>=<secret>` value for token credentials.
    pub(crate) fn token_authorization(&self) -> Option<SecretString> {
        match self {
            ProxmoxCredential::Token { token_id, secret } => Some(SecretString::from(format!(
                "PVEAPIToken={}={}",
                token_id.as_str(),
                secret.expose()
            ))),
            ProxmoxCredential::Password { .. } => None,
        }
    }
}

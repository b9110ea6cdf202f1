use crate::core::domain::error::ValidationError;
use std::{fmt, str::FromStr};

/// URL scheme used to reach the PVE API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxmoxScheme {
    Http,
    #[default]
    Https,
}

impl ProxmoxScheme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxmoxScheme::Http => "http",
            ProxmoxScheme::Https => "https",
        }
    }

    #[must_use]
    pub fn is_secure(&self) -> bool {
        matches!(self, ProxmoxScheme::Https)
    }
}

impl From<bool> for ProxmoxScheme {
    fn from(secure: bool) -> Self {
        if secure {
            ProxmoxScheme::Https
        } else {
            ProxmoxScheme::Http
        }
    }
}

impl fmt::Display for ProxmoxScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxmoxScheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(ProxmoxScheme::Http),
            "https" => Ok(ProxmoxScheme::Https),
            other => Err(ValidationError::Format(format!(
                "Invalid scheme '{}'. Must be one of: http, https",
                other
            ))),
        }
    }
}

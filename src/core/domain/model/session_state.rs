//! Lifecycle of a ticket session.

use crate::core::domain::model::proxmox_auth::ProxmoxAuth;
use std::time::Duration;

/// Internal session state of a password-authenticated engine.
///
/// ```text
/// Unauthenticated --login ok--> Authenticated
///        ^                        |      ^
///        +----login failed--------+      | login ok
///                stale ticket / invalidate / expiry
///                                 v      |
///                                 Stale -+
/// ```
///
/// A login in flight is not recorded here: the state only changes once the
/// exchange has an outcome, so a dropped login future leaves it as it was.
#[derive(Debug, Clone, Default)]
pub(crate) enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(ProxmoxAuth),
    Stale,
}

impl SessionState {
    /// Returns the cached session if it is younger than `lifetime`.
    pub(crate) fn usable(&self, lifetime: Duration) -> Option<&ProxmoxAuth> {
        match self {
            SessionState::Authenticated(auth) if !auth.is_expired(lifetime) => Some(auth),
            _ => None,
        }
    }

    /// Returns the cached session regardless of its age.
    pub(crate) fn auth(&self) -> Option<&ProxmoxAuth> {
        match self {
            SessionState::Authenticated(auth) => Some(auth),
            _ => None,
        }
    }

    pub(crate) fn status(&self) -> SessionStatus {
        match self {
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::Authenticated(_) => SessionStatus::Authenticated,
            SessionState::Stale => SessionStatus::Stale,
        }
    }
}

/// Observable session status of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No login has happened yet, or the last one failed.
    Unauthenticated,
    /// A login exchange is in flight.
    Authenticating,
    /// A ticket and CSRF token are cached.
    Authenticated,
    /// The cached ticket was rejected, invalidated, or aged out; the next
    /// call logs in again.
    Stale,
    /// Token authentication: the session never changes.
    StaticToken,
}

//! Shared ticket-session state of a password-authenticated engine.

use crate::core::domain::{
    error::ProxmoxResult,
    model::{
        proxmox_auth::ProxmoxAuth,
        session_state::{SessionState, SessionStatus},
    },
};
use std::{future::Future, time::Duration};
use tokio::sync::{Mutex, RwLock};

/// Owns the [`SessionState`] and serializes login exchanges.
///
/// Readers take the `RwLock` only long enough to copy the cached session.
/// Logins run behind `login_gate`, so concurrent callers that find no usable
/// session wait for a single exchange and then reuse its result. A held gate
/// is what reports [`SessionStatus::Authenticating`].
#[derive(Debug)]
pub(crate) struct SessionManager {
    state: RwLock<SessionState>,
    login_gate: Mutex<()>,
    ticket_lifetime: Duration,
}

impl SessionManager {
    pub(crate) fn new(ticket_lifetime: Duration) -> Self {
        Self {
            state: RwLock::new(SessionState::Unauthenticated),
            login_gate: Mutex::new(()),
            ticket_lifetime,
        }
    }

    /// Returns the cached session, running `login` if there is none.
    pub(crate) async fn ensure<F, Fut>(&self, login: F) -> ProxmoxResult<ProxmoxAuth>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProxmoxResult<ProxmoxAuth>>,
    {
        if let Some(auth) = self.cached().await {
            return Ok(auth);
        }

        let _gate = self.login_gate.lock().await;
        // Another caller may have logged in while this one waited.
        if let Some(auth) = self.cached().await {
            return Ok(auth);
        }
        self.run_login(login).await
    }

    /// Runs `login` even if a usable session is cached.
    pub(crate) async fn refresh<F, Fut>(&self, login: F) -> ProxmoxResult<ProxmoxAuth>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProxmoxResult<ProxmoxAuth>>,
    {
        let _gate = self.login_gate.lock().await;
        self.run_login(login).await
    }

    async fn run_login<F, Fut>(&self, login: F) -> ProxmoxResult<ProxmoxAuth>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProxmoxResult<ProxmoxAuth>>,
    {
        match login().await {
            Ok(auth) => {
                *self.state.write().await = SessionState::Authenticated(auth.clone());
                Ok(auth)
            }
            Err(e) => {
                *self.state.write().await = SessionState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// The session if it is cached and younger than the ticket lifetime.
    pub(crate) async fn cached(&self) -> Option<ProxmoxAuth> {
        self.state
            .read()
            .await
            .usable(self.ticket_lifetime)
            .cloned()
    }

    /// The cached session regardless of its age.
    pub(crate) async fn current(&self) -> Option<ProxmoxAuth> {
        self.state.read().await.auth().cloned()
    }

    /// Marks the session stale after the server rejected `rejected`.
    ///
    /// Returns `false` when the cache already holds a different session,
    /// which is then left alone.
    pub(crate) async fn mark_stale(&self, rejected: &ProxmoxAuth) -> bool {
        let mut state = self.state.write().await;
        if state.auth() == Some(rejected) {
            *state = SessionState::Stale;
            true
        } else {
            false
        }
    }

    /// Drops the cached session unconditionally.
    pub(crate) async fn invalidate(&self) {
        let mut state = self.state.write().await;
        if matches!(*state, SessionState::Authenticated(_)) {
            *state = SessionState::Stale;
        }
    }

    /// Installs a session obtained elsewhere, e.g. loaded from disk.
    pub(crate) async fn restore(&self, auth: ProxmoxAuth) {
        *self.state.write().await = SessionState::Authenticated(auth);
    }

    pub(crate) async fn status(&self) -> SessionStatus {
        if self.login_gate.try_lock().is_err() {
            return SessionStatus::Authenticating;
        }
        let state = self.state.read().await;
        match state.auth() {
            Some(auth) if auth.is_expired(self.ticket_lifetime) => SessionStatus::Stale,
            _ => state.status(),
        }
    }
}

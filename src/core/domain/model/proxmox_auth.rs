use crate::core::domain::value_object::{ProxmoxCSRFToken, ProxmoxTicket};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A ticket session: the ticket and its CSRF token always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxmoxAuth {
    ticket: ProxmoxTicket,
    csrf_token: ProxmoxCSRFToken,
}

impl ProxmoxAuth {
    pub fn new(ticket: ProxmoxTicket, csrf_token: ProxmoxCSRFToken) -> Self {
        Self { ticket, csrf_token }
    }

    pub fn ticket(&self) -> &ProxmoxTicket {
        &self.ticket
    }

    pub fn csrf_token(&self) -> &ProxmoxCSRFToken {
        &self.csrf_token
    }

    /// True once the ticket is older than `lifetime`.
    pub fn is_expired(&self, lifetime: Duration) -> bool {
        self.ticket.is_expired(lifetime)
    }
}

use crate::core::domain::{
    error::ValidationError,
    value_object::{ProxmoxHost, ProxmoxPort, ProxmoxScheme, ProxmoxUrl},
};
use std::time::Duration;

/// Connection parameters of an engine. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ProxmoxConnection {
    host: ProxmoxHost,
    port: ProxmoxPort,
    scheme: ProxmoxScheme,
    auth_timeout: Duration,
    query_timeout: Duration,
    accept_invalid_certs: bool,
    url: ProxmoxUrl,
}

impl ProxmoxConnection {
    /// Timeout of the login exchange when none is configured.
    pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_millis(5_000);
    /// Timeout of every other call when none is configured.
    pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(60_000);

    /// Creates the connection parameters. A zero timeout falls back to its
    /// default.
    pub fn new(
        host: ProxmoxHost,
        port: ProxmoxPort,
        scheme: ProxmoxScheme,
        auth_timeout: Duration,
        query_timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, ValidationError> {
        let url = ProxmoxUrl::new(&host, &port, scheme)?;
        Ok(Self {
            host,
            port,
            scheme,
            auth_timeout: non_zero_or(auth_timeout, Self::DEFAULT_AUTH_TIMEOUT),
            query_timeout: non_zero_or(query_timeout, Self::DEFAULT_QUERY_TIMEOUT),
            accept_invalid_certs,
            url,
        })
    }

    pub fn host(&self) -> &ProxmoxHost {
        &self.host
    }

    pub fn port(&self) -> ProxmoxPort {
        self.port
    }

    pub fn scheme(&self) -> ProxmoxScheme {
        self.scheme
    }

    pub fn auth_timeout(&self) -> Duration {
        self.auth_timeout
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Base URL, `scheme://host:port`.
    pub fn url(&self) -> &ProxmoxUrl {
        &self.url
    }
}

fn non_zero_or(value: Duration, default: Duration) -> Duration {
    if value.is_zero() { default } else { value }
}

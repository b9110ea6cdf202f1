//! An authenticated request engine for the Proxmox VE REST API.
//!
//! [`ProxmoxEngine`] logs in (or uses a static API token), keeps the session
//! ticket, forwards arbitrary REST calls, and transparently logs in again
//! once when the server reports that the ticket has gone stale.

mod auth;
mod core;

#[cfg(test)]
mod tests;

pub use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult, RequestErrorKind, ValidationError},
    model::{
        engine_config::{EngineConfig, RateLimitConfig},
        http_method::HttpMethod,
        proxmox_auth::ProxmoxAuth,
        proxmox_connection::ProxmoxConnection,
        proxmox_credential::ProxmoxCredential,
        request_params::{ParamValue, RequestParams},
        session_state::SessionStatus,
    },
    requestable::{ApiRequestable, ApiRequestableExt},
    value_object::{
        ProxmoxCSRFToken, ProxmoxHost, ProxmoxPassword, ProxmoxPort, ProxmoxScheme, ProxmoxTicket,
        ProxmoxTokenId, ProxmoxTokenSecret, ProxmoxUrl, ProxmoxUsername,
    },
};

use crate::core::{domain::value_object::score_from_level, infrastructure::api_client::ApiClient};
use async_trait::async_trait;
use serde_json::Value;
use std::{path::Path, sync::Arc, time::Duration};

/// A client for the Proxmox VE API that manages its own session.
///
/// Cloning is cheap; clones share the connection and session.
///
/// # Examples
///
/// ```no_run
/// use proxmox_engine::{HttpMethod, ProxmoxEngine, ProxmoxResult, RequestParams};
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let engine = ProxmoxEngine::builder()
///         .host("pve.example.com")
///         .credentials("root@pam", "password")
///         .build()?;
///
///     let nodes = engine
///         .request(HttpMethod::Get, "/api2/json/nodes", Some(RequestParams::new().with("full", true)))
///         .await?;
///     println!("{nodes}");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProxmoxEngine {
    api_client: Arc<ApiClient>,
}

/// Builder for ProxmoxEngine configuration
#[derive(Debug, Default)]
pub struct ProxmoxEngineBuilder {
    host: Option<String>,
    port: Option<u16>,
    scheme: Option<ProxmoxScheme>,
    auth_timeout: Option<Duration>,
    query_timeout: Option<Duration>,
    username: Option<String>,
    password: Option<String>,
    token_id: Option<String>,
    token_secret: Option<String>,
    accept_invalid_certs: bool,
    password_strength: Option<u8>,
    rate_limit: Option<RateLimitConfig>,
    ticket_lifetime: Option<Duration>,
}

impl ProxmoxEngineBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Defaults to 8006.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Defaults to HTTPS.
    pub fn scheme(mut self, scheme: ProxmoxScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Shorthand for [`scheme`](Self::scheme): `true` selects HTTPS.
    pub fn secure(self, secure: bool) -> Self {
        self.scheme(ProxmoxScheme::from(secure))
    }

    /// Timeout of the login exchange. Defaults to 5 seconds.
    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = Some(timeout);
        self
    }

    /// Timeout of every other call. Defaults to 60 seconds.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Username (`user@realm`) and password. The username defaults to
    /// `root@pam` when only [`password`](Self::password) is set.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// API token id (`USER@REALM!TOKENID`) and secret (lowercase UUID).
    /// Takes precedence over a password when the secret is non-empty.
    pub fn api_token(mut self, token_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self.token_secret = Some(secret.into());
        self
    }

    /// Accept self-signed certificates, as installed by default on PVE.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Reject passwords whose zxcvbn score is below `level` (0-4).
    pub fn enable_password_strength(mut self, level: u8) -> Self {
        self.password_strength = Some(level);
        self
    }

    /// Throttle outgoing calls to `requests_per_second`, allowing bursts
    /// of `burst_size`.
    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    /// Age after which a ticket is renewed proactively. Defaults to the two
    /// hours PVE keeps tickets valid.
    pub fn ticket_lifetime(mut self, lifetime: Duration) -> Self {
        self.ticket_lifetime = Some(lifetime);
        self
    }

    /// Builder populated from `PROXMOX_*` environment variables.
    ///
    /// Reads `PROXMOX_HOST`, `PROXMOX_PORT`, `PROXMOX_SCHEME`,
    /// `PROXMOX_USERNAME`, `PROXMOX_PASSWORD`, `PROXMOX_TOKEN_ID`,
    /// `PROXMOX_TOKEN_SECRET`, `PROXMOX_AUTH_TIMEOUT_MS`,
    /// `PROXMOX_QUERY_TIMEOUT_MS` and `PROXMOX_ACCEPT_INVALID_CERTS`.
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// `ProxmoxError::Configuration` if a numeric or boolean variable does
    /// not parse.
    pub fn from_env() -> ProxmoxResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> ProxmoxResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self {
            host: lookup("PROXMOX_HOST"),
            username: lookup("PROXMOX_USERNAME"),
            password: lookup("PROXMOX_PASSWORD"),
            token_id: lookup("PROXMOX_TOKEN_ID"),
            token_secret: lookup("PROXMOX_TOKEN_SECRET"),
            ..Self::default()
        };
        if let Some(port) = lookup("PROXMOX_PORT") {
            builder.port = Some(parse_env("PROXMOX_PORT", &port)?);
        }
        if let Some(scheme) = lookup("PROXMOX_SCHEME") {
            builder.scheme = Some(scheme.parse()?);
        }
        if let Some(ms) = lookup("PROXMOX_AUTH_TIMEOUT_MS") {
            builder.auth_timeout = Some(Duration::from_millis(parse_env("PROXMOX_AUTH_TIMEOUT_MS", &ms)?));
        }
        if let Some(ms) = lookup("PROXMOX_QUERY_TIMEOUT_MS") {
            builder.query_timeout = Some(Duration::from_millis(parse_env("PROXMOX_QUERY_TIMEOUT_MS", &ms)?));
        }
        if let Some(flag) = lookup("PROXMOX_ACCEPT_INVALID_CERTS") {
            builder.accept_invalid_certs = parse_env("PROXMOX_ACCEPT_INVALID_CERTS", &flag)?;
        }
        Ok(builder)
    }

    /// Validates the configuration and creates the engine.
    ///
    /// No network I/O happens here; the first login is deferred to the first
    /// call.
    ///
    /// # Errors
    /// `ProxmoxError::Configuration` for a missing or invalid host, port,
    /// password, token id or token secret, or a zero rate limit.
    pub fn build(self) -> ProxmoxResult<ProxmoxEngine> {
        let host = ProxmoxHost::new(
            self.host
                .ok_or_else(|| ValidationError::field("host", "Host is required"))?,
        )?;
        let port = ProxmoxPort::new(self.port.unwrap_or(ProxmoxPort::DEFAULT))?;
        let min_score = self.password_strength.map(score_from_level).transpose()?;

        let credential = ProxmoxCredential::from_parts(
            self.username,
            self.password,
            self.token_id,
            self.token_secret,
            min_score,
        )?;

        let connection = ProxmoxConnection::new(
            host,
            port,
            self.scheme.unwrap_or_default(),
            self.auth_timeout.unwrap_or(ProxmoxConnection::DEFAULT_AUTH_TIMEOUT),
            self.query_timeout.unwrap_or(ProxmoxConnection::DEFAULT_QUERY_TIMEOUT),
            self.accept_invalid_certs,
        )?;

        let config = EngineConfig {
            ticket_lifetime: self
                .ticket_lifetime
                .unwrap_or(EngineConfig::DEFAULT_TICKET_LIFETIME),
            rate_limit: self.rate_limit,
        };

        tracing::debug!(
            url = %connection.url(),
            token_auth = credential.is_token(),
            "configured Proxmox engine"
        );

        Ok(ProxmoxEngine {
            api_client: Arc::new(ApiClient::new(connection, credential, config)?),
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ValidationError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ValidationError::field(key, format!("cannot parse '{}': {}", value, e)))
}

impl ProxmoxEngine {
    /// Creates a new builder for ProxmoxEngine configuration
    pub fn builder() -> ProxmoxEngineBuilder {
        ProxmoxEngineBuilder::default()
    }

    /// Performs an authenticated API call and returns the `data` member of
    /// the response envelope.
    ///
    /// `path` is the resource path, e.g. `/api2/json/nodes`, without a
    /// query string. Parameters go into the query string for GET and DELETE
    /// and into a form body for POST and PUT; booleans are sent as `1`/`0`.
    ///
    /// A `401` reporting an invalid ticket clears the session and the call
    /// is sent once more; null parameters are dropped from that retry.
    ///
    /// Dropping the returned future cancels the in-flight request.
    ///
    /// # Errors
    /// * `Authentication` if a needed login exchange fails
    /// * `Transport` if the call cannot be issued or times out
    /// * `Protocol` if the response has an unexpected content type
    /// * `Request` for any non-`200` status
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<RequestParams>,
    ) -> ProxmoxResult<Value> {
        self.api_client.request(method, path, params).await
    }

    /// Returns the current ticket and CSRF token, logging in if there is no
    /// usable session. Token engines return the static authorization value
    /// and no CSRF token.
    ///
    /// # Errors
    /// `Authentication` if the login exchange fails.
    pub async fn ensure_session(&self) -> ProxmoxResult<(String, Option<String>)> {
        self.api_client.ensure_session().await
    }

    /// Authenticates with the Proxmox server, replacing any cached session.
    ///
    /// # Errors
    /// This method will return an error if:
    /// - The credentials are invalid
    /// - The server is unreachable
    /// - The response format is invalid
    pub async fn login(&self) -> ProxmoxResult<()> {
        self.api_client.login().await
    }

    /// Forgets the cached session; the next call logs in again.
    pub async fn invalidate_session(&self) {
        self.api_client.invalidate_session().await
    }

    /// The current ticket, or the static `PVEAPIToken=...` value for token
    /// engines. `None` until the first login.
    pub async fn ticket(&self) -> Option<String> {
        self.api_client.ticket().await
    }

    /// The current CSRF prevention token. Always `None` for token engines.
    pub async fn csrf_token(&self) -> Option<String> {
        self.api_client.csrf_token().await
    }

    pub async fn session_status(&self) -> SessionStatus {
        self.api_client.session_status().await
    }

    /// Returns true if calls can be made without a login exchange.
    pub async fn is_authenticated(&self) -> bool {
        matches!(
            self.session_status().await,
            SessionStatus::Authenticated | SessionStatus::StaticToken
        )
    }

    pub fn is_token_auth(&self) -> bool {
        self.api_client.is_token_auth()
    }

    pub fn connection(&self) -> &ProxmoxConnection {
        self.api_client.connection()
    }

    /// Writes the current ticket session to `path` as JSON.
    ///
    /// # Errors
    /// `Configuration` for token engines or when there is no session yet;
    /// `Io`/`Serialization` if writing fails.
    pub async fn save_session_to_file(&self, path: impl AsRef<Path>) -> ProxmoxResult<()> {
        let auth = self.api_client.auth().await?.ok_or_else(|| {
            ValidationError::ConstraintViolation("no session to persist, log in first".to_string())
        })?;
        let json = serde_json::to_vec_pretty(&auth)?;
        tokio::fs::write(path.as_ref(), json).await?;
        tracing::debug!(path = %path.as_ref().display(), "saved PVE session");
        Ok(())
    }

    /// Restores a session written by
    /// [`save_session_to_file`](Self::save_session_to_file), so the next call
    /// skips the login exchange.
    ///
    /// # Errors
    /// `Configuration` for token engines; `Io`/`Serialization` if the file
    /// cannot be read or decoded.
    pub async fn load_session_from_file(&self, path: impl AsRef<Path>) -> ProxmoxResult<()> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let auth: ProxmoxAuth = serde_json::from_slice(&bytes)?;
        self.api_client.set_auth(auth).await?;
        tracing::debug!(path = %path.as_ref().display(), "restored PVE session");
        Ok(())
    }
}

#[async_trait]
impl ApiRequestable for ProxmoxEngine {
    async fn do_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<RequestParams>,
    ) -> ProxmoxResult<Value> {
        self.request(method, path, params).await
    }
}

use crate::{
    ProxmoxAuth, ProxmoxCSRFToken, ProxmoxConnection, ProxmoxError, ProxmoxResult, ProxmoxTicket,
    auth::application::{request::login_request::LoginRequest, response::login_response::LoginResponse},
    core::infrastructure::response_interpreter::status_text,
};

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};

/// Path of the ticket issuing endpoint.
pub const TICKET_PATH: &str = "/api2/json/access/ticket";

/// Performs the login exchange that turns a username/password into a
/// ticket and CSRF token.
///
/// Failures are reported as [`ProxmoxError::Authentication`] and are never
/// retried here.
#[derive(Debug)]
pub struct LoginService {
    default_headers: HeaderMap,
}

impl LoginService {
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self { default_headers }
    }

    pub async fn execute(
        &self,
        http_client: &Client,
        connection: &ProxmoxConnection,
        username: &str,
        password: &str,
    ) -> ProxmoxResult<ProxmoxAuth> {
        let url = connection.url().join(TICKET_PATH);
        let request = LoginRequest { username, password };

        tracing::debug!(%url, username, "requesting PVE ticket");

        let response = http_client
            .post(&url)
            .headers(self.default_headers.clone())
            .timeout(connection.auth_timeout())
            .body(request.to_form_body())
            .send()
            .await
            .map_err(|e| authentication_error(&url, format!("request failed: {}", e)))?;

        match response.status() {
            StatusCode::OK => self.handle_successful_login(&url, response).await,
            status => Err(authentication_error(
                &url,
                format!("login failed with {}: {}", status.as_u16(), status_text(&response)),
            )),
        }
    }

    async fn handle_successful_login(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> ProxmoxResult<ProxmoxAuth> {
        let login_response = response.json::<LoginResponse>().await.map_err(|e| {
            authentication_error(url, format!("failed to parse login response: {}", e))
        })?;

        let ticket = ProxmoxTicket::new(login_response.data.ticket)
            .map_err(|e| authentication_error(url, e.to_string()))?;
        let csrf_token = ProxmoxCSRFToken::new(login_response.data.csrf_token)
            .map_err(|e| authentication_error(url, e.to_string()))?;

        tracing::info!(%url, "obtained PVE ticket");
        Ok(ProxmoxAuth::new(ticket, csrf_token))
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new()
    }
}

fn authentication_error(url: &str, reason: String) -> ProxmoxError {
    tracing::warn!(%url, %reason, "PVE login failed");
    ProxmoxError::Authentication {
        url: url.to_string(),
        reason,
    }
}

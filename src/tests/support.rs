//! Shared fixtures: engine builders and a scripted HTTP server.
//!
//! PVE reports errors in the HTTP reason phrase and sometimes omits the
//! content type. The scripted server writes raw status lines so both can be
//! reproduced.

use crate::{ProxmoxEngine, ProxmoxScheme};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

pub(crate) const TOKEN_ID: &str = "automation@pve!ci";
pub(crate) const TOKEN_SECRET: &str = "12345678-1234-1234-1234-1234567890ab";
pub(crate) const TOKEN_HEADER: &str =
    "PVEAPIToken=automation@pve!ci=12345678-1234-1234-1234-1234567890ab";
pub(crate) const TICKET_PATH: &str = "/api2/json/access/ticket";

pub(crate) fn password_engine(address: SocketAddr) -> ProxmoxEngine {
    ProxmoxEngine::builder()
        .host(address.ip().to_string())
        .port(address.port())
        .scheme(ProxmoxScheme::Http)
        .credentials("root@pam", "secret")
        .build()
        .unwrap()
}

pub(crate) fn token_engine(address: SocketAddr) -> ProxmoxEngine {
    ProxmoxEngine::builder()
        .host(address.ip().to_string())
        .port(address.port())
        .scheme(ProxmoxScheme::Http)
        .api_token(TOKEN_ID, TOKEN_SECRET)
        .build()
        .unwrap()
}

pub(crate) fn login_body(n: usize) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "ticket": format!("PVE:root@pam:ticket-{}", n),
            "CSRFPreventionToken": format!("csrf-{}", n),
            "username": "root@pam"
        }
    })
}

/// A request as seen by the scripted server.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_login(&self) -> bool {
        self.method == "POST" && self.path() == TICKET_PATH
    }
}

/// A raw response: status line, optional content type and body.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedResponse {
    status: u16,
    reason: String,
    content_type: Option<String>,
    body: String,
}

impl ScriptedResponse {
    pub fn json(status: u16, reason: &str, body: serde_json::Value) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            content_type: Some("application/json;charset=UTF-8".to_string()),
            body: body.to_string(),
        }
    }

    pub fn without_content_type(status: u16, reason: &str, body: &str) -> Self {
        Self {
            status,
            reason: reason.to_string(),
            content_type: None,
            body: body.to_string(),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            self.reason,
            self.body.len()
        );
        if let Some(content_type) = &self.content_type {
            head.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        head.push_str("\r\n");
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

type Handler = dyn Fn(&RecordedRequest) -> ScriptedResponse + Send + Sync;

/// One-connection-per-request HTTP/1.1 server driven by a handler closure.
pub(crate) struct ScriptedServer {
    address: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl ScriptedServer {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> ScriptedResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = handler.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    serve(stream, handler.as_ref(), &recorded).await;
                });
            }
        });

        Self {
            address,
            requests,
            task,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn logins(&self) -> usize {
        self.requests().iter().filter(|r| r.is_login()).count()
    }

    /// Requests other than the login exchange.
    pub fn api_calls(&self) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| !r.is_login()).collect()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, handler: &Handler, recorded: &Mutex<Vec<RecordedRequest>>) {
    let Some(request) = read_request(&mut stream).await else {
        return;
    };
    let response = handler(&request);
    recorded.lock().unwrap().push(request);
    let _ = stream.write_all(&response.to_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = buffer[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

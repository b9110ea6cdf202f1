//! Decoding of the PVE response envelope and status-code dispatch.

use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult, RequestErrorKind},
    model::http_method::HttpMethod,
};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status texts PVE uses on a `401` when the ticket is no longer accepted.
const STALE_TICKET_REASONS: [&str; 2] = [
    "invalid PVE ticket",
    "permission denied - invalid PVE ticket",
];

/// Returns the reason phrase of a response.
///
/// PVE puts its error message in the status line, so the phrase actually
/// sent by the server is preferred over the canonical one.
pub(crate) fn status_text(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default()
}

/// The parts of an HTTP response the interpreter looks at.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    /// Reads the status line, content type and full body.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status().as_u16();
        let status_text = status_text(&response);
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let body = response.text().await?;
        Ok(Self {
            status,
            status_text,
            content_type,
            body,
        })
    }
}

/// The `{ "data": ..., "errors": ... }` envelope every PVE response uses.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

/// Outcome of a response that did not fail outright.
#[derive(Debug)]
pub(crate) enum Interpretation {
    /// `200`: the `data` member of the envelope.
    Success(Value),
    /// `401` with a stale-ticket reason. Carries the error to report if the
    /// call is not retried.
    StaleTicket(ProxmoxError),
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

fn decode_envelope(method: HttpMethod, url: &str, raw: &RawResponse) -> ProxmoxResult<ResponseEnvelope> {
    match raw.content_type.as_deref() {
        Some(content_type) if is_json(content_type) => {
            if raw.body.trim().is_empty() {
                return Ok(ResponseEnvelope::default());
            }
            serde_json::from_str(&raw.body).map_err(|e| ProxmoxError::Protocol {
                method: method.to_string(),
                url: url.to_string(),
                status: raw.status,
                content_type: raw.content_type.clone(),
                body: format!("invalid JSON ({}): {}", e, raw.body),
            })
        }
        None => Ok(ResponseEnvelope {
            data: Value::Null,
            errors: Some(Value::String(raw.body.clone())),
        }),
        Some(_) => Err(ProxmoxError::Protocol {
            method: method.to_string(),
            url: url.to_string(),
            status: raw.status,
            content_type: raw.content_type.clone(),
            body: raw.body.clone(),
        }),
    }
}

/// Maps a response to its outcome.
///
/// An unexpected content type fails before the status is looked at.
pub(crate) fn interpret(
    method: HttpMethod,
    url: &str,
    raw: RawResponse,
) -> ProxmoxResult<Interpretation> {
    let envelope = decode_envelope(method, url, &raw)?;
    if raw.status == 200 {
        return Ok(Interpretation::Success(envelope.data));
    }

    let kind = match raw.status {
        400 | 401 | 500 => RequestErrorKind::Rejected,
        _ => RequestErrorKind::ConnectionFailed,
    };
    let error = ProxmoxError::Request {
        method: method.to_string(),
        url: url.to_string(),
        status: raw.status,
        status_text: raw.status_text.clone(),
        body: serde_json::to_string(&envelope).unwrap_or_default(),
        kind,
    };

    if raw.status == 401 && STALE_TICKET_REASONS.contains(&raw.status_text.as_str()) {
        return Ok(Interpretation::StaleTicket(error));
    }
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://pve.local:8006/api2/json/nodes";

    fn raw(status: u16, status_text: &str, content_type: Option<&str>, body: &str) -> RawResponse {
        RawResponse {
            status,
            status_text: status_text.to_string(),
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        }
    }

    const JSON: Option<&str> = Some("application/json;charset=UTF-8");

    #[test]
    fn test_success_returns_inner_data() {
        let outcome = interpret(
            HttpMethod::Get,
            URL,
            raw(200, "OK", JSON, r#"{"data":[{"node":"pve1"}]}"#),
        )
        .unwrap();
        match outcome {
            Interpretation::Success(data) => assert_eq!(data[0]["node"], "pve1"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_json_media_type_parameters_are_ignored() {
        for content_type in ["application/json", "Application/JSON; charset=utf-8"] {
            let outcome =
                interpret(HttpMethod::Get, URL, raw(200, "OK", Some(content_type), r#"{"data":1}"#));
            assert!(matches!(outcome, Ok(Interpretation::Success(_))));
        }
    }

    #[test]
    fn test_bad_request_and_server_error() {
        for status in [400, 500] {
            let result = interpret(
                HttpMethod::Post,
                URL,
                raw(status, "Parameter verification failed.", JSON, r#"{"data":null,"errors":{"vmid":"invalid"}}"#),
            );
            match result {
                Err(ProxmoxError::Request { status: s, body, kind, status_text, .. }) => {
                    assert_eq!(s, status);
                    assert_eq!(kind, RequestErrorKind::Rejected);
                    assert_eq!(status_text, "Parameter verification failed.");
                    assert_eq!(body, r#"{"data":null,"errors":{"vmid":"invalid"}}"#);
                }
                other => panic!("unexpected result {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_status_is_connection_failure() {
        let result = interpret(HttpMethod::Get, URL, raw(503, "Service Unavailable", JSON, r#"{"data":null}"#));
        assert!(matches!(
            result,
            Err(ProxmoxError::Request {
                kind: RequestErrorKind::ConnectionFailed,
                status: 503,
                ..
            })
        ));
    }

    #[test]
    fn test_stale_ticket_reasons() {
        for reason in STALE_TICKET_REASONS {
            let outcome = interpret(HttpMethod::Get, URL, raw(401, reason, JSON, r#"{"data":null}"#));
            assert!(matches!(outcome, Ok(Interpretation::StaleTicket(_))), "{}", reason);
        }
    }

    #[test]
    fn test_other_unauthorized_is_plain_error() {
        let result = interpret(HttpMethod::Get, URL, raw(401, "No ticket", JSON, r#"{"data":null}"#));
        assert!(matches!(result, Err(ProxmoxError::Request { status: 401, .. })));
    }

    #[test]
    fn test_missing_content_type_keeps_text_as_errors() {
        let result = interpret(HttpMethod::Get, URL, raw(500, "Internal Server Error", None, "boom"));
        match result {
            Err(ProxmoxError::Request { body, .. }) => {
                assert_eq!(body, r#"{"data":null,"errors":"boom"}"#)
            }
            other => panic!("unexpected result {:?}", other),
        }

        let outcome = interpret(HttpMethod::Get, URL, raw(200, "OK", None, "")).unwrap();
        assert!(matches!(outcome, Interpretation::Success(Value::Null)));
    }

    #[test]
    fn test_unexpected_content_type_fails_regardless_of_status() {
        for status in [200, 401, 500] {
            let result = interpret(HttpMethod::Get, URL, raw(status, "x", Some("text/plain"), ""));
            assert!(
                matches!(result, Err(ProxmoxError::Protocol { status: s, .. }) if s == status),
                "status {}",
                status
            );
        }
    }

    #[test]
    fn test_invalid_json_is_protocol_error() {
        let result = interpret(HttpMethod::Get, URL, raw(200, "OK", JSON, "{not json"));
        assert!(matches!(result, Err(ProxmoxError::Protocol { .. })));
    }
}

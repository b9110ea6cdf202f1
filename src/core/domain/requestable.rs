//! The seam between the request engine and the code that calls into it.
//!
//! Endpoint trees, samples and other collaborators only ever need a verb, a
//! path and a parameter bag; they depend on [`ApiRequestable`] rather than on
//! the engine itself.

use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult},
    model::{http_method::HttpMethod, request_params::RequestParams},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Anything able to perform an authenticated PVE API call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiRequestable: Send + Sync {
    /// Performs the call and returns the `data` member of the response
    /// envelope.
    async fn do_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: Option<RequestParams>,
    ) -> ProxmoxResult<Value>;
}

/// Typed helpers on top of [`ApiRequestable`].
///
/// # Errors
/// Besides the errors of the underlying call, a payload that does not
/// deserialize into `T` is reported as [`ProxmoxError::Protocol`].
#[async_trait]
pub trait ApiRequestableExt: ApiRequestable {
    async fn get<T>(&self, path: &str, params: Option<RequestParams>) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.do_request(HttpMethod::Get, path, params).await?;
        decode_payload(HttpMethod::Get, path, data)
    }

    async fn post<T>(&self, path: &str, params: Option<RequestParams>) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.do_request(HttpMethod::Post, path, params).await?;
        decode_payload(HttpMethod::Post, path, data)
    }

    async fn put<T>(&self, path: &str, params: Option<RequestParams>) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.do_request(HttpMethod::Put, path, params).await?;
        decode_payload(HttpMethod::Put, path, data)
    }

    async fn delete<T>(&self, path: &str, params: Option<RequestParams>) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let data = self.do_request(HttpMethod::Delete, path, params).await?;
        decode_payload(HttpMethod::Delete, path, data)
    }
}

impl<R: ApiRequestable + ?Sized> ApiRequestableExt for R {}

fn decode_payload<T: DeserializeOwned>(
    method: HttpMethod,
    path: &str,
    data: Value,
) -> ProxmoxResult<T> {
    let rendered = data.to_string();
    serde_json::from_value(data).map_err(|e| ProxmoxError::Protocol {
        method: method.to_string(),
        url: path.to_string(),
        status: 200,
        content_type: Some("application/json".to_string()),
        body: format!("cannot decode payload ({}): {}", e, rendered),
    })
}

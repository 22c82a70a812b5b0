//! Reqwest-backed callback transport.
//!
//! This adapter owns transport details only: request construction, the
//! request timeout, and mapping of HTTP failures into port errors. It never
//! retries.

use std::time::Duration;

use async_trait::async_trait;
use fspiop::{HttpMethod, headers};
use reqwest::{Client, Method, Request, StatusCode};
use tracing::debug;

use super::status_message;
use crate::domain::ports::{CallbackRequest, CallbackTransport, CallbackTransportError};

const DEFAULT_USER_AGENT: &str = "fspiop-translator/0.1";

/// Callback transport sending each request once over a shared client.
#[derive(Clone)]
pub struct ReqwestCallbackTransport {
    client: Client,
}

impl ReqwestCallbackTransport {
    /// Build a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    fn build_request(&self, request: &CallbackRequest) -> Result<Request, CallbackTransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if request.header(headers::ACCEPT).is_none() {
            if let Some(content_type) = request.header(headers::CONTENT_TYPE) {
                builder = builder.header(headers::ACCEPT, content_type);
            }
        }
        if let Some(body) = request.body.as_ref() {
            let bytes = serde_json::to_vec(body).map_err(|error| {
                CallbackTransportError::transport(format!("body could not be encoded: {error}"))
            })?;
            builder = builder.body(bytes);
        }
        builder.build().map_err(map_transport_error)
    }
}

#[async_trait]
impl CallbackTransport for ReqwestCallbackTransport {
    async fn send(&self, request: CallbackRequest) -> Result<(), CallbackTransportError> {
        let outbound = self.build_request(&request)?;
        let response = self
            .client
            .execute(outbound)
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(url = %request.url, status = status.as_u16(), "callback accepted");
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
    }
}

fn map_transport_error(error: reqwest::Error) -> CallbackTransportError {
    if error.is_timeout() {
        CallbackTransportError::timeout(error.to_string())
    } else {
        CallbackTransportError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CallbackTransportError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CallbackTransportError::timeout(status_message(status, body))
        }
        _ => CallbackTransportError::status(status.as_u16()),
    }
}

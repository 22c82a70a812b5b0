//! Driven port sending HTTP callbacks to participants.

use async_trait::async_trait;
use fspiop::HttpMethod;
use serde_json::Value;

use super::define_port_error;

/// A fully addressed outbound callback.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackRequest {
    /// Absolute URL of the callback.
    pub url: String,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Headers in canonical lower-case form.
    pub headers: Vec<(String, String)>,
    /// JSON body; `None` for bodiless verbs.
    pub body: Option<Value>,
}

impl CallbackRequest {
    /// Value of the first header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

define_port_error! {
    /// Errors raised by callback transports.
    pub enum CallbackTransportError {
        /// The request never produced a response.
        Transport { message: String } => "callback transport failed: {message}",
        /// The participant answered with a non-success status.
        Status { status: u16 } => "callback rejected with status {status}",
        /// The transport timed out waiting for the participant.
        Timeout { message: String } => "callback timed out: {message}",
    }
}

/// Port delivering callbacks; implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    /// Send one callback.
    async fn send(&self, request: CallbackRequest) -> Result<(), CallbackTransportError>;
}

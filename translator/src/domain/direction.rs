//! Header-direction engine.
//!
//! Decides the outbound `fspiop-source`/`fspiop-destination` pair and the
//! participant that receives the callback. The decision depends only on the
//! [`Direction`] a rule picked for its event kind; the inbound headers are
//! read, never mutated.

use crate::domain::error::TranslationError;
use crate::domain::event::ProtocolHeaders;

/// How a callback is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    /// A request forwarded on behalf of one FSP to another. Both identities
    /// come from the payload.
    Forward {
        source: Option<String>,
        destination: Option<String>,
    },
    /// The switch relays an answer to whoever asked.
    QueryResponse,
    /// A rejection forwarded unchanged to the error path of the resource.
    Reject,
    /// A notification the switch itself originates.
    HubNotification { destination: Option<String> },
}

impl Direction {
    /// Forwarded request between two payload-named FSPs.
    pub fn forward(source: Option<String>, destination: Option<String>) -> Self {
        Self::Forward {
            source,
            destination,
        }
    }

    /// Whether the callback targets the resource's error path.
    pub const fn is_error_path(&self) -> bool {
        matches!(self, Self::Reject)
    }

    /// Direction name for logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forward { .. } => "forward",
            Self::QueryResponse => "query-response",
            Self::Reject => "reject",
            Self::HubNotification { .. } => "hub-notification",
        }
    }
}

/// Outcome of applying a [`Direction`] to an inbound header set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addressing {
    /// Outbound headers with the direction applied.
    pub headers: ProtocolHeaders,
    /// Participant whose endpoint receives the callback.
    pub target_fsp_id: String,
    /// Whether the URL must end in `/error`.
    pub error_path: bool,
}

fn required(value: Option<&str>, field: &str) -> Result<String, TranslationError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| TranslationError::missing(field))
}

/// Apply `direction` to `inbound`.
///
/// # Errors
///
/// Returns [`TranslationError::MissingRequiredField`] when an identity the
/// direction needs is blank. No network call has happened at that point.
///
/// # Examples
/// ```
/// use translator::domain::{address, Direction, ProtocolHeaders};
///
/// let inbound = ProtocolHeaders::from_source("bankA").with_destination("");
/// let addressing = address(&Direction::QueryResponse, &inbound, "hub")?;
/// assert_eq!(addressing.headers.source, "hub");
/// assert_eq!(addressing.headers.destination.as_deref(), Some("bankA"));
/// assert_eq!(addressing.target_fsp_id, "bankA");
/// # Ok::<(), translator::domain::TranslationError>(())
/// ```
pub fn address(
    direction: &Direction,
    inbound: &ProtocolHeaders,
    hub_id: &str,
) -> Result<Addressing, TranslationError> {
    let mut headers = inbound.for_outbound_hop();
    let target_fsp_id = match direction {
        Direction::Forward {
            source,
            destination,
        } => {
            let source = required(source.as_deref(), "source fsp id")?;
            let destination = required(destination.as_deref(), "destination fsp id")?;
            headers.source = source;
            headers.destination = Some(destination.clone());
            destination
        }
        Direction::QueryResponse => {
            // A blank inbound destination makes no difference: the reply
            // always goes back to the requester.
            let requester = required(Some(inbound.source.as_str()), "fspiop-source")?;
            headers.destination = Some(requester.clone());
            headers.source = hub_id.to_owned();
            requester
        }
        Direction::Reject => {
            let destination = required(inbound.destination_id(), "fspiop-destination")?;
            headers.destination = Some(destination.clone());
            destination
        }
        Direction::HubNotification { destination } => {
            let destination = required(destination.as_deref(), "destination fsp id")?;
            headers.source = hub_id.to_owned();
            headers.destination = Some(destination.clone());
            destination
        }
    };
    Ok(Addressing {
        headers,
        target_fsp_id,
        error_path: direction.is_error_path(),
    })
}

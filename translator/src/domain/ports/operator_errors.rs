//! Driven port for the operator escalation topic.
//!
//! An operator-error event is the last record of a failure the translator
//! could not report to any participant. Its subject identifies the business
//! entity in the vocabulary of the bounded context that raised it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;
use crate::domain::context::BoundedContext;

/// Identifiers of the entity whose error callback could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "context", rename_all = "kebab-case")]
pub enum OperatorErrorSubject {
    /// A party or participant lookup.
    #[serde(rename_all = "camelCase")]
    AccountLookup {
        party_type: Option<String>,
        party_id: Option<String>,
        party_sub_type: Option<String>,
    },
    /// A quote or bulk quote.
    #[serde(rename_all = "camelCase")]
    Quoting {
        quote_id: Option<String>,
        bulk_quote_id: Option<String>,
    },
    /// A transfer or bulk transfer.
    #[serde(rename_all = "camelCase")]
    Transfers {
        transfer_id: Option<String>,
        bulk_transfer_id: Option<String>,
    },
}

impl OperatorErrorSubject {
    /// Bounded context the subject belongs to.
    pub const fn context(&self) -> BoundedContext {
        match self {
            Self::AccountLookup { .. } => BoundedContext::AccountLookup,
            Self::Quoting { .. } => BoundedContext::Quoting,
            Self::Transfers { .. } => BoundedContext::Transfers,
        }
    }
}

/// Event published when error feedback to a participant fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorErrorEvent {
    /// Failed entity.
    #[serde(flatten)]
    pub subject: OperatorErrorSubject,
    /// Participant that could not be notified.
    pub fsp_id: String,
    /// Standard error code that should have been delivered.
    pub error_code: String,
    /// Why delivery of the error callback failed.
    pub description: String,
}

define_port_error! {
    /// Errors raised by escalation publishers.
    pub enum OperatorErrorPublishError {
        /// The escalation topic rejected or dropped the event.
        Unavailable { message: String } => "operator error topic unavailable: {message}",
    }
}

/// Port publishing operator-error events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperatorErrorPublisher: Send + Sync {
    /// Publish one event; callers log failures and move on.
    async fn publish(&self, event: OperatorErrorEvent) -> Result<(), OperatorErrorPublishError>;
}

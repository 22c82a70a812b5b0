//! Validate-then-transform gate in front of every outbound body.

use std::fmt;
use std::sync::Arc;

use fspiop::EntityCategory;
use serde_json::Value;
use tracing::debug;

use crate::domain::error::TranslationError;
use crate::domain::event::ProtocolExtras;
use crate::domain::ports::{PayloadSchema, PayloadSchemaError};

/// Wire bodies the translator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireShape {
    /// `PUT /parties/...`.
    PartiesPut,
    /// `PUT /participants/...`.
    ParticipantsPut,
    /// `POST /quotes`.
    QuotesPost,
    /// `PUT /quotes/{id}`.
    QuotesPut,
    /// `POST /bulkQuotes`.
    BulkQuotesPost,
    /// `PUT /bulkQuotes/{id}`.
    BulkQuotesPut,
    /// `POST /transfers`.
    TransfersPost,
    /// `PUT /transfers/{id}`.
    TransfersPut,
    /// `PATCH /transfers/{id}`.
    TransfersPatch,
    /// `POST /bulkTransfers`.
    BulkTransfersPost,
    /// `PUT /bulkTransfers/{id}`.
    BulkTransfersPut,
    /// `PUT /.../error`.
    ErrorInformation,
}

impl WireShape {
    /// Entity category the shape is sent to, when fixed.
    pub const fn entity(self) -> Option<EntityCategory> {
        match self {
            Self::PartiesPut => Some(EntityCategory::Parties),
            Self::ParticipantsPut => Some(EntityCategory::Participants),
            Self::QuotesPost | Self::QuotesPut => Some(EntityCategory::Quotes),
            Self::BulkQuotesPost | Self::BulkQuotesPut => Some(EntityCategory::BulkQuotes),
            Self::TransfersPost | Self::TransfersPut | Self::TransfersPatch => {
                Some(EntityCategory::Transfers)
            }
            Self::BulkTransfersPost | Self::BulkTransfersPut => {
                Some(EntityCategory::BulkTransfers)
            }
            Self::ErrorInformation => None,
        }
    }
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Sequences schema validation and transformation.
#[derive(Clone)]
pub struct PayloadGate {
    schema: Arc<dyn PayloadSchema>,
}

impl PayloadGate {
    /// Gate backed by `schema`.
    pub fn new(schema: Arc<dyn PayloadSchema>) -> Self {
        Self { schema }
    }

    /// Validate `payload` for `shape`, then map it to the wire body.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Validation`] when the schema rejects the
    /// payload; the transform is not attempted in that case.
    pub fn prepare(
        &self,
        shape: WireShape,
        payload: &Value,
        extras: &ProtocolExtras,
    ) -> Result<Value, TranslationError> {
        self.schema
            .validate(shape, payload, extras)
            .map_err(|error| match error {
                PayloadSchemaError::Invalid { message } => TranslationError::validation(message),
                PayloadSchemaError::Transform { message } => TranslationError::internal(message),
            })?;
        let body = self
            .schema
            .transform(shape, payload, extras)
            .map_err(|error| TranslationError::internal(error.to_string()))?;
        debug!(%shape, "payload prepared");
        Ok(body)
    }
}

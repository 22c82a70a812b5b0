//! Translation failures and the standard error sent back to participants.
//!
//! [`TranslationError`] is what a rule or the delivery pipeline returns when
//! an event cannot be turned into a callback. It never leaves the
//! dispatcher: it is mapped to a [`StandardError`] and reported to the
//! affected participants instead.

use fspiop::{ApiErrorCode, ErrorInformation};
use thiserror::Error;

use crate::domain::endpoint_resolver::ResolveError;

/// Failures raised while translating one event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The participant directory does not know the FSP.
    #[error("participant {fsp_id} not found")]
    ParticipantNotFound { fsp_id: String },
    /// The participant exists but registered no FSPIOP endpoint.
    #[error("participant {fsp_id} has no FSPIOP callback endpoint")]
    EndpointNotFound { fsp_id: String },
    /// The payload violates the wire schema.
    #[error("payload failed validation: {message}")]
    Validation { message: String },
    /// A field needed to address the callback is absent.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },
    /// The callback could not be delivered.
    #[error("callback delivery failed: {message}")]
    Network { message: String },
    /// The callback should be signed but signing failed.
    #[error("callback signing failed: {message}")]
    Signing { message: String },
    /// Unexpected failure inside the translator or a collaborator.
    #[error("internal translation failure: {message}")]
    Internal { message: String },
}

impl TranslationError {
    /// Internal error code used as the error-mapping key.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ParticipantNotFound { .. } => "ParticipantNotFound",
            Self::EndpointNotFound { .. } => "EndpointNotFound",
            Self::Validation { .. } => "ValidationError",
            Self::MissingRequiredField { .. } => "MissingRequiredField",
            Self::Network { .. } => "NetworkError",
            Self::Signing { .. } => "SigningError",
            Self::Internal { .. } => "InternalError",
        }
    }

    /// Helper for schema validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Helper for absent addressing fields.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Helper for delivery failures.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Helper for signing failures.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Helper for unexpected failures.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ResolveError> for TranslationError {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::ParticipantNotFound { fsp_id } => Self::ParticipantNotFound { fsp_id },
            ResolveError::EndpointNotFound { fsp_id } => Self::EndpointNotFound { fsp_id },
            ResolveError::Directory { fsp_id, source } => {
                Self::network(format!("participant directory lookup for {fsp_id} failed: {source}"))
            }
        }
    }
}

/// Validation errors emitted by [`StandardError::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StandardErrorValidationError {
    /// The source FSP identity was blank.
    #[error("standard error requires a source FSP id")]
    EmptySource,
}

/// The standard error reported to the participants affected by a failure.
///
/// ## Invariants
/// - `source_fsp_id` is non-blank.
/// - `destination_fsp_id`, when present, is non-blank.
///
/// # Examples
/// ```
/// use fspiop::codes;
/// use translator::domain::StandardError;
///
/// let error = StandardError::try_new(codes::PARTY_NOT_FOUND, "bankA")?
///     .with_destination(Some("  ".to_owned()));
/// assert_eq!(error.source_fsp_id(), "bankA");
/// assert_eq!(error.destination_fsp_id(), None);
/// # Ok::<(), translator::domain::StandardErrorValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardError {
    code: ApiErrorCode,
    source_fsp_id: String,
    destination_fsp_id: Option<String>,
}

impl StandardError {
    /// Build a standard error for `source_fsp_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StandardErrorValidationError::EmptySource`] when the source
    /// identity is blank.
    pub fn try_new(
        code: ApiErrorCode,
        source_fsp_id: impl Into<String>,
    ) -> Result<Self, StandardErrorValidationError> {
        let source_fsp_id = source_fsp_id.into();
        let trimmed = source_fsp_id.trim();
        if trimmed.is_empty() {
            return Err(StandardErrorValidationError::EmptySource);
        }
        Ok(Self {
            code,
            source_fsp_id: trimmed.to_owned(),
            destination_fsp_id: None,
        })
    }

    /// Record the destination FSP when it is known; blank values are ignored.
    #[must_use]
    pub fn with_destination(mut self, destination_fsp_id: Option<String>) -> Self {
        self.destination_fsp_id = destination_fsp_id
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self
    }

    /// Standard error code and description.
    pub const fn code(&self) -> ApiErrorCode {
        self.code
    }

    /// Participant whose request failed.
    pub fn source_fsp_id(&self) -> &str {
        &self.source_fsp_id
    }

    /// Counterparty, when known at the point of failure.
    pub fn destination_fsp_id(&self) -> Option<&str> {
        self.destination_fsp_id.as_deref()
    }

    /// Participants that must be notified: the source, then the destination
    /// when it is known and distinct.
    pub fn recipients(&self) -> Vec<&str> {
        let mut recipients = vec![self.source_fsp_id.as_str()];
        if let Some(destination) = self.destination_fsp_id() {
            if destination != self.source_fsp_id {
                recipients.push(destination);
            }
        }
        recipients
    }

    /// Wire representation of the error.
    pub fn to_information(&self) -> ErrorInformation {
        self.code.to_information()
    }
}

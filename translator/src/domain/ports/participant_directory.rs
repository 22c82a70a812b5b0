//! Driven port for the participant directory.
//!
//! The directory resolves an FSP identifier to its registration, including
//! the callback endpoints it has published. Caching, when wanted, is the
//! adapter's concern; the translation core asks on every request.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;

/// A callback endpoint registered by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEndpoint {
    /// Endpoint type; only `FSPIOP` endpoints receive callbacks.
    #[serde(rename = "type")]
    pub endpoint_type: String,
    /// Base URL callbacks are rooted at.
    #[serde(rename = "value")]
    pub base_url: String,
}

impl ParticipantEndpoint {
    /// Build an FSPIOP endpoint for `base_url`.
    pub fn fspiop(base_url: impl Into<String>) -> Self {
        Self {
            endpoint_type: fspiop::FSPIOP_ENDPOINT_TYPE.to_owned(),
            base_url: base_url.into(),
        }
    }
}

/// A participant registration as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// FSP identifier.
    pub id: String,
    /// Registered endpoints of any type.
    #[serde(default, alias = "participantEndpoints")]
    pub endpoints: Vec<ParticipantEndpoint>,
}

define_port_error! {
    /// Errors raised by participant directory adapters.
    pub enum ParticipantDirectoryError {
        /// The directory could not be reached.
        Unavailable { message: String } =>
            "participant directory unavailable: {message}",
        /// The directory answered with a payload that could not be decoded.
        Decode { message: String } =>
            "participant directory response could not be decoded: {message}",
    }
}

/// Port resolving FSP identifiers to registrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    /// Look up a participant; `Ok(None)` when it is not registered.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use translator::domain::ports::{FixtureParticipantDirectory, ParticipantDirectory};
    ///
    /// let directory = FixtureParticipantDirectory::default()
    ///     .with_fspiop_endpoint("bankB", "http://bankb.example");
    /// let participant = directory.participant("bankB").await?;
    /// assert!(participant.is_some());
    /// # Ok::<(), translator::domain::ports::ParticipantDirectoryError>(())
    /// ```
    async fn participant(
        &self,
        fsp_id: &str,
    ) -> Result<Option<Participant>, ParticipantDirectoryError>;
}

/// In-memory directory keyed by FSP identifier.
#[derive(Debug, Clone, Default)]
pub struct FixtureParticipantDirectory {
    participants: HashMap<String, Participant>,
}

impl FixtureParticipantDirectory {
    /// Build a directory from a list of registrations.
    pub fn from_participants(participants: impl IntoIterator<Item = Participant>) -> Self {
        Self {
            participants: participants
                .into_iter()
                .map(|participant| (participant.id.clone(), participant))
                .collect(),
        }
    }

    /// Register `fsp_id` with a single FSPIOP endpoint.
    #[must_use]
    pub fn with_fspiop_endpoint(self, fsp_id: &str, base_url: &str) -> Self {
        self.with_participant(Participant {
            id: fsp_id.to_owned(),
            endpoints: vec![ParticipantEndpoint::fspiop(base_url)],
        })
    }

    /// Register a participant as given.
    #[must_use]
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants
            .insert(participant.id.clone(), participant);
        self
    }

    /// Number of registered participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether no participant is registered.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[async_trait]
impl ParticipantDirectory for FixtureParticipantDirectory {
    async fn participant(
        &self,
        fsp_id: &str,
    ) -> Result<Option<Participant>, ParticipantDirectoryError> {
        Ok(self.participants.get(fsp_id).cloned())
    }
}

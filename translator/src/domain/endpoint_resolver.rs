//! Resolve FSP identifiers to their FSPIOP callback endpoint.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ports::{ParticipantDirectory, ParticipantDirectoryError, ParticipantEndpoint};

/// Reasons an FSP cannot be called back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The directory has no registration for the FSP.
    #[error("participant {fsp_id} is not registered")]
    ParticipantNotFound { fsp_id: String },
    /// The FSP is registered but has no FSPIOP endpoint.
    #[error("participant {fsp_id} has no FSPIOP endpoint")]
    EndpointNotFound { fsp_id: String },
    /// The directory itself failed.
    #[error("participant directory lookup for {fsp_id} failed: {source}")]
    Directory {
        fsp_id: String,
        #[source]
        source: ParticipantDirectoryError,
    },
}

/// Thin wrapper over the participant directory that selects the FSPIOP
/// endpoint and logs misconfigured participants.
#[derive(Clone)]
pub struct EndpointResolver {
    directory: Arc<dyn ParticipantDirectory>,
}

impl EndpointResolver {
    /// Wrap a participant directory.
    pub fn new(directory: Arc<dyn ParticipantDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve `fsp_id` to its FSPIOP endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ParticipantNotFound`] when the directory does
    /// not know the FSP and [`ResolveError::EndpointNotFound`] when it has no
    /// endpoint of type `FSPIOP`. Both are logged with the FSP id first.
    pub async fn resolve(&self, fsp_id: &str) -> Result<ParticipantEndpoint, ResolveError> {
        let participant = self
            .directory
            .participant(fsp_id)
            .await
            .map_err(|source| {
                warn!(fsp_id, error = %source, "participant directory lookup failed");
                ResolveError::Directory {
                    fsp_id: fsp_id.to_owned(),
                    source,
                }
            })?;

        let Some(participant) = participant else {
            warn!(fsp_id, "participant not found");
            return Err(ResolveError::ParticipantNotFound {
                fsp_id: fsp_id.to_owned(),
            });
        };

        let endpoint = participant.endpoints.into_iter().find(|endpoint| {
            endpoint.endpoint_type == fspiop::FSPIOP_ENDPOINT_TYPE
                && !endpoint.base_url.trim().is_empty()
        });
        match endpoint {
            Some(endpoint) => {
                debug!(fsp_id, base_url = %endpoint.base_url, "resolved participant endpoint");
                Ok(endpoint)
            }
            None => {
                warn!(fsp_id, "participant has no FSPIOP endpoint");
                Err(ResolveError::EndpointNotFound {
                    fsp_id: fsp_id.to_owned(),
                })
            }
        }
    }
}

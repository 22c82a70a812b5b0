//! Participant directory loaded from a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    FixtureParticipantDirectory, Participant, ParticipantDirectory, ParticipantDirectoryError,
};
use crate::outbound::fs::read_file;

/// Errors returned while loading a registration file.
#[derive(Debug, Error)]
pub enum StaticDirectoryError {
    /// The file could not be read.
    #[error("failed to read participants file at {path}: {source}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid registration list.
    #[error("failed to parse participants file at {path}: {source}")]
    Parse {
        /// Path to the file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistrationFile {
    List(Vec<Participant>),
    Wrapped { participants: Vec<Participant> },
}

impl RegistrationFile {
    fn into_participants(self) -> Vec<Participant> {
        match self {
            Self::List(participants) | Self::Wrapped { participants } => participants,
        }
    }
}

/// Read-only directory of registrations fixed at load time.
#[derive(Debug, Clone)]
pub struct StaticParticipantDirectory {
    inner: FixtureParticipantDirectory,
}

impl StaticParticipantDirectory {
    /// Load registrations from `path`.
    ///
    /// The file holds either a JSON array of participants or an object with
    /// a `participants` array.
    ///
    /// # Errors
    ///
    /// Returns [`StaticDirectoryError`] when the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, StaticDirectoryError> {
        let payload = read_file(path).map_err(|source| StaticDirectoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json(&payload).map_err(|source| StaticDirectoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), participants = directory.inner.len(), "participants file loaded");
        Ok(directory)
    }

    fn from_json(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let file: RegistrationFile = serde_json::from_slice(payload)?;
        Ok(Self {
            inner: FixtureParticipantDirectory::from_participants(file.into_participants()),
        })
    }
}

#[async_trait]
impl ParticipantDirectory for StaticParticipantDirectory {
    async fn participant(
        &self,
        fsp_id: &str,
    ) -> Result<Option<Participant>, ParticipantDirectoryError> {
        self.inner.participant(fsp_id).await
    }
}

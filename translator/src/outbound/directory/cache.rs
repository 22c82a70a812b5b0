//! Time-bounded cache in front of a participant directory.
//!
//! Only registrations that were found are cached; misses and failures go to
//! the inner directory every time so a newly registered participant is
//! picked up without waiting for expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{Participant, ParticipantDirectory, ParticipantDirectoryError};

struct CachedParticipant {
    expires_at: DateTime<Utc>,
    participant: Participant,
}

/// Directory decorator keeping found registrations for a fixed TTL.
pub struct CachingParticipantDirectory {
    inner: Arc<dyn ParticipantDirectory>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    entries: Mutex<HashMap<String, CachedParticipant>>,
}

impl CachingParticipantDirectory {
    /// Cache `inner` for `ttl`, reading time from `clock`.
    pub fn new(inner: Arc<dyn ParticipantDirectory>, clock: Arc<dyn Clock>, ttl: TimeDelta) -> Self {
        Self {
            inner,
            clock,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, fsp_id: &str, now: DateTime<Utc>) -> Option<Participant> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(fsp_id) {
            Some(entry) if entry.expires_at > now => Some(entry.participant.clone()),
            Some(_) => {
                entries.remove(fsp_id);
                None
            }
            None => None,
        }
    }

    fn store(&self, fsp_id: &str, participant: &Participant, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            fsp_id.to_owned(),
            CachedParticipant {
                expires_at: now + self.ttl,
                participant: participant.clone(),
            },
        );
    }
}

#[async_trait]
impl ParticipantDirectory for CachingParticipantDirectory {
    async fn participant(
        &self,
        fsp_id: &str,
    ) -> Result<Option<Participant>, ParticipantDirectoryError> {
        let now = self.clock.utc();
        if let Some(participant) = self.cached(fsp_id, now) {
            debug!(fsp_id, "participant served from cache");
            return Ok(Some(participant));
        }
        let found = self.inner.participant(fsp_id).await?;
        if let Some(participant) = found.as_ref() {
            self.store(fsp_id, participant, now);
        }
        Ok(found)
    }
}

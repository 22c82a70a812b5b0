//! Translator configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `TRANSLATOR_*` environment variables or a
//! configuration file. Absent values fall back to the defaults supplied by
//! the accessor methods.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HUB_ID: &str = "hub";
const DEFAULT_CONTEXTS: &str = "account-lookup,quoting,transfers";
const DEFAULT_PARTICIPANT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_CALLBACK_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ESCALATION_TOPIC: &str = "operator-errors";
const DEFAULT_BATCH_SIZE: usize = 32;

/// Configuration values for the translator service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRANSLATOR")]
pub struct TranslatorSettings {
    /// Canonical identity of the switch in `fspiop-source`.
    pub hub_id: Option<String>,
    /// Comma-separated bounded contexts to consume.
    pub contexts: Option<String>,
    /// Base URL of the participant registry.
    pub participants_url: Option<String>,
    /// JSON participants file, used when no registry URL is set.
    pub participants_file: Option<PathBuf>,
    /// Seconds a found participant stays cached; `0` disables caching.
    pub participant_cache_ttl_secs: Option<u64>,
    /// Timeout for each outbound HTTP request, in milliseconds.
    pub callback_timeout_ms: Option<u64>,
    /// Sign outbound callbacks.
    #[ortho_config(default = false)]
    pub signing_enabled: bool,
    /// File holding the HMAC signing secret.
    pub signing_key_file: Option<PathBuf>,
    /// Name of the operator escalation topic.
    pub escalation_topic: Option<String>,
    /// FSPIOP API version used in content types.
    pub protocol_version: Option<String>,
    /// Maximum number of events per dispatched batch.
    pub batch_size: Option<usize>,
}

impl TranslatorSettings {
    /// Return the configured hub identity, falling back to the default.
    pub fn hub_id(&self) -> &str {
        self.hub_id.as_deref().unwrap_or(DEFAULT_HUB_ID)
    }

    /// Return the configured context list, falling back to all contexts.
    pub fn contexts(&self) -> &str {
        self.contexts.as_deref().unwrap_or(DEFAULT_CONTEXTS)
    }

    /// Return the participant cache TTL; `None` when caching is disabled.
    pub fn participant_cache_ttl(&self) -> Option<Duration> {
        let seconds = self
            .participant_cache_ttl_secs
            .unwrap_or(DEFAULT_PARTICIPANT_CACHE_TTL_SECS);
        (seconds > 0).then(|| Duration::from_secs(seconds))
    }

    /// Return the outbound request timeout.
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_millis(
            self.callback_timeout_ms
                .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_MS)
                .max(1),
        )
    }

    /// Return the escalation topic name.
    pub fn escalation_topic(&self) -> &str {
        self.escalation_topic
            .as_deref()
            .unwrap_or(DEFAULT_ESCALATION_TOPIC)
    }

    /// Return the FSPIOP API version.
    pub fn protocol_version(&self) -> &str {
        self.protocol_version
            .as_deref()
            .unwrap_or(fspiop::DEFAULT_PROTOCOL_VERSION)
    }

    /// Return the maximum batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1)
    }
}

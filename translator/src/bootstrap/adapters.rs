//! Adapter construction from settings.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use reqwest::Url;
use tracing::{info, warn};

use super::BootstrapError;
use crate::config::TranslatorSettings;
use crate::domain::ports::{MessageSigner, OperatorErrorPublisher, ParticipantDirectory};
use crate::domain::{TranslatorOptions, TranslatorPorts};
use crate::outbound::directory::{
    CachingParticipantDirectory, HttpParticipantDirectory, StaticParticipantDirectory,
};
use crate::outbound::http::ReqwestCallbackTransport;
use crate::outbound::schema::JsonPayloadSchema;
use crate::outbound::signing::{HmacJwsSigner, SigningKey};

/// Identity and protocol options from `settings`.
pub fn translator_options(settings: &TranslatorSettings) -> TranslatorOptions {
    TranslatorOptions {
        hub_id: settings.hub_id().to_owned(),
        protocol_version: settings.protocol_version().to_owned(),
    }
}

/// Participant directory from `settings`, cached when a TTL is configured.
///
/// A registry URL takes precedence over a participants file.
///
/// # Errors
///
/// Returns [`BootstrapError`] when neither source is configured or the
/// configured one cannot be opened.
pub fn build_directory(
    settings: &TranslatorSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn ParticipantDirectory>, BootstrapError> {
    let directory: Arc<dyn ParticipantDirectory> =
        match (settings.participants_url.as_deref(), settings.participants_file.as_deref()) {
            (Some(url), file) => {
                if file.is_some() {
                    warn!("both participants URL and file configured; using the URL");
                }
                let base = Url::parse(url).map_err(|source| BootstrapError::InvalidParticipantsUrl {
                    url: url.to_owned(),
                    source,
                })?;
                info!(%base, "using participant registry");
                Arc::new(HttpParticipantDirectory::new(base, settings.callback_timeout())?)
            }
            (None, Some(path)) => Arc::new(StaticParticipantDirectory::load(path)?),
            (None, None) => return Err(BootstrapError::NoParticipantDirectory),
        };

    let Some(ttl) = settings.participant_cache_ttl() else {
        return Ok(directory);
    };
    let ttl = TimeDelta::from_std(ttl).map_err(|_| BootstrapError::InvalidCacheTtl)?;
    Ok(Arc::new(CachingParticipantDirectory::new(directory, clock, ttl)))
}

/// Signer from `settings`; `None` when signing is disabled.
///
/// # Errors
///
/// Returns [`BootstrapError`] when signing is enabled without a readable,
/// non-empty key file.
pub fn build_signer(
    settings: &TranslatorSettings,
) -> Result<Option<Arc<dyn MessageSigner>>, BootstrapError> {
    if !settings.signing_enabled {
        info!("callback signing disabled");
        return Ok(None);
    }
    let path = settings
        .signing_key_file
        .as_deref()
        .ok_or(BootstrapError::MissingSigningKey)?;
    let key = SigningKey::load(path)?;
    info!(fingerprint = %key.fingerprint(), "callback signing enabled");
    Ok(Some(Arc::new(HmacJwsSigner::new(key))))
}

/// Every port the dispatchers need, built from `settings`.
///
/// # Errors
///
/// Returns [`BootstrapError`] when an adapter cannot be constructed.
pub fn build_ports(
    settings: &TranslatorSettings,
    publisher: Arc<dyn OperatorErrorPublisher>,
) -> Result<TranslatorPorts, BootstrapError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    Ok(TranslatorPorts {
        directory: build_directory(settings, Arc::clone(&clock))?,
        schema: Arc::new(JsonPayloadSchema::new()),
        signer: build_signer(settings)?,
        transport: Arc::new(ReqwestCallbackTransport::new(settings.callback_timeout())?),
        publisher,
        clock,
    })
}

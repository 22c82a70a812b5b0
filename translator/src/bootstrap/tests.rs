//! Service assembly from settings.

use std::path::PathBuf;

use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;
use crate::domain::ports::FixtureParticipantDirectory;
use crate::test_support::files::temp_file_with;
use crate::test_support::{FixedClock, recording_ports};

const PARTICIPANTS: &[u8] =
    br#"[{"id":"bankA","endpoints":[{"type":"FSPIOP","value":"http://bankA.example"}]}]"#;

fn settings() -> TranslatorSettings {
    TranslatorSettings {
        hub_id: None,
        contexts: None,
        participants_url: None,
        participants_file: None,
        participant_cache_ttl_secs: None,
        callback_timeout_ms: None,
        signing_enabled: false,
        signing_key_file: None,
        escalation_topic: None,
        protocol_version: None,
        batch_size: None,
    }
}

#[fixture]
fn participants_file() -> NamedTempFile {
    temp_file_with(PARTICIPANTS).expect("temp file")
}

#[rstest]
#[tokio::test]
async fn file_directory_is_loaded_and_cached(participants_file: NamedTempFile) {
    let settings = TranslatorSettings {
        participants_file: Some(participants_file.path().to_path_buf()),
        ..settings()
    };

    let directory =
        build_directory(&settings, Arc::new(FixedClock::default())).expect("directory builds");

    let participant = directory.participant("bankA").await.expect("lookup");
    assert_eq!(participant.map(|found| found.id), Some("bankA".to_owned()));
}

#[rstest]
fn a_directory_source_is_required() {
    let result = build_directory(&settings(), Arc::new(FixedClock::default()));
    assert!(matches!(result, Err(BootstrapError::NoParticipantDirectory)));
}

#[rstest]
fn registry_url_must_parse() {
    let settings = TranslatorSettings {
        participants_url: Some("not a url".to_owned()),
        ..settings()
    };
    let result = build_directory(&settings, Arc::new(FixedClock::default()));
    assert!(matches!(
        result,
        Err(BootstrapError::InvalidParticipantsUrl { ref url, .. }) if url == "not a url"
    ));
}

#[rstest]
fn missing_participants_file_is_reported() {
    let settings = TranslatorSettings {
        participants_file: Some(PathBuf::from("/no/such/participants.json")),
        ..settings()
    };
    let result = build_directory(&settings, Arc::new(FixedClock::default()));
    assert!(matches!(result, Err(BootstrapError::StaticDirectory(_))));
}

#[rstest]
fn signing_is_off_by_default() {
    assert!(build_signer(&settings()).expect("builds").is_none());
}

#[rstest]
fn enabled_signing_needs_a_key_file() {
    let settings = TranslatorSettings {
        signing_enabled: true,
        ..settings()
    };
    assert!(matches!(
        build_signer(&settings),
        Err(BootstrapError::MissingSigningKey)
    ));
}

#[rstest]
fn enabled_signing_loads_the_key() {
    let key = temp_file_with(b"s3cret\n").expect("temp file");
    let settings = TranslatorSettings {
        signing_enabled: true,
        signing_key_file: Some(key.path().to_path_buf()),
        ..settings()
    };
    assert!(build_signer(&settings).expect("builds").is_some());
}

#[rstest]
fn options_follow_settings() {
    let settings = TranslatorSettings {
        hub_id: Some("switch".to_owned()),
        protocol_version: Some("1.0".to_owned()),
        ..settings()
    };
    let options = translator_options(&settings);
    assert_eq!(options.hub_id, "switch");
    assert_eq!(options.protocol_version, "1.0");
}

#[rstest]
#[tokio::test]
async fn unknown_contexts_abort_startup() {
    let (ports, _) = recording_ports(FixtureParticipantDirectory::default());
    let settings = TranslatorSettings {
        contexts: Some("quoting,settlements".to_owned()),
        ..settings()
    };
    let result = Service::start_with(&settings, &ports);
    assert!(matches!(
        result,
        Err(BootstrapError::Wiring(WiringError::UnhandledBoundedContext { .. }))
    ));
}

#[rstest]
#[tokio::test]
async fn service_routes_events_and_drains_on_shutdown() {
    let directory = FixtureParticipantDirectory::default()
        .with_fspiop_endpoint("bankA", "http://bankA.example");
    let (ports, recorders) = recording_ports(directory);
    let settings = TranslatorSettings {
        contexts: Some("transfers,quoting".to_owned()),
        ..settings()
    };

    let service = Service::start_with(&settings, &ports).expect("starts");
    assert_eq!(
        service.contexts(),
        vec![BoundedContext::Transfers, BoundedContext::Quoting]
    );
    let line = r#"{"topic":"quoting","event":{"kind":"QuoteQueryResponse","payload":{"quoteId":"q-1"},"protocolState":{"type":"FSPIOP_v1_1","headers":{"fspiop-source":"bankA"}}}}"#;
    service.router().route(line).await.expect("routed");

    let summaries = service.shutdown().await;

    let quoting = summaries
        .iter()
        .find(|(context, _)| *context == BoundedContext::Quoting)
        .map(|(_, summary)| *summary)
        .expect("quoting summary");
    assert_eq!(quoting.report.delivered, 1);
    assert_eq!(summaries.len(), 2);
    let requests = recorders.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://bankA.example/quotes/q-1");
}

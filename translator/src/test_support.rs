//! Test utilities for the translator crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Only compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use crate::domain::ports::{
    CallbackRequest, CallbackTransport, CallbackTransportError, OperatorErrorEvent,
    OperatorErrorPublishError, OperatorErrorPublisher, ParticipantDirectory, PayloadSchema,
    PayloadSchemaError,
};
use crate::domain::{ProtocolExtras, TranslatorPorts, WireShape};

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{name} mutex"),
    }
}

pub mod files {
    //! Temporary files for adapters that read from disk.

    use std::io::{self, Write};

    use tempfile::NamedTempFile;

    /// Write `contents` to a fresh temporary file that lives as long as the
    /// returned handle.
    pub fn temp_file_with(contents: &[u8]) -> io::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents)?;
        file.flush()?;
        Ok(file)
    }
}

/// Clock returning a settable instant.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0, "clock") += TimeDelta::seconds(seconds);
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        match Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() {
            Some(now) => Self::new(now),
            None => panic!("fixed clock epoch"),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0, "clock")
    }
}

/// Transport recording every request; fails for URLs starting with any of
/// the configured prefixes.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<CallbackRequest>>,
    failing_prefixes: Vec<String>,
}

impl RecordingTransport {
    /// Transport answering `503` for URLs starting with `prefix`.
    pub fn failing_for(prefix: impl Into<String>) -> Self {
        Self {
            failing_prefixes: vec![prefix.into()],
            ..Self::default()
        }
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<CallbackRequest> {
        lock(&self.requests, "transport").clone()
    }
}

#[async_trait]
impl CallbackTransport for RecordingTransport {
    async fn send(&self, request: CallbackRequest) -> Result<(), CallbackTransportError> {
        let fails = self
            .failing_prefixes
            .iter()
            .any(|prefix| request.url.starts_with(prefix.as_str()));
        lock(&self.requests, "transport").push(request);
        if fails {
            return Err(CallbackTransportError::status(503_u16));
        }
        Ok(())
    }
}

/// Publisher recording operator-error events.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<OperatorErrorEvent>>,
}

impl RecordingPublisher {
    /// Events published so far.
    pub fn events(&self) -> Vec<OperatorErrorEvent> {
        lock(&self.events, "publisher").clone()
    }
}

#[async_trait]
impl OperatorErrorPublisher for RecordingPublisher {
    async fn publish(&self, event: OperatorErrorEvent) -> Result<(), OperatorErrorPublishError> {
        lock(&self.events, "publisher").push(event);
        Ok(())
    }
}

/// Schema accepting every object payload and sending it unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSchema;

impl PayloadSchema for PassthroughSchema {
    fn validate(
        &self,
        _shape: WireShape,
        payload: &Value,
        _extras: &ProtocolExtras,
    ) -> Result<(), PayloadSchemaError> {
        if payload.is_object() {
            Ok(())
        } else {
            Err(PayloadSchemaError::invalid("payload must be an object"))
        }
    }

    fn transform(
        &self,
        _shape: WireShape,
        payload: &Value,
        _extras: &ProtocolExtras,
    ) -> Result<Value, PayloadSchemaError> {
        Ok(payload.clone())
    }
}

/// Shared handles to the recording doubles behind [`recording_ports`].
pub struct Recorders {
    /// Outbound callbacks.
    pub transport: Arc<RecordingTransport>,
    /// Escalations.
    pub publisher: Arc<RecordingPublisher>,
}

/// Ports over `directory` with recording transport and publisher, a
/// pass-through schema, no signer and a fixed clock.
pub fn recording_ports(directory: impl ParticipantDirectory + 'static) -> (TranslatorPorts, Recorders) {
    recording_ports_with(directory, RecordingTransport::default())
}

/// Like [`recording_ports`] with a caller-supplied transport.
pub fn recording_ports_with(
    directory: impl ParticipantDirectory + 'static,
    transport: RecordingTransport,
) -> (TranslatorPorts, Recorders) {
    let transport = Arc::new(transport);
    let publisher = Arc::new(RecordingPublisher::default());
    let ports = TranslatorPorts {
        directory: Arc::new(directory),
        schema: Arc::new(PassthroughSchema),
        signer: None,
        transport: transport.clone(),
        publisher: publisher.clone(),
        clock: Arc::new(FixedClock::default()),
    };
    (
        ports,
        Recorders {
            transport,
            publisher,
        },
    )
}

//! Reqwest-backed participant directory.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{Participant, ParticipantDirectory, ParticipantDirectoryError};
use crate::outbound::http::status_message;

/// Directory answering `GET {base}/participants/{fspId}`.
pub struct HttpParticipantDirectory {
    client: Client,
    base: Url,
}

impl HttpParticipantDirectory {
    /// Directory rooted at `base` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn participant_url(&self, fsp_id: &str) -> Result<Url, ParticipantDirectoryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ParticipantDirectoryError::unavailable(format!(
                    "directory base {} cannot carry a path",
                    self.base
                ))
            })?
            .pop_if_empty()
            .extend(["participants", fsp_id]);
        Ok(url)
    }
}

#[async_trait]
impl ParticipantDirectory for HttpParticipantDirectory {
    async fn participant(
        &self,
        fsp_id: &str,
    ) -> Result<Option<Participant>, ParticipantDirectoryError> {
        let url = self.participant_url(fsp_id)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| ParticipantDirectoryError::unavailable(error.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(fsp_id, "directory has no such participant");
            return Ok(None);
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| ParticipantDirectoryError::unavailable(error.to_string()))?;
        if !status.is_success() {
            return Err(ParticipantDirectoryError::unavailable(status_message(
                status,
                body.as_ref(),
            )));
        }
        decode_participant(body.as_ref()).map(Some)
    }
}

fn decode_participant(body: &[u8]) -> Result<Participant, ParticipantDirectoryError> {
    serde_json::from_slice(body).map_err(|error| {
        ParticipantDirectoryError::decode(format!("invalid participant JSON payload: {error}"))
    })
}

#[cfg(test)]
mod tests {
    //! URL construction and payload decoding; no network access.

    use rstest::rstest;

    use super::*;
    use crate::domain::ports::ParticipantEndpoint;

    fn directory(base: &str) -> HttpParticipantDirectory {
        HttpParticipantDirectory::new(Url::parse(base).expect("base"), Duration::from_secs(1))
            .expect("client builds")
    }

    #[rstest]
    #[case("http://registry.example", "http://registry.example/participants/bankA")]
    #[case("http://registry.example/", "http://registry.example/participants/bankA")]
    #[case("http://registry.example/api/", "http://registry.example/api/participants/bankA")]
    fn participant_url_appends_segments(#[case] base: &str, #[case] expected: &str) {
        let url = directory(base).participant_url("bankA").expect("url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn fsp_ids_are_percent_encoded() {
        let url = directory("http://registry.example")
            .participant_url("bank A/1")
            .expect("url");
        assert_eq!(url.as_str(), "http://registry.example/participants/bank%20A%2F1");
    }

    #[rstest]
    fn decodes_registry_payload() {
        let body = br#"{
            "id": "bankA",
            "participantEndpoints": [
                { "type": "FSPIOP", "value": "http://bankA.example" }
            ]
        }"#;
        let participant = decode_participant(body).expect("decodes");
        assert_eq!(participant.id, "bankA");
        assert_eq!(
            participant.endpoints,
            vec![ParticipantEndpoint::fspiop("http://bankA.example")]
        );
    }

    #[rstest]
    fn malformed_payloads_are_decode_errors() {
        let error = decode_participant(b"<html>").expect_err("must fail");
        assert!(matches!(error, ParticipantDirectoryError::Decode { .. }));
    }
}

//! HS256 detached-JWS signer for callback headers.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::Sha256;

use super::key::SigningKey;
use crate::domain::ProtocolHeaders;
use crate::domain::ports::{MessageSigner, MessageSignerError};

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize)]
struct ProtectedHeader<'a> {
    alg: &'static str,
    #[serde(rename = "FSPIOP-URI")]
    uri: &'a str,
    #[serde(rename = "FSPIOP-HTTP-Method")]
    http_method: &'a str,
    #[serde(rename = "FSPIOP-Source")]
    source: &'a str,
    #[serde(rename = "FSPIOP-Destination", skip_serializing_if = "Option::is_none")]
    destination: Option<&'a str>,
    #[serde(rename = "FSPIOP-Date", skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignatureHeader {
    signature: String,
    protected_header: String,
}

/// Signs callbacks with a shared HMAC-SHA256 secret.
#[derive(Debug, Clone)]
pub struct HmacJwsSigner {
    key: SigningKey,
}

impl HmacJwsSigner {
    /// Signer using `key`.
    pub const fn new(key: SigningKey) -> Self {
        Self { key }
    }

    fn mac(&self) -> Result<HmacSha256, MessageSignerError> {
        HmacSha256::new_from_slice(self.key.expose())
            .map_err(|error| MessageSignerError::failed(error.to_string()))
    }
}

impl MessageSigner for HmacJwsSigner {
    fn sign(
        &self,
        headers: &ProtocolHeaders,
        body: Option<&Value>,
    ) -> Result<String, MessageSignerError> {
        let protected = ProtectedHeader {
            alg: "HS256",
            uri: declared(headers.uri.as_deref(), "fspiop-uri")?,
            http_method: declared(headers.http_method.as_deref(), "fspiop-http-method")?,
            source: headers.source.as_str(),
            destination: headers.destination_id(),
            date: headers.date.as_deref(),
        };
        let protected = URL_SAFE_NO_PAD.encode(encode_json(&protected)?);
        let payload = match body {
            Some(body) => URL_SAFE_NO_PAD.encode(encode_json(body)?),
            None => String::new(),
        };

        let mut mac = self.mac()?;
        mac.update(protected.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let header = SignatureHeader {
            signature,
            protected_header: protected,
        };
        serde_json::to_string(&header).map_err(|error| MessageSignerError::failed(error.to_string()))
    }
}

fn declared<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, MessageSignerError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| MessageSignerError::failed(format!("{name} must be set before signing")))
}

fn encode_json(value: &impl Serialize) -> Result<Vec<u8>, MessageSignerError> {
    serde_json::to_vec(value).map_err(|error| MessageSignerError::failed(error.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn signer() -> HmacJwsSigner {
        HmacJwsSigner::new(SigningKey::from_bytes(b"s3cret"))
    }

    #[fixture]
    fn headers() -> ProtocolHeaders {
        let mut headers = ProtocolHeaders::from_source("bankA").with_destination("bankB");
        headers.uri = Some("/quotes/q-1".to_owned());
        headers.http_method = Some("PUT".to_owned());
        headers.date = Some("Mon, 06 May 2024 07:08:09 GMT".to_owned());
        headers
    }

    fn decode(segment: &str) -> Vec<u8> {
        URL_SAFE_NO_PAD.decode(segment).expect("base64url")
    }

    fn parts(value: &str) -> (String, String) {
        let header: Value = serde_json::from_str(value).expect("signature json");
        (
            header["signature"].as_str().expect("signature").to_owned(),
            header["protectedHeader"].as_str().expect("protected").to_owned(),
        )
    }

    #[rstest]
    fn protected_header_declares_the_request(signer: HmacJwsSigner, headers: ProtocolHeaders) {
        let value = signer
            .sign(&headers, Some(&json!({ "quoteId": "q-1" })))
            .expect("signed");
        let (_, protected) = parts(&value);

        let decoded: Value = serde_json::from_slice(&decode(&protected)).expect("header json");
        assert_eq!(
            decoded,
            json!({
                "alg": "HS256",
                "FSPIOP-URI": "/quotes/q-1",
                "FSPIOP-HTTP-Method": "PUT",
                "FSPIOP-Source": "bankA",
                "FSPIOP-Destination": "bankB",
                "FSPIOP-Date": "Mon, 06 May 2024 07:08:09 GMT"
            })
        );
    }

    #[rstest]
    fn signature_verifies_over_header_and_body(signer: HmacJwsSigner, headers: ProtocolHeaders) {
        let body = json!({ "quoteId": "q-1" });
        let value = signer.sign(&headers, Some(&body)).expect("signed");
        let (signature, protected) = parts(&value);

        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&body).expect("body"));
        let mut mac = HmacSha256::new_from_slice(b"s3cret").expect("key");
        mac.update(format!("{protected}.{payload}").as_bytes());
        mac.verify_slice(&decode(&signature)).expect("signature verifies");
    }

    #[rstest]
    fn body_changes_change_the_signature(signer: HmacJwsSigner, headers: ProtocolHeaders) {
        let first = signer.sign(&headers, Some(&json!({ "a": 1 }))).expect("signed");
        let second = signer.sign(&headers, Some(&json!({ "a": 2 }))).expect("signed");
        let bodiless = signer.sign(&headers, None).expect("signed");
        assert_ne!(parts(&first).0, parts(&second).0);
        assert_ne!(parts(&first).0, parts(&bodiless).0);
    }

    #[rstest]
    #[case::uri("fspiop-uri")]
    #[case::method("fspiop-http-method")]
    fn undeclared_request_cannot_be_signed(
        signer: HmacJwsSigner,
        mut headers: ProtocolHeaders,
        #[case] missing: &str,
    ) {
        if missing == "fspiop-uri" {
            headers.uri = None;
        } else {
            headers.http_method = None;
        }
        let error = signer.sign(&headers, None).expect_err("must fail");
        assert!(error.to_string().contains(missing));
    }
}

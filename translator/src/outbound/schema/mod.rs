//! Built-in JSON payload schema.
//!
//! Each [`WireShape`] has a fixed catalogue of wire fields. Validation checks
//! that required fields are present and identifiers are non-blank strings;
//! transformation builds the wire body from the catalogue alone, so routing
//! fields that only exist in the domain payload never reach participants.
//! Protocol extras (`condition`, `fulfilment`, `ilpPacket`, `extensionList`)
//! fill fields the payload leaves empty.

mod shapes;

use serde_json::{Map, Value};

use self::shapes::{Kind, Presence, WireField, fields};
use crate::domain::ports::{PayloadSchema, PayloadSchemaError};
use crate::domain::{ProtocolExtras, WireShape};

/// Catalogue-driven schema for every wire shape the translator emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadSchema;

impl JsonPayloadSchema {
    /// Schema instance.
    pub const fn new() -> Self {
        Self
    }
}

fn object<'a>(
    shape: WireShape,
    payload: &'a Value,
) -> Result<&'a Map<String, Value>, PayloadSchemaError> {
    payload
        .as_object()
        .ok_or_else(|| PayloadSchemaError::invalid(format!("{shape} payload must be a JSON object")))
}

fn extra(extras: &ProtocolExtras, name: &str) -> Option<Value> {
    match name {
        "condition" => extras.condition.clone().map(Value::String),
        "fulfilment" => extras.fulfilment.clone().map(Value::String),
        "ilpPacket" => extras.ilp_packet.clone().map(Value::String),
        "extensionList" => extras.extension_list.clone(),
        _ => None,
    }
}

fn resolve(field: &WireField, payload: &Map<String, Value>, extras: &ProtocolExtras) -> Option<Value> {
    payload
        .get(field.domain)
        .filter(|value| !value.is_null())
        .cloned()
        .or_else(|| extra(extras, field.domain))
}

fn check(shape: WireShape, field: &WireField, value: Option<&Value>) -> Result<(), PayloadSchemaError> {
    match (value, field.presence, field.kind) {
        (None, Presence::Required, _) => Err(PayloadSchemaError::invalid(format!(
            "{shape} requires '{}'",
            field.domain
        ))),
        (Some(Value::String(text)), _, Kind::Text) if text.trim().is_empty() => Err(
            PayloadSchemaError::invalid(format!("{shape} field '{}' must not be blank", field.domain)),
        ),
        (Some(value), _, Kind::Text) if !value.is_string() => Err(PayloadSchemaError::invalid(
            format!("{shape} field '{}' must be a string", field.domain),
        )),
        _ => Ok(()),
    }
}

impl PayloadSchema for JsonPayloadSchema {
    fn validate(
        &self,
        shape: WireShape,
        payload: &Value,
        extras: &ProtocolExtras,
    ) -> Result<(), PayloadSchemaError> {
        let payload = object(shape, payload)?;
        fields(shape)
            .iter()
            .try_for_each(|field| check(shape, field, resolve(field, payload, extras).as_ref()))
    }

    fn transform(
        &self,
        shape: WireShape,
        payload: &Value,
        extras: &ProtocolExtras,
    ) -> Result<Value, PayloadSchemaError> {
        let payload = object(shape, payload)
            .map_err(|error| PayloadSchemaError::transform(error.to_string()))?;
        let body: Map<String, Value> = fields(shape)
            .iter()
            .filter_map(|field| {
                resolve(field, payload, extras).map(|value| (field.wire.to_owned(), value))
            })
            .collect();
        Ok(Value::Object(body))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn schema() -> JsonPayloadSchema {
        JsonPayloadSchema::new()
    }

    fn transfer_prepare() -> Value {
        json!({
            "transferId": "t-1",
            "payerFspId": "bankA",
            "payeeFspId": "bankB",
            "amount": { "currency": "USD", "amount": "10" },
            "expiration": "2024-05-06T07:08:09.000Z",
            "settlementModel": "DEFERRED"
        })
    }

    fn ilp_extras() -> ProtocolExtras {
        ProtocolExtras {
            condition: Some("cond".to_owned()),
            ilp_packet: Some("packet".to_owned()),
            ..ProtocolExtras::default()
        }
    }

    #[rstest]
    fn transfer_prepare_is_renamed_and_completed_from_extras(schema: JsonPayloadSchema) {
        let extras = ilp_extras();
        let payload = transfer_prepare();

        schema
            .validate(WireShape::TransfersPost, &payload, &extras)
            .expect("valid");
        let body = schema
            .transform(WireShape::TransfersPost, &payload, &extras)
            .expect("transformed");

        assert_eq!(
            body,
            json!({
                "transferId": "t-1",
                "payeeFsp": "bankB",
                "payerFsp": "bankA",
                "amount": { "currency": "USD", "amount": "10" },
                "ilpPacket": "packet",
                "condition": "cond",
                "expiration": "2024-05-06T07:08:09.000Z"
            })
        );
    }

    #[rstest]
    fn missing_required_extras_fail_validation(schema: JsonPayloadSchema) {
        let error = schema
            .validate(WireShape::TransfersPost, &transfer_prepare(), &ProtocolExtras::default())
            .expect_err("must fail");
        assert_eq!(
            error,
            PayloadSchemaError::invalid("TransfersPost requires 'ilpPacket'")
        );
    }

    #[rstest]
    fn payload_values_win_over_extras(schema: JsonPayloadSchema) {
        let mut payload = transfer_prepare();
        payload["condition"] = json!("from-payload");
        let body = schema
            .transform(WireShape::TransfersPost, &payload, &ilp_extras())
            .expect("transformed");
        assert_eq!(body["condition"], json!("from-payload"));
    }

    #[rstest]
    #[case(json!(""), "must not be blank")]
    #[case(json!("   "), "must not be blank")]
    #[case(json!(42), "must be a string")]
    fn identifiers_must_be_non_blank_strings(
        schema: JsonPayloadSchema,
        #[case] transfer_id: Value,
        #[case] message: &str,
    ) {
        let mut payload = transfer_prepare();
        payload["transferId"] = transfer_id;
        let error = schema
            .validate(WireShape::TransfersPost, &payload, &ilp_extras())
            .expect_err("must fail");
        assert!(error.to_string().contains(message), "{error}");
    }

    #[rstest]
    #[case(WireShape::QuotesPost)]
    #[case(WireShape::ErrorInformation)]
    fn non_objects_are_invalid(schema: JsonPayloadSchema, #[case] shape: WireShape) {
        let error = schema
            .validate(shape, &json!(["not", "an", "object"]), &ProtocolExtras::default())
            .expect_err("must fail");
        assert!(matches!(error, PayloadSchemaError::Invalid { .. }));
    }

    #[rstest]
    fn routing_fields_are_not_forwarded(schema: JsonPayloadSchema) {
        let payload = json!({
            "quoteId": "q-1",
            "payerFspId": "bankA",
            "payeeFspId": "bankB",
            "transferAmount": { "currency": "USD", "amount": "10" },
            "expiration": "2024-05-06T07:08:09.000Z",
            "ilpPacket": "packet",
            "condition": "cond"
        });
        let body = schema
            .transform(WireShape::QuotesPut, &payload, &ProtocolExtras::default())
            .expect("transformed");
        assert_eq!(
            body,
            json!({
                "transferAmount": { "currency": "USD", "amount": "10" },
                "expiration": "2024-05-06T07:08:09.000Z",
                "ilpPacket": "packet",
                "condition": "cond"
            })
        );
    }

    #[rstest]
    fn participant_owner_becomes_fsp_id(schema: JsonPayloadSchema) {
        let payload = json!({ "partyType": "MSISDN", "partyId": "123", "ownerFspId": "bankB" });
        schema
            .validate(WireShape::ParticipantsPut, &payload, &ProtocolExtras::default())
            .expect("valid");
        let body = schema
            .transform(WireShape::ParticipantsPut, &payload, &ProtocolExtras::default())
            .expect("transformed");
        assert_eq!(body, json!({ "fspId": "bankB" }));
    }

    #[rstest]
    fn extension_list_comes_from_extras(schema: JsonPayloadSchema) {
        let extras = ProtocolExtras {
            extension_list: Some(json!({ "extension": [{ "key": "k", "value": "v" }] })),
            ..ProtocolExtras::default()
        };
        let payload = json!({ "transferState": "COMMITTED", "completedTimestamp": "2024-05-06T07:08:09.000Z" });
        let body = schema
            .transform(WireShape::TransfersPatch, &payload, &extras)
            .expect("transformed");
        assert_eq!(
            body["extensionList"],
            json!({ "extension": [{ "key": "k", "value": "v" }] })
        );
    }
}

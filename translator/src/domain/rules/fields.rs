//! Addressing fields read from domain payloads.

use fspiop::EntityCategory;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::TranslationError;

/// Identifiers a rule may need to address a callback. Every field is
/// optional here; rules decide which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayloadFields {
    pub party_type: Option<String>,
    pub party_id: Option<String>,
    pub party_sub_type: Option<String>,
    pub requester_fsp_id: Option<String>,
    pub destination_fsp_id: Option<String>,
    pub owner_fsp_id: Option<String>,
    pub quote_id: Option<String>,
    pub bulk_quote_id: Option<String>,
    pub payer_fsp_id: Option<String>,
    pub payee_fsp_id: Option<String>,
    pub transfer_id: Option<String>,
    pub bulk_transfer_id: Option<String>,
    pub notify_payee: Option<bool>,
}

impl PayloadFields {
    /// Read the addressing fields of `payload`.
    ///
    /// Non-object payloads and mistyped fields are validation failures.
    pub fn read(payload: &Value) -> Result<Self, TranslationError> {
        if payload.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(payload).map_err(|error| TranslationError::validation(error.to_string()))
    }

    /// Path segments identifying the resource of `entity` in this payload.
    pub fn segments(&self, entity: EntityCategory) -> Vec<Option<String>> {
        match entity {
            EntityCategory::Parties | EntityCategory::Participants => vec![
                self.party_type.clone(),
                self.party_id.clone(),
                self.party_sub_type.clone(),
            ],
            EntityCategory::Quotes => vec![self.quote_id.clone()],
            EntityCategory::BulkQuotes => vec![self.bulk_quote_id.clone()],
            EntityCategory::Transfers => vec![self.transfer_id.clone()],
            EntityCategory::BulkTransfers => vec![self.bulk_transfer_id.clone()],
        }
    }
}

/// Return `value` when it is present and non-blank.
pub fn required(value: Option<&String>, field: &str) -> Result<String, TranslationError> {
    value
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| TranslationError::missing(field))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn unknown_fields_are_ignored() {
        let fields = PayloadFields::read(&json!({
            "quoteId": "q-1",
            "amount": { "currency": "USD", "amount": "10" }
        }))
        .expect("fields read");
        assert_eq!(fields.quote_id.as_deref(), Some("q-1"));
    }

    #[rstest]
    #[case(json!("not an object"))]
    #[case(json!({ "quoteId": 7 }))]
    fn malformed_payloads_are_validation_errors(#[case] payload: Value) {
        assert!(matches!(
            PayloadFields::read(&payload),
            Err(TranslationError::Validation { .. })
        ));
    }

    #[rstest]
    fn party_segments_keep_order() {
        let fields = PayloadFields {
            party_type: Some("MSISDN".to_owned()),
            party_id: Some("123".to_owned()),
            ..PayloadFields::default()
        };
        assert_eq!(
            fields.segments(EntityCategory::Parties),
            vec![Some("MSISDN".to_owned()), Some("123".to_owned()), None]
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some(" "))]
    fn blank_required_values_are_missing(#[case] value: Option<&str>) {
        let value = value.map(str::to_owned);
        assert_eq!(
            required(value.as_ref(), "quoteId"),
            Err(TranslationError::missing("quoteId"))
        );
    }
}

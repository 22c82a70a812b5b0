//! Quoting rules: `/quotes` and `/bulkQuotes` callbacks.

use fspiop::{EntityCategory, HttpMethod};

use super::{CallbackPlan, PayloadFields, RuleRow, required};
use crate::domain::direction::Direction;
use crate::domain::error::TranslationError;
use crate::domain::payload_gate::WireShape;

pub(super) const RULES: &[RuleRow] = &[
    ("QuoteRequestAccepted", EntityCategory::Quotes, quote_request_accepted),
    ("QuoteResponseAccepted", EntityCategory::Quotes, quote_response_accepted),
    ("QuoteQueryResponse", EntityCategory::Quotes, quote_query_response),
    ("QuoteRejected", EntityCategory::Quotes, quote_rejected),
    ("BulkQuoteReceived", EntityCategory::BulkQuotes, bulk_quote_received),
    ("BulkQuoteAccepted", EntityCategory::BulkQuotes, bulk_quote_accepted),
    (
        "BulkQuoteQueryResponse",
        EntityCategory::BulkQuotes,
        bulk_quote_query_response,
    ),
    ("BulkQuoteRejected", EntityCategory::BulkQuotes, bulk_quote_rejected),
];

fn payer_to_payee(fields: &PayloadFields) -> Direction {
    Direction::forward(fields.payer_fsp_id.clone(), fields.payee_fsp_id.clone())
}

fn payee_to_payer(fields: &PayloadFields) -> Direction {
    Direction::forward(fields.payee_fsp_id.clone(), fields.payer_fsp_id.clone())
}

fn quote_segment(fields: &PayloadFields) -> Result<[Option<String>; 1], TranslationError> {
    Ok([Some(required(fields.quote_id.as_ref(), "quoteId")?)])
}

fn bulk_quote_segment(fields: &PayloadFields) -> Result<[Option<String>; 1], TranslationError> {
    Ok([Some(required(fields.bulk_quote_id.as_ref(), "bulkQuoteId")?)])
}

fn quote_request_accepted(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(payer_to_payee(fields), EntityCategory::Quotes, HttpMethod::Post)
            .with_body(WireShape::QuotesPost),
    )
}

fn quote_response_accepted(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(payee_to_payer(fields), EntityCategory::Quotes, HttpMethod::Put)
            .with_segments(quote_segment(fields)?)
            .with_body(WireShape::QuotesPut),
    )
}

fn quote_query_response(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(Direction::QueryResponse, EntityCategory::Quotes, HttpMethod::Put)
            .with_segments(quote_segment(fields)?)
            .with_body(WireShape::QuotesPut),
    )
}

fn quote_rejected(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(Direction::Reject, EntityCategory::Quotes, HttpMethod::Put)
            .with_segments(quote_segment(fields)?)
            .with_body(WireShape::ErrorInformation),
    )
}

fn bulk_quote_received(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        payer_to_payee(fields),
        EntityCategory::BulkQuotes,
        HttpMethod::Post,
    )
    .with_body(WireShape::BulkQuotesPost))
}

fn bulk_quote_accepted(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        payee_to_payer(fields),
        EntityCategory::BulkQuotes,
        HttpMethod::Put,
    )
    .with_segments(bulk_quote_segment(fields)?)
    .with_body(WireShape::BulkQuotesPut))
}

fn bulk_quote_query_response(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        Direction::QueryResponse,
        EntityCategory::BulkQuotes,
        HttpMethod::Put,
    )
    .with_segments(bulk_quote_segment(fields)?)
    .with_body(WireShape::BulkQuotesPut))
}

fn bulk_quote_rejected(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(Direction::Reject, EntityCategory::BulkQuotes, HttpMethod::Put)
            .with_segments(bulk_quote_segment(fields)?)
            .with_body(WireShape::ErrorInformation),
    )
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::rules::PlannedBody;

    #[fixture]
    fn fields() -> PayloadFields {
        PayloadFields {
            quote_id: Some("q-1".to_owned()),
            bulk_quote_id: Some("bq-1".to_owned()),
            payer_fsp_id: Some("bankA".to_owned()),
            payee_fsp_id: Some("bankB".to_owned()),
            ..PayloadFields::default()
        }
    }

    #[rstest]
    fn quote_request_is_posted_to_the_payee(fields: PayloadFields) {
        let plan = quote_request_accepted(&fields).expect("plan");
        assert_eq!(plan.method, HttpMethod::Post);
        assert_eq!(plan.signing_method, HttpMethod::Post);
        assert!(plan.segments.is_empty());
        assert_eq!(
            plan.direction,
            Direction::forward(Some("bankA".to_owned()), Some("bankB".to_owned()))
        );
        assert_eq!(plan.body, PlannedBody::Wire(WireShape::QuotesPost));
    }

    #[rstest]
    fn quote_response_is_put_to_the_payer(fields: PayloadFields) {
        let plan = quote_response_accepted(&fields).expect("plan");
        assert_eq!(plan.method, HttpMethod::Put);
        assert_eq!(plan.segments, vec![Some("q-1".to_owned())]);
        assert_eq!(
            plan.direction,
            Direction::forward(Some("bankB".to_owned()), Some("bankA".to_owned()))
        );
    }

    #[rstest]
    #[case(quote_response_accepted, "quoteId")]
    #[case(quote_query_response, "quoteId")]
    #[case(quote_rejected, "quoteId")]
    #[case(bulk_quote_accepted, "bulkQuoteId")]
    #[case(bulk_quote_query_response, "bulkQuoteId")]
    #[case(bulk_quote_rejected, "bulkQuoteId")]
    fn identified_resources_need_their_id(
        #[case] rule: fn(&PayloadFields) -> Result<CallbackPlan, TranslationError>,
        #[case] field: &str,
    ) {
        let fields = PayloadFields {
            payer_fsp_id: Some("bankA".to_owned()),
            payee_fsp_id: Some("bankB".to_owned()),
            ..PayloadFields::default()
        };
        assert_eq!(rule(&fields), Err(TranslationError::missing(field)));
    }

    #[rstest]
    fn bulk_quote_rejection_uses_the_error_path(fields: PayloadFields) {
        let plan = bulk_quote_rejected(&fields).expect("plan");
        assert_eq!(plan.entity, EntityCategory::BulkQuotes);
        assert!(plan.direction.is_error_path());
    }
}

//! Account-lookup rules: `/parties` and `/participants` callbacks.

use fspiop::{EntityCategory, HttpMethod};

use super::{CallbackPlan, PayloadFields, RuleRow, required};
use crate::domain::direction::Direction;
use crate::domain::error::TranslationError;
use crate::domain::payload_gate::WireShape;

pub(super) const RULES: &[RuleRow] = &[
    ("PartyInfoRequested", EntityCategory::Parties, party_info_requested),
    ("PartyQueryResponse", EntityCategory::Parties, party_query_response),
    ("PartyRejected", EntityCategory::Parties, party_rejected),
    (
        "ParticipantQueryResponse",
        EntityCategory::Participants,
        participant_response,
    ),
    (
        "ParticipantAssociationCreated",
        EntityCategory::Participants,
        participant_response,
    ),
    (
        "ParticipantAssociationRemoved",
        EntityCategory::Participants,
        participant_response,
    ),
];

fn party_segments(fields: &PayloadFields) -> Result<Vec<Option<String>>, TranslationError> {
    Ok(vec![
        Some(required(fields.party_type.as_ref(), "partyType")?),
        Some(required(fields.party_id.as_ref(), "partyId")?),
        fields.party_sub_type.clone(),
    ])
}

fn party_info_requested(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    let direction = Direction::forward(
        fields.requester_fsp_id.clone(),
        fields.destination_fsp_id.clone(),
    );
    Ok(
        CallbackPlan::new(direction, EntityCategory::Parties, HttpMethod::Get)
            .with_segments(party_segments(fields)?),
    )
}

fn party_query_response(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    let direction = Direction::forward(
        fields.owner_fsp_id.clone(),
        fields.requester_fsp_id.clone(),
    );
    Ok(
        CallbackPlan::new(direction, EntityCategory::Parties, HttpMethod::Put)
            .with_segments(party_segments(fields)?)
            .with_body(WireShape::PartiesPut),
    )
}

fn party_rejected(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(Direction::Reject, EntityCategory::Parties, HttpMethod::Put)
            .with_segments(party_segments(fields)?)
            .with_body(WireShape::ErrorInformation),
    )
}

fn participant_response(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        Direction::QueryResponse,
        EntityCategory::Participants,
        HttpMethod::Put,
    )
    .with_segments(party_segments(fields)?)
    .with_body(WireShape::ParticipantsPut))
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::rules::PlannedBody;

    #[fixture]
    fn fields() -> PayloadFields {
        PayloadFields {
            party_type: Some("MSISDN".to_owned()),
            party_id: Some("256700000001".to_owned()),
            requester_fsp_id: Some("bankA".to_owned()),
            destination_fsp_id: Some("bankB".to_owned()),
            owner_fsp_id: Some("bankB".to_owned()),
            ..PayloadFields::default()
        }
    }

    #[rstest]
    fn lookup_is_forwarded_to_the_owner_as_get(fields: PayloadFields) {
        let plan = party_info_requested(&fields).expect("plan");
        assert_eq!(plan.method, HttpMethod::Get);
        assert_eq!(plan.body, PlannedBody::Empty);
        assert_eq!(
            plan.direction,
            Direction::forward(Some("bankA".to_owned()), Some("bankB".to_owned()))
        );
        assert_eq!(
            plan.segments,
            vec![
                Some("MSISDN".to_owned()),
                Some("256700000001".to_owned()),
                None
            ]
        );
    }

    #[rstest]
    fn lookup_response_returns_to_the_requester(fields: PayloadFields) {
        let plan = party_query_response(&fields).expect("plan");
        assert_eq!(
            plan.direction,
            Direction::forward(Some("bankB".to_owned()), Some("bankA".to_owned()))
        );
        assert_eq!(plan.body, PlannedBody::Wire(WireShape::PartiesPut));
    }

    #[rstest]
    fn rejection_goes_to_the_error_path(fields: PayloadFields) {
        let plan = party_rejected(&fields).expect("plan");
        assert!(plan.direction.is_error_path());
        assert_eq!(plan.body, PlannedBody::Wire(WireShape::ErrorInformation));
    }

    #[rstest]
    fn participant_responses_are_query_responses(fields: PayloadFields) {
        let plan = participant_response(&fields).expect("plan");
        assert_eq!(plan.direction, Direction::QueryResponse);
        assert_eq!(plan.entity, EntityCategory::Participants);
    }

    #[rstest]
    fn missing_party_id_fails_fast(mut fields: PayloadFields) {
        fields.party_id = None;
        assert_eq!(
            party_info_requested(&fields),
            Err(TranslationError::missing("partyId"))
        );
    }
}

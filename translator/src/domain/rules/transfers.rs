//! Transfers rules: `/transfers` and `/bulkTransfers` callbacks.

use fspiop::{EntityCategory, HttpMethod};

use super::{CallbackPlan, PayloadFields, RuleRow, required};
use crate::domain::direction::Direction;
use crate::domain::error::TranslationError;
use crate::domain::payload_gate::WireShape;

pub(super) const RULES: &[RuleRow] = &[
    ("TransferPrepared", EntityCategory::Transfers, transfer_prepared),
    ("TransferFulfiled", EntityCategory::Transfers, transfer_fulfiled),
    ("TransferQueryResponse", EntityCategory::Transfers, transfer_query_response),
    (
        "TransferRejectRequestProcessed",
        EntityCategory::Transfers,
        transfer_rejected,
    ),
    (
        "BulkTransferPrepared",
        EntityCategory::BulkTransfers,
        bulk_transfer_prepared,
    ),
    (
        "BulkTransferFulfiled",
        EntityCategory::BulkTransfers,
        bulk_transfer_fulfiled,
    ),
    (
        "BulkTransferQueryResponse",
        EntityCategory::BulkTransfers,
        bulk_transfer_query_response,
    ),
    (
        "BulkTransferRejectRequestProcessed",
        EntityCategory::BulkTransfers,
        bulk_transfer_rejected,
    ),
];

fn transfer_segment(fields: &PayloadFields) -> Result<[Option<String>; 1], TranslationError> {
    Ok([Some(required(fields.transfer_id.as_ref(), "transferId")?)])
}

fn bulk_transfer_segment(
    fields: &PayloadFields,
) -> Result<[Option<String>; 1], TranslationError> {
    Ok([Some(required(
        fields.bulk_transfer_id.as_ref(),
        "bulkTransferId",
    )?)])
}

fn transfer_prepared(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    let direction = Direction::forward(fields.payer_fsp_id.clone(), fields.payee_fsp_id.clone());
    Ok(
        CallbackPlan::new(direction, EntityCategory::Transfers, HttpMethod::Post)
            .with_body(WireShape::TransfersPost),
    )
}

/// The payer receives the fulfilment; when the payee asked to be notified
/// the switch follows up with a `PATCH` that is signed as `PUT`.
fn transfer_fulfiled(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    let segment = transfer_segment(fields)?;
    let direction = Direction::forward(fields.payee_fsp_id.clone(), fields.payer_fsp_id.clone());
    let plan = CallbackPlan::new(direction, EntityCategory::Transfers, HttpMethod::Put)
        .with_segments(segment.clone())
        .with_body(WireShape::TransfersPut);
    if !fields.notify_payee.unwrap_or(false) {
        return Ok(plan);
    }
    let notification = CallbackPlan::new(
        Direction::HubNotification {
            destination: fields.payee_fsp_id.clone(),
        },
        EntityCategory::Transfers,
        HttpMethod::Patch,
    )
    .signed_as(HttpMethod::Put)
    .with_segments(segment)
    .with_body(WireShape::TransfersPatch);
    Ok(plan.then(notification))
}

fn transfer_query_response(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        Direction::QueryResponse,
        EntityCategory::Transfers,
        HttpMethod::Put,
    )
    .with_segments(transfer_segment(fields)?)
    .with_body(WireShape::TransfersPut))
}

fn transfer_rejected(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(
        CallbackPlan::new(Direction::Reject, EntityCategory::Transfers, HttpMethod::Put)
            .with_segments(transfer_segment(fields)?)
            .with_body(WireShape::ErrorInformation),
    )
}

fn bulk_transfer_prepared(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    let direction = Direction::forward(fields.payer_fsp_id.clone(), fields.payee_fsp_id.clone());
    Ok(
        CallbackPlan::new(direction, EntityCategory::BulkTransfers, HttpMethod::Post)
            .with_body(WireShape::BulkTransfersPost),
    )
}

fn bulk_transfer_fulfiled(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    let direction = Direction::forward(fields.payee_fsp_id.clone(), fields.payer_fsp_id.clone());
    Ok(
        CallbackPlan::new(direction, EntityCategory::BulkTransfers, HttpMethod::Put)
            .with_segments(bulk_transfer_segment(fields)?)
            .with_body(WireShape::BulkTransfersPut),
    )
}

fn bulk_transfer_query_response(
    fields: &PayloadFields,
) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        Direction::QueryResponse,
        EntityCategory::BulkTransfers,
        HttpMethod::Put,
    )
    .with_segments(bulk_transfer_segment(fields)?)
    .with_body(WireShape::BulkTransfersPut))
}

fn bulk_transfer_rejected(fields: &PayloadFields) -> Result<CallbackPlan, TranslationError> {
    Ok(CallbackPlan::new(
        Direction::Reject,
        EntityCategory::BulkTransfers,
        HttpMethod::Put,
    )
    .with_segments(bulk_transfer_segment(fields)?)
    .with_body(WireShape::ErrorInformation))
}

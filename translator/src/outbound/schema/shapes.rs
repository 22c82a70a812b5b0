//! Field catalogue for each wire shape.

use crate::domain::WireShape;

/// Whether a wire field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Presence {
    Required,
    Optional,
}

/// What a present value must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Kind {
    /// A non-blank string.
    Text,
    /// Any JSON value except `null`.
    Any,
}

/// One field of a wire body and where its value comes from.
#[derive(Debug, Clone, Copy)]
pub(super) struct WireField {
    /// Name on the wire.
    pub wire: &'static str,
    /// Name in the domain payload or protocol extras.
    pub domain: &'static str,
    pub presence: Presence,
    pub kind: Kind,
}

const fn text(name: &'static str) -> WireField {
    WireField {
        wire: name,
        domain: name,
        presence: Presence::Required,
        kind: Kind::Text,
    }
}

const fn required(name: &'static str) -> WireField {
    WireField {
        wire: name,
        domain: name,
        presence: Presence::Required,
        kind: Kind::Any,
    }
}

const fn optional(name: &'static str) -> WireField {
    WireField {
        wire: name,
        domain: name,
        presence: Presence::Optional,
        kind: Kind::Any,
    }
}

const fn renamed(wire: &'static str, domain: &'static str) -> WireField {
    WireField {
        wire,
        domain,
        presence: Presence::Required,
        kind: Kind::Text,
    }
}

const EXTENSIONS: WireField = optional("extensionList");

const PARTIES_PUT: &[WireField] = &[required("party")];

const PARTICIPANTS_PUT: &[WireField] = &[renamed("fspId", "ownerFspId")];

const QUOTES_POST: &[WireField] = &[
    text("quoteId"),
    text("transactionId"),
    optional("transactionRequestId"),
    required("payee"),
    required("payer"),
    text("amountType"),
    required("amount"),
    optional("fees"),
    required("transactionType"),
    optional("geoCode"),
    optional("note"),
    optional("expiration"),
    EXTENSIONS,
];

const QUOTES_PUT: &[WireField] = &[
    required("transferAmount"),
    optional("payeeReceiveAmount"),
    optional("payeeFspFee"),
    optional("payeeFspCommission"),
    text("expiration"),
    optional("geoCode"),
    text("ilpPacket"),
    text("condition"),
    EXTENSIONS,
];

const BULK_QUOTES_POST: &[WireField] = &[
    text("bulkQuoteId"),
    required("payer"),
    optional("geoCode"),
    optional("expiration"),
    required("individualQuotes"),
    EXTENSIONS,
];

const BULK_QUOTES_PUT: &[WireField] = &[
    optional("individualQuoteResults"),
    text("expiration"),
    EXTENSIONS,
];

const TRANSFERS_POST: &[WireField] = &[
    text("transferId"),
    renamed("payeeFsp", "payeeFspId"),
    renamed("payerFsp", "payerFspId"),
    required("amount"),
    text("ilpPacket"),
    text("condition"),
    text("expiration"),
    EXTENSIONS,
];

const TRANSFERS_PUT: &[WireField] = &[
    optional("fulfilment"),
    optional("completedTimestamp"),
    text("transferState"),
    EXTENSIONS,
];

const TRANSFERS_PATCH: &[WireField] = &[
    text("completedTimestamp"),
    text("transferState"),
    EXTENSIONS,
];

const BULK_TRANSFERS_POST: &[WireField] = &[
    text("bulkTransferId"),
    text("bulkQuoteId"),
    renamed("payerFsp", "payerFspId"),
    renamed("payeeFsp", "payeeFspId"),
    required("individualTransfers"),
    text("expiration"),
    EXTENSIONS,
];

const BULK_TRANSFERS_PUT: &[WireField] = &[
    optional("completedTimestamp"),
    optional("individualTransferResults"),
    text("bulkTransferState"),
    EXTENSIONS,
];

const ERROR_INFORMATION: &[WireField] = &[required("errorInformation")];

/// Fields of `shape`, in wire order.
pub(super) const fn fields(shape: WireShape) -> &'static [WireField] {
    match shape {
        WireShape::PartiesPut => PARTIES_PUT,
        WireShape::ParticipantsPut => PARTICIPANTS_PUT,
        WireShape::QuotesPost => QUOTES_POST,
        WireShape::QuotesPut => QUOTES_PUT,
        WireShape::BulkQuotesPost => BULK_QUOTES_POST,
        WireShape::BulkQuotesPut => BULK_QUOTES_PUT,
        WireShape::TransfersPost => TRANSFERS_POST,
        WireShape::TransfersPut => TRANSFERS_PUT,
        WireShape::TransfersPatch => TRANSFERS_PATCH,
        WireShape::BulkTransfersPost => BULK_TRANSFERS_POST,
        WireShape::BulkTransfersPut => BULK_TRANSFERS_PUT,
        WireShape::ErrorInformation => ERROR_INFORMATION,
    }
}

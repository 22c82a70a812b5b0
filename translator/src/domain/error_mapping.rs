//! Static error-mapping tables, one per bounded context.
//!
//! Each table maps an internal error code (a translation-failure code or a
//! bounded-context error-event kind) to a standard FSPIOP error. Lookups
//! that miss fall back to `1000 Communication error` so an internal code
//! never reaches the wire.

use fspiop::ApiErrorCode;
use fspiop::codes;

use crate::domain::context::BoundedContext;

/// One curated mapping entry.
pub type ErrorMappingEntry = (&'static str, ApiErrorCode);

/// A read-only internal-code to standard-error table.
#[derive(Debug)]
pub struct ErrorTable {
    context: BoundedContext,
    entries: &'static [ErrorMappingEntry],
}

/// Codes every context maps for failures raised by the translation engine.
const SHARED: [ErrorMappingEntry; 7] = [
    ("ParticipantNotFound", codes::DESTINATION_FSP_ERROR),
    ("EndpointNotFound", codes::DESTINATION_FSP_ERROR),
    ("ValidationError", codes::GENERIC_VALIDATION_ERROR),
    ("MissingRequiredField", codes::MISSING_ELEMENT),
    ("NetworkError", codes::DESTINATION_COMMUNICATION_ERROR),
    ("SigningError", codes::INTERNAL_SERVER_ERROR),
    ("InternalError", codes::GENERIC_SERVER_ERROR),
];

const fn with_shared<const N: usize, const M: usize>(
    own: [ErrorMappingEntry; N],
) -> [ErrorMappingEntry; M] {
    assert!(M == N + SHARED.len(), "table length mismatch");
    let mut out = [SHARED[0]; M];
    let mut index = 0;
    while index < SHARED.len() {
        out[index] = SHARED[index];
        index += 1;
    }
    while index < M {
        out[index] = own[index - SHARED.len()];
        index += 1;
    }
    out
}

const ACCOUNT_LOOKUP_ENTRIES: [ErrorMappingEntry; 14] = with_shared([
    ("AccountLookupBCInvalidMessagePayloadErrorEvent", codes::MALFORMED_SYNTAX),
    ("AccountLookupBCInvalidMessageTypeErrorEvent", codes::GENERIC_VALIDATION_ERROR),
    ("AccountLookupBCPartyNotFoundErrorEvent", codes::PARTY_NOT_FOUND),
    ("AccountLookupBCParticipantNotFoundErrorEvent", codes::GENERIC_ID_NOT_FOUND),
    ("AccountLookupBCRequiredParticipantIsNotActiveErrorEvent", codes::DESTINATION_FSP_ERROR),
    ("AccountLookupBCUnableToAssociateParticipantErrorEvent", codes::INTERNAL_SERVER_ERROR),
    ("AccountLookupBCUnableToDisassociateParticipantErrorEvent", codes::INTERNAL_SERVER_ERROR),
]);

const QUOTING_ENTRIES: [ErrorMappingEntry; 16] = with_shared([
    ("QuotingBCInvalidMessagePayloadErrorEvent", codes::MALFORMED_SYNTAX),
    ("QuotingBCInvalidMessageTypeErrorEvent", codes::GENERIC_VALIDATION_ERROR),
    ("QuotingBCQuoteNotFoundErrorEvent", codes::QUOTE_ID_NOT_FOUND),
    ("QuotingBCBulkQuoteNotFoundErrorEvent", codes::BULK_QUOTE_ID_NOT_FOUND),
    ("QuotingBCQuoteExpiredErrorEvent", codes::QUOTE_EXPIRED),
    ("QuotingBCPayerParticipantNotFoundErrorEvent", codes::PAYER_FSP_ID_NOT_FOUND),
    ("QuotingBCPayeeParticipantNotFoundErrorEvent", codes::PAYEE_FSP_ID_NOT_FOUND),
    ("QuotingBCQuoteRuleSchemeViolatedErrorEvent", codes::GENERIC_VALIDATION_ERROR),
    ("QuotingBCUnableToAddQuoteToDatabaseErrorEvent", codes::INTERNAL_SERVER_ERROR),
]);

const TRANSFERS_ENTRIES: [ErrorMappingEntry; 18] = with_shared([
    ("TransfersBCInvalidMessagePayloadErrorEvent", codes::MALFORMED_SYNTAX),
    ("TransfersBCInvalidMessageTypeErrorEvent", codes::GENERIC_VALIDATION_ERROR),
    ("TransfersBCTransferNotFoundErrorEvent", codes::TRANSFER_ID_NOT_FOUND),
    ("TransfersBCBulkTransferNotFoundErrorEvent", codes::BULK_TRANSFER_ID_NOT_FOUND),
    ("TransfersBCTransferExpiredErrorEvent", codes::TRANSFER_EXPIRED),
    ("TransfersBCPayerParticipantNotFoundErrorEvent", codes::PAYER_FSP_ID_NOT_FOUND),
    ("TransfersBCPayeeParticipantNotFoundErrorEvent", codes::PAYEE_FSP_ID_NOT_FOUND),
    ("TransfersBCPayerLiquidityCheckFailedErrorEvent", codes::PAYER_FSP_INSUFFICIENT_LIQUIDITY),
    ("TransfersBCPayerNetDebitCapExceededErrorEvent", codes::PAYER_LIMIT_ERROR),
    ("TransfersBCPayeeRejectedTransferErrorEvent", codes::GENERIC_PAYEE_REJECTION),
    ("TransfersBCUnableToAddTransferToDatabaseErrorEvent", codes::INTERNAL_SERVER_ERROR),
]);

/// Account-lookup error table.
pub static ACCOUNT_LOOKUP_ERRORS: ErrorTable = ErrorTable {
    context: BoundedContext::AccountLookup,
    entries: &ACCOUNT_LOOKUP_ENTRIES,
};

/// Quoting error table.
pub static QUOTING_ERRORS: ErrorTable = ErrorTable {
    context: BoundedContext::Quoting,
    entries: &QUOTING_ENTRIES,
};

/// Transfers error table.
pub static TRANSFERS_ERRORS: ErrorTable = ErrorTable {
    context: BoundedContext::Transfers,
    entries: &TRANSFERS_ENTRIES,
};

/// Code returned when a lookup misses.
pub const FALLBACK: ApiErrorCode = codes::COMMUNICATION_ERROR;

impl ErrorTable {
    /// Table for `context`.
    pub fn for_context(context: BoundedContext) -> &'static Self {
        match context {
            BoundedContext::AccountLookup => &ACCOUNT_LOOKUP_ERRORS,
            BoundedContext::Quoting => &QUOTING_ERRORS,
            BoundedContext::Transfers => &TRANSFERS_ERRORS,
        }
    }

    /// Context owning the table.
    pub const fn context(&self) -> BoundedContext {
        self.context
    }

    /// Curated entry for `internal_code`, if any.
    pub fn lookup(&self, internal_code: &str) -> Option<ApiErrorCode> {
        self.entries
            .iter()
            .find(|(code, _)| *code == internal_code)
            .map(|(_, standard)| *standard)
    }

    /// Curated entry for `internal_code`, or the communication-error fallback.
    ///
    /// # Examples
    /// ```
    /// use translator::domain::QUOTING_ERRORS;
    ///
    /// let table = &QUOTING_ERRORS;
    /// assert_eq!(table.map("QuotingBCQuoteNotFoundErrorEvent").code, "3205");
    /// assert_eq!(table.map("SomethingElse").code, "1000");
    /// ```
    pub fn map(&self, internal_code: &str) -> ApiErrorCode {
        self.lookup(internal_code).unwrap_or(FALLBACK)
    }

    /// Internal codes that name bounded-context error events.
    pub fn error_event_kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .skip(SHARED.len())
            .map(|(code, _)| *code)
    }

    /// All curated entries.
    pub fn entries(&self) -> &'static [ErrorMappingEntry] {
        self.entries
    }
}

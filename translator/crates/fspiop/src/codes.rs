//! Standard FSPIOP error codes and the `errorInformation` wire shape.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A standard error code paired with its canonical description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiErrorCode {
    /// Four-digit code as transmitted on the wire.
    pub code: &'static str,
    /// Canonical description for the code.
    pub description: &'static str,
}

impl ApiErrorCode {
    const fn new(code: &'static str, description: &'static str) -> Self {
        Self { code, description }
    }

    /// Wire representation of this code without extensions.
    #[must_use]
    pub fn to_information(self) -> ErrorInformation {
        ErrorInformation {
            error_code: self.code.to_owned(),
            error_description: self.description.to_owned(),
            extension_list: None,
        }
    }
}

/// `1000` Communication error.
pub const COMMUNICATION_ERROR: ApiErrorCode = ApiErrorCode::new("1000", "Communication error");
/// `1001` Destination communication error.
pub const DESTINATION_COMMUNICATION_ERROR: ApiErrorCode =
    ApiErrorCode::new("1001", "Destination communication error");
/// `2000` Generic server error.
pub const GENERIC_SERVER_ERROR: ApiErrorCode = ApiErrorCode::new("2000", "Generic server error");
/// `2001` Internal server error.
pub const INTERNAL_SERVER_ERROR: ApiErrorCode =
    ApiErrorCode::new("2001", "Internal server error");
/// `2002` Not implemented.
pub const NOT_IMPLEMENTED: ApiErrorCode = ApiErrorCode::new("2002", "Not implemented");
/// `2003` Service currently unavailable.
pub const SERVICE_CURRENTLY_UNAVAILABLE: ApiErrorCode =
    ApiErrorCode::new("2003", "Service currently unavailable");
/// `3000` Generic client error.
pub const GENERIC_CLIENT_ERROR: ApiErrorCode = ApiErrorCode::new("3000", "Generic client error");
/// `3100` Generic validation error.
pub const GENERIC_VALIDATION_ERROR: ApiErrorCode =
    ApiErrorCode::new("3100", "Generic validation error");
/// `3101` Malformed syntax.
pub const MALFORMED_SYNTAX: ApiErrorCode = ApiErrorCode::new("3101", "Malformed syntax");
/// `3102` Missing mandatory element.
pub const MISSING_ELEMENT: ApiErrorCode = ApiErrorCode::new("3102", "Missing mandatory element");
/// `3106` Modified request.
pub const MODIFIED_REQUEST: ApiErrorCode = ApiErrorCode::new("3106", "Modified request");
/// `3200` Generic ID not found.
pub const GENERIC_ID_NOT_FOUND: ApiErrorCode = ApiErrorCode::new("3200", "Generic ID not found");
/// `3201` Destination FSP error.
pub const DESTINATION_FSP_ERROR: ApiErrorCode = ApiErrorCode::new("3201", "Destination FSP Error");
/// `3202` Payer FSP ID not found.
pub const PAYER_FSP_ID_NOT_FOUND: ApiErrorCode =
    ApiErrorCode::new("3202", "Payer FSP ID not found");
/// `3203` Payee FSP ID not found.
pub const PAYEE_FSP_ID_NOT_FOUND: ApiErrorCode =
    ApiErrorCode::new("3203", "Payee FSP ID not found");
/// `3204` Party not found.
pub const PARTY_NOT_FOUND: ApiErrorCode = ApiErrorCode::new("3204", "Party not found");
/// `3205` Quote ID not found.
pub const QUOTE_ID_NOT_FOUND: ApiErrorCode = ApiErrorCode::new("3205", "Quote ID not found");
/// `3208` Transfer ID not found.
pub const TRANSFER_ID_NOT_FOUND: ApiErrorCode = ApiErrorCode::new("3208", "Transfer ID not found");
/// `3209` Bulk quote ID not found.
pub const BULK_QUOTE_ID_NOT_FOUND: ApiErrorCode =
    ApiErrorCode::new("3209", "Bulk quote ID not found");
/// `3210` Bulk transfer ID not found.
pub const BULK_TRANSFER_ID_NOT_FOUND: ApiErrorCode =
    ApiErrorCode::new("3210", "Bulk transfer ID not found");
/// `3300` Generic expired error.
pub const GENERIC_EXPIRED_ERROR: ApiErrorCode = ApiErrorCode::new("3300", "Generic expired error");
/// `3302` Quote expired.
pub const QUOTE_EXPIRED: ApiErrorCode = ApiErrorCode::new("3302", "Quote expired");
/// `3303` Transfer expired.
pub const TRANSFER_EXPIRED: ApiErrorCode = ApiErrorCode::new("3303", "Transfer expired");
/// `4000` Generic payer error.
pub const GENERIC_PAYER_ERROR: ApiErrorCode = ApiErrorCode::new("4000", "Generic Payer error");
/// `4001` Payer FSP insufficient liquidity.
pub const PAYER_FSP_INSUFFICIENT_LIQUIDITY: ApiErrorCode =
    ApiErrorCode::new("4001", "Payer FSP insufficient liquidity");
/// `4100` Generic payer rejection.
pub const GENERIC_PAYER_REJECTION: ApiErrorCode =
    ApiErrorCode::new("4100", "Generic Payer rejection");
/// `4200` Payer limit error.
pub const PAYER_LIMIT_ERROR: ApiErrorCode = ApiErrorCode::new("4200", "Payer limit error");
/// `5000` Generic payee error.
pub const GENERIC_PAYEE_ERROR: ApiErrorCode = ApiErrorCode::new("5000", "Generic Payee error");
/// `5100` Generic payee rejection.
pub const GENERIC_PAYEE_REJECTION: ApiErrorCode =
    ApiErrorCode::new("5100", "Generic Payee rejection");

/// The `errorInformation` object of an FSPIOP error callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInformation {
    /// Four-digit error code.
    pub error_code: String,
    /// Human readable description.
    pub error_description: String,
    /// Optional FSPIOP extension list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_list: Option<Value>,
}

/// Body of an FSPIOP error callback: `{"errorInformation": {...}}`.
///
/// # Examples
/// ```
/// use fspiop::codes::{self, ErrorInformationObject};
///
/// let body = ErrorInformationObject::from(codes::PARTY_NOT_FOUND.to_information());
/// let json = serde_json::to_value(&body)?;
/// assert_eq!(json["errorInformation"]["errorCode"], "3204");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInformationObject {
    /// Wrapped error information.
    pub error_information: ErrorInformation,
}

impl ErrorInformation {
    /// The full `{"errorInformation": {...}}` callback body.
    ///
    /// # Examples
    /// ```
    /// use fspiop::codes;
    ///
    /// let body = codes::PARTY_NOT_FOUND.to_information().to_body();
    /// assert_eq!(body["errorInformation"]["errorCode"], "3204");
    /// assert!(body["errorInformation"].get("extensionList").is_none());
    /// ```
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut information = json!({
            "errorCode": self.error_code,
            "errorDescription": self.error_description,
        });
        if let (Some(extensions), Some(fields)) =
            (&self.extension_list, information.as_object_mut())
        {
            fields.insert("extensionList".to_owned(), extensions.clone());
        }
        json!({ "errorInformation": information })
    }
}

impl From<ErrorInformation> for ErrorInformationObject {
    fn from(error_information: ErrorInformation) -> Self {
        Self { error_information }
    }
}

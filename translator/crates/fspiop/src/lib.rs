//! FSPIOP wire primitives.
//!
//! This crate owns the parts of the FSPIOP API that are pure data: header
//! names, resource (entity) categories, HTTP verbs, canonical callback URLs
//! and the standard error-code catalogue. It performs no I/O so every
//! adapter and the translation core can share one definition of the wire.

pub mod codes;
mod entity;
pub mod headers;
mod method;
mod url_spec;

pub use codes::{ApiErrorCode, ErrorInformation, ErrorInformationObject};
pub use entity::{EntityCategory, UnknownEntityCategory};
pub use method::HttpMethod;
pub use url_spec::{UrlSpec, UrlSpecError};

/// Endpoint type a participant must register to receive FSPIOP callbacks.
pub const FSPIOP_ENDPOINT_TYPE: &str = "FSPIOP";

/// Default API version advertised in `content-type` and `accept` headers.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

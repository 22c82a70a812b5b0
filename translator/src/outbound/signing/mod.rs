//! Callback signing adapters.
//!
//! The signer produces the `fspiop-signature` header value as a JSON
//! document holding a detached HS256 JWS signature and its protected
//! header. Keys are read once at startup and never logged; only a short
//! fingerprint is.

mod jws;
mod key;

pub use jws::HmacJwsSigner;
pub use key::{SigningKey, SigningKeyError};

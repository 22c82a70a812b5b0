//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest callback transport
//! - **directory**: participant registry over HTTP, from a file, or cached
//! - **signing**: HS256 detached-JWS signer and its key material
//! - **schema**: built-in wire-shape validation and mapping
//! - **escalation**: operator-error publishers
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no routing logic.

pub mod directory;
pub mod escalation;
pub mod fs;
pub mod http;
pub mod schema;
pub mod signing;

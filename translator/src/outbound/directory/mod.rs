//! Participant directory adapters.
//!
//! - **http**: the switch's participant registry over HTTP
//! - **static_file**: a JSON registration file read once at startup
//! - **cache**: a TTL decorator for either of the above

mod cache;
mod http;
mod static_file;

pub use cache::CachingParticipantDirectory;
pub use http::HttpParticipantDirectory;
pub use static_file::{StaticDirectoryError, StaticParticipantDirectory};

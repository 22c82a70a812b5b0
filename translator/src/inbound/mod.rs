//! Inbound adapters that feed domain events into the dispatchers while
//! keeping bus details at the edge.
//!
//! The in-process bus and the per-context consumer loop live under
//! [`bus`].

pub mod bus;

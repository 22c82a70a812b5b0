//! FSPIOP callback translator.
//!
//! Consumes bounded-context domain events and turns them into FSPIOP
//! participant callbacks. The [`domain`] layer holds the translation core;
//! [`inbound`] and [`outbound`] hold the adapters; [`config`] and
//! [`bootstrap`] assemble the running service.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

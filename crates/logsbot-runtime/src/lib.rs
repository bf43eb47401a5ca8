//! Async runtime for the logsbot notifier.
//!
//! Wires the domain types from [`logsbot_core`] to the outside world: the
//! message transport, user and group lookups, attachment discovery, and the
//! concurrent fan-out to operator recipients.

pub mod attachment;
pub mod dispatcher;
pub mod enricher;
pub mod fallback;
pub mod pipeline;
pub mod ports;
pub mod reporter;
pub mod triggers;

pub use logsbot_core as core;

#[cfg(test)]
pub(crate) mod mocks;

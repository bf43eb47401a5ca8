//! Domain layer for the logsbot membership notifier.
//!
//! Holds everything that can be decided without touching the network:
//! classifying host events, the per-thread cooldown gate, process session
//! tracking, the message catalog and notification composition.

pub mod catalog;
pub mod composer;
pub mod error;
pub mod events;
pub mod formatting;
pub mod rate_limit;
pub mod session;
pub mod settings;
pub mod thread;
pub mod time_utils;

pub use error::{LogsbotError, Result};

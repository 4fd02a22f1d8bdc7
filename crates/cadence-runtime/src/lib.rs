//! Cadence Runtime - Protocols and the event entry point
//!
//! This crate turns sequences of productions into resumable protocols:
//! 1. The transport delivers one frame to `Registry::on_event`
//! 2. The production dispatches it against the registered rules
//! 3. If the production finished, the active protocol runs one block
//! 4. The block registers the next production and stages an action
//! 5. The staged action runs; failure aborts the protocol
//!
//! Step functions use the same one-block-per-call scheduling without a
//! production.

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod protocol;
pub mod registry;
pub mod step;

pub use config::*;
pub use protocol::*;
pub use registry::*;
pub use step::*;

#[cfg(test)]
pub(crate) mod testing;

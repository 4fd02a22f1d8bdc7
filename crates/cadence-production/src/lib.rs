//! Cadence Production - Rule based event matching
//!
//! A production is one pass of rule registration followed by repeated
//! dispatch of incoming events until a completion condition holds:
//! - Event classifier (`Pattern`)
//! - Rule store with exclusive, normal and global tiers
//! - Production engine (`Production::dispatch`)
//! - Staged pending action (`perform` / `run_pending`)

pub mod classifier;
pub mod config;
pub mod engine;
pub mod host;
pub mod rules;

pub use classifier::*;
pub use config::*;
pub use engine::*;
pub use host::*;
pub use rules::*;

#[cfg(test)]
pub(crate) mod testing;

//! Cadence Test Harness - Scripted controllers and protocol validation
//!
//! This crate provides:
//! - Frame scripts (builder for controller output)
//! - Scripted transport with seeded noise injection
//! - Recording host context and actions
//! - Sample protocols
//! - End-to-end scenario tests

pub mod harness;
pub mod host;
pub mod integration;
pub mod protocols;
pub mod script;
pub mod transport;

pub use harness::*;
pub use host::*;
pub use protocols::*;
pub use script::*;
pub use transport::*;

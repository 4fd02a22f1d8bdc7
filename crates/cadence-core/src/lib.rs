//! Cadence Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every Cadence crate:
//! - Event classification surface (EventView, Inbound)
//! - Classifier kinds and rule tiers
//! - Millisecond time primitives
//! - Error types

pub mod class;
pub mod error;
pub mod event;
pub mod time;

pub use class::*;
pub use error::*;
pub use event::*;
pub use time::*;

//! Cadence Wire - HCI packet format
//!
//! This crate implements the transport-facing side of Cadence:
//! - UART packet framing (type byte + payload)
//! - Event packets (event code, parameter length, parameters)
//! - Classification accessors used by the rule matcher
//! - Name tables for diagnostic output

pub mod codes;
pub mod event;
pub mod packet;

pub use event::*;
pub use packet::*;

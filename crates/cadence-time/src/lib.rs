//! Cadence Time - Clocks and deadlines
//!
//! This crate implements the time source consulted by productions:
//! - `Clock`: monotonic millisecond reading
//! - `SystemClock`: wall-driven clock for real transports
//! - `ManualClock`: hand-advanced clock for tests and simulations
//! - `Timeout`: a single armed deadline

pub mod clock;
pub mod timeout;

pub use clock::*;
pub use timeout::*;

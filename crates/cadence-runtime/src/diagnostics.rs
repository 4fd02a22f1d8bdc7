//! Global diagnostic rules
//!
//! Fallback handlers that log events no protocol asked for. They live in
//! the global tier, so they only fire when no specific rule matched and
//! they survive from one production to the next.

use cadence_core::{CadenceResult, EventView};
use cadence_production::{Host, Pattern, Production};
use cadence_wire::codes::{reset, vendor};
use cadence_wire::HciEvent;

/// Initialization/reset event from the controller
pub fn is_reset(event: &HciEvent) -> bool {
    event.vendor_code() == Some(vendor::HAL_INITIALIZED)
}

fn any_event(_: &HciEvent) -> bool {
    true
}

/// Log a controller reset, as an error when the reason is a fault
pub fn log_reset<H>(event: &HciEvent, _: &mut H::Context, _: &H::Arg) -> bool
where
    H: Host<Event = HciEvent>,
{
    let reason = event.reset_reason().map(|r| r as u8).unwrap_or(0);
    let text = reset::describe(reason).unwrap_or("Reset caused by unknown reason");
    if reset::is_fault(reason) {
        tracing::error!(reason, "controller reset: {}", text);
    } else {
        tracing::info!(reason, "controller reset: {}", text);
    }
    true
}

/// Log an event that no specific rule expected
pub fn log_unexpected<H>(event: &HciEvent, _: &mut H::Context, _: &H::Arg) -> bool
where
    H: Host<Event = HciEvent>,
{
    tracing::debug!(code = event.code, "unexpected event: {}", event.describe());
    true
}

/// Register the reset and catch-all rules, in that order
pub fn install<H>(production: &mut Production<H>, arg: H::Arg) -> CadenceResult<()>
where
    H: Host<Event = HciEvent>,
{
    production.expect_globally_condition(is_reset, Some(log_reset::<H>), arg.clone())?;
    production.expect_globally(Pattern::Predicate(any_event), Some(log_unexpected::<H>), arg)?;
    Ok(())
}

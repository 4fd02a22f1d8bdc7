//! End-to-end scenarios
//!
//! Each scenario runs a sample protocol against a scripted controller
//! through the full decode/dispatch/resume path.

use cadence_wire::codes::{evt, le, procedure, status, vendor};

use crate::FrameScript;

// ============================================================================
// CONTROLLER SCRIPTS
// ============================================================================

/// Connection handle the scripted peer reports
pub const PEER_HANDLE: u16 = 0x0801;

/// Command status followed by a successful LE connection
pub fn connection_established() -> FrameScript {
    let [lo, hi] = PEER_HANDLE.to_le_bytes();
    FrameScript::new()
        .event(cadence_wire::HciEvent::new(
            evt::CMD_STATUS,
            vec![status::SUCCESS, 0x01, 0x0D, 0xFC],
        ))
        .le_meta(le::CONN_COMPLETE, &[status::SUCCESS, lo, hi, 0x00, 0x00])
}

/// LE connection attempt that failed to establish
pub fn connection_failed() -> FrameScript {
    FrameScript::new().le_meta(
        le::CONN_COMPLETE,
        &[status::CONN_FAILED_TO_ESTABLISH, 0x00, 0x00, 0x00, 0x00],
    )
}

/// `count` primary service responses and the closing procedure event
pub fn services_discovered(count: u8) -> FrameScript {
    let [lo, hi] = PEER_HANDLE.to_le_bytes();
    let mut script = FrameScript::new();
    for i in 0..count {
        script = script.vendor(
            vendor::ATT_READ_BY_GROUP_TYPE_RESP,
            &[lo, hi, 0x06, 0x01 + i * 4, 0x00, 0x04 + i * 4, 0x00, 0x00, 0x18 + i],
        );
    }
    script.vendor(vendor::GATT_PROCEDURE_COMPLETE, &[lo, hi, 0x01, status::SUCCESS])
}

/// `reports` advertising reports closed by an observation complete event
pub fn observation_round(reports: u8) -> FrameScript {
    let mut script = FrameScript::new();
    for i in 0..reports {
        script = script.le_meta(le::ADVERTISING_REPORT, &[0x01, 0x00, 0x00, i, 0x22, 0x33]);
    }
    script.procedure_complete(procedure::OBSERVATION, status::SUCCESS)
}

/// Disconnection complete for the scripted peer
pub fn disconnected() -> FrameScript {
    let [lo, hi] = PEER_HANDLE.to_le_bytes();
    FrameScript::new().event(cadence_wire::HciEvent::new(
        evt::DISCONN_COMPLETE,
        vec![status::SUCCESS, lo, hi, status::LOCAL_HOST_TERM_CONN],
    ))
}

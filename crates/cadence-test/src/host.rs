//! Recording host
//!
//! Actions and procedures record what they saw into a [`Recorder`]. A
//! procedure can also make the simulated controller answer: responses
//! queued under its tag are moved to the outbox when it runs, and the
//! harness feeds the outbox to the transport.

use std::collections::{HashMap, HashSet};

use cadence_core::EventView;
use cadence_production::Host;
use cadence_wire::HciEvent;

use crate::FrameScript;

/// BLE host used by the harness
pub struct BleHost;

impl Host for BleHost {
    type Event = HciEvent;
    type Context = Recorder;
    type Arg = &'static str;
}

/// Collaborator state
#[derive(Debug, Default)]
pub struct Recorder {
    /// Tags of rule actions, in firing order
    pub fired: Vec<&'static str>,
    /// Tags of staged procedures, in execution order
    pub performed: Vec<&'static str>,
    /// Vendor payloads collected by `collect_vendor_data`
    pub reports: Vec<Vec<u8>>,
    /// Handle captured from an LE connection complete event
    pub connection_handle: Option<u16>,
    /// Procedures that report failure
    failing: HashSet<&'static str>,
    /// Controller responses keyed by procedure tag
    responses: HashMap<&'static str, Vec<Vec<u8>>>,
    /// Frames the controller has sent but the transport has not picked up
    outbox: Vec<Vec<u8>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make procedure `tag` report failure
    pub fn fail(&mut self, tag: &'static str) {
        self.failing.insert(tag);
    }

    /// Queue `script` as the controller's answer to procedure `tag`
    pub fn respond(&mut self, tag: &'static str, script: FrameScript) {
        self.responses
            .entry(tag)
            .or_default()
            .extend(script.into_frames());
    }

    /// Frames produced since the last call
    pub fn take_outbox(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.outbox)
    }
}

/// Record the rule's tag
pub fn record(_: &HciEvent, rec: &mut Recorder, tag: &&'static str) -> bool {
    rec.fired.push(*tag);
    true
}

/// Keep the payload of a vendor event
pub fn collect_vendor_data(event: &HciEvent, rec: &mut Recorder, tag: &&'static str) -> bool {
    rec.fired.push(*tag);
    match event.vendor_data() {
        Some(data) => {
            rec.reports.push(data.to_vec());
            true
        }
        None => false,
    }
}

/// Capture the handle of an LE connection complete event
///
/// Parameters after the sub-event: status, handle (LE u16), ...
pub fn capture_connection(event: &HciEvent, rec: &mut Recorder, tag: &&'static str) -> bool {
    rec.fired.push(*tag);
    let Some(data) = event.le_data() else {
        return false;
    };
    if data.len() < 3 || data[0] != 0 {
        return false;
    }
    rec.connection_handle = Some(u16::from_le_bytes([data[1], data[2]]));
    true
}

/// Issue a command to the simulated controller
pub fn issue(rec: &mut Recorder, tag: &&'static str) -> bool {
    rec.performed.push(*tag);
    if rec.failing.contains(tag) {
        return false;
    }
    if let Some(frames) = rec.responses.remove(tag) {
        rec.outbox.extend(frames);
    }
    true
}

/// Is `event` an LE meta event at all?
pub fn is_le_meta(event: &HciEvent) -> bool {
    event.sub_event().is_some()
}

//! Frame scripts - raw controller output built event by event

use cadence_wire::{HciEvent, HciPacket, PacketType};

/// Ordered list of raw UART frames
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameScript {
    frames: Vec<Vec<u8>>,
}

impl FrameScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event frame
    ///
    /// Events built by the helpers below always fit the parameter length
    /// byte; oversized events are skipped with a warning.
    pub fn event(mut self, event: HciEvent) -> Self {
        match HciPacket::Event(event).serialize() {
            Ok(bytes) => self.frames.push(bytes),
            Err(e) => tracing::warn!("skipping unencodable event: {}", e),
        }
        self
    }

    /// Plain event with no parameters
    pub fn code(self, code: u8) -> Self {
        self.event(HciEvent::new(code, Vec::new()))
    }

    pub fn le_meta(self, sub_event: u8, data: &[u8]) -> Self {
        self.event(HciEvent::le_meta(sub_event, data))
    }

    pub fn vendor(self, ecode: u16, data: &[u8]) -> Self {
        self.event(HciEvent::vendor(ecode, data))
    }

    pub fn reset(self, reason: u8) -> Self {
        self.event(HciEvent::hal_initialized(reason))
    }

    pub fn procedure_complete(self, procedure: u8, status: u8) -> Self {
        self.event(HciEvent::procedure_complete(procedure, status))
    }

    /// Append a non-event packet
    pub fn acl(mut self, payload: &[u8]) -> Self {
        let mut bytes = vec![PacketType::AclData.to_byte()];
        bytes.extend_from_slice(payload);
        self.frames.push(bytes);
        self
    }

    /// Append raw bytes verbatim, malformed or not
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.frames.push(bytes.to_vec());
        self
    }

    /// Append every frame of another script
    pub fn then(mut self, other: FrameScript) -> Self {
        self.frames.extend(other.frames);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<Vec<u8>> {
        self.frames
    }
}

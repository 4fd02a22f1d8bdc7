//! HCI event notifications
//!
//! Event packet layout (after the UART type byte):
//! - Byte 0: Event code
//! - Byte 1: Parameter length
//! - Bytes 2..: Parameters
//!
//! Vendor events start their parameters with a 16-bit ecode (LE); the HAL
//! initialized and GAP procedure complete events follow it with a one-byte
//! reason/procedure code.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use cadence_core::{CadenceError, CadenceResult, EventCode, EventView};

use crate::codes::{evt, le, procedure, reset, vendor};

/// Event header size (code + parameter length)
pub const EVENT_HEADER_SIZE: usize = 2;

/// Maximum parameter length representable in the header
pub const MAX_PARAMS_LEN: usize = u8::MAX as usize;

/// One HCI event notification
#[derive(Clone, PartialEq, Eq)]
pub struct HciEvent {
    /// Event code
    pub code: u8,
    /// Event parameters
    pub params: Bytes,
}

impl HciEvent {
    /// Create an event from its code and raw parameters
    pub fn new(code: u8, params: impl Into<Bytes>) -> Self {
        HciEvent {
            code,
            params: params.into(),
        }
    }

    /// LE meta event carrying `sub_event` followed by `data`
    pub fn le_meta(sub_event: u8, data: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(1 + data.len());
        buf.put_u8(sub_event);
        buf.put_slice(data);
        HciEvent::new(evt::LE_META_EVENT, buf.freeze())
    }

    /// Vendor event carrying `ecode` followed by `data`
    pub fn vendor(ecode: u16, data: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(2 + data.len());
        buf.put_u16_le(ecode);
        buf.put_slice(data);
        HciEvent::new(evt::VENDOR, buf.freeze())
    }

    /// HAL initialized (reset) event
    pub fn hal_initialized(reason: u8) -> Self {
        HciEvent::vendor(vendor::HAL_INITIALIZED, &[reason])
    }

    /// GAP procedure complete event
    pub fn procedure_complete(procedure_code: u8, status: u8) -> Self {
        HciEvent::vendor(vendor::GAP_PROCEDURE_COMPLETE, &[procedure_code, status])
    }

    /// Parse an event from the bytes that follow the UART type byte
    pub fn parse(buf: &[u8]) -> CadenceResult<Self> {
        if buf.len() < EVENT_HEADER_SIZE {
            return Err(CadenceError::BufferTooShort {
                expected: EVENT_HEADER_SIZE,
                actual: buf.len(),
            });
        }

        let code = buf[0];
        let declared = buf[1] as usize;
        let actual = buf.len() - EVENT_HEADER_SIZE;
        if declared != actual {
            return Err(CadenceError::LengthMismatch { declared, actual });
        }

        Ok(HciEvent {
            code,
            params: Bytes::copy_from_slice(&buf[EVENT_HEADER_SIZE..]),
        })
    }

    /// Serialize code, length and parameters
    pub fn encode(&self, buf: &mut BytesMut) -> CadenceResult<()> {
        if self.params.len() > MAX_PARAMS_LEN {
            return Err(CadenceError::MalformedFrame(format!(
                "event parameters too long: {} > {}",
                self.params.len(),
                MAX_PARAMS_LEN
            )));
        }
        buf.reserve(EVENT_HEADER_SIZE + self.params.len());
        buf.put_u8(self.code);
        buf.put_u8(self.params.len() as u8);
        buf.put_slice(&self.params);
        Ok(())
    }

    #[inline]
    pub fn is_le_meta(&self) -> bool {
        self.code == evt::LE_META_EVENT
    }

    #[inline]
    pub fn is_vendor(&self) -> bool {
        self.code == evt::VENDOR
    }

    /// Parameters following the ecode of a vendor event
    pub fn vendor_data(&self) -> Option<&[u8]> {
        if self.is_vendor() && self.params.len() >= 2 {
            Some(&self.params[2..])
        } else {
            None
        }
    }

    /// Parameters following the sub-event byte of an LE meta event
    pub fn le_data(&self) -> Option<&[u8]> {
        if self.is_le_meta() && !self.params.is_empty() {
            Some(&self.params[1..])
        } else {
            None
        }
    }

    /// Status byte of a GAP procedure complete event
    pub fn procedure_status(&self) -> Option<u8> {
        if self.vendor_code() != Some(vendor::GAP_PROCEDURE_COMPLETE) {
            return None;
        }
        self.vendor_data().and_then(|d| d.get(1).copied())
    }

    /// Human-readable description for diagnostics
    pub fn describe(&self) -> String {
        if let Some(sub) = self.sub_event() {
            let sub = sub as u8;
            return match le::name(sub) {
                Some(name) => format!("EVT_LE_META_EVENT/{}", name),
                None => format!("EVT_LE_META_EVENT/unknown subevent {:#04x}", sub),
            };
        }
        if let Some(reason) = self.reset_reason() {
            let reason = reason as u8;
            return format!(
                "EVT_BLUE_HAL_INITIALIZED: {}",
                reset::describe(reason).unwrap_or("Reset caused by unknown reason")
            );
        }
        if let Some(code) = self.procedure_code() {
            let code = code as u8;
            return format!(
                "EVT_BLUE_GAP_PROCEDURE_COMPLETE/{} status {:#04x}",
                procedure::name(code).unwrap_or("unknown procedure"),
                self.procedure_status().unwrap_or(0)
            );
        }
        if let Some(ecode) = self.vendor_code() {
            return match vendor::name(ecode) {
                Some(name) => name.to_string(),
                None => format!(
                    "unknown {} ecode {:#06x}",
                    vendor::group_name(ecode),
                    ecode
                ),
            };
        }
        match evt::name(self.code) {
            Some(name) => name.to_string(),
            None => format!("unknown event {:#04x}", self.code),
        }
    }
}

impl EventView for HciEvent {
    fn event_code(&self) -> EventCode {
        self.code as EventCode
    }

    fn sub_event(&self) -> Option<EventCode> {
        if self.is_le_meta() {
            self.params.first().map(|&b| b as EventCode)
        } else {
            None
        }
    }

    fn vendor_code(&self) -> Option<EventCode> {
        if self.is_vendor() && self.params.len() >= 2 {
            Some(u16::from_le_bytes([self.params[0], self.params[1]]))
        } else {
            None
        }
    }

    fn reset_reason(&self) -> Option<EventCode> {
        if self.vendor_code() != Some(vendor::HAL_INITIALIZED) {
            return None;
        }
        self.vendor_data()
            .and_then(|d| d.first())
            .map(|&b| b as EventCode)
    }

    fn procedure_code(&self) -> Option<EventCode> {
        if self.vendor_code() != Some(vendor::GAP_PROCEDURE_COMPLETE) {
            return None;
        }
        self.vendor_data()
            .and_then(|d| d.first())
            .map(|&b| b as EventCode)
    }
}

impl fmt::Debug for HciEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HciEvent({:#04x}, {} bytes)", self.code, self.params.len())
    }
}

impl fmt::Display for HciEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

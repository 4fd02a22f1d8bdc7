//! UART transport packets
//!
//! Packet = Type byte + Payload. Only event packets are decoded further;
//! everything else is carried opaquely so it can be logged and ignored.

use bytes::{BufMut, Bytes, BytesMut};
use cadence_core::{CadenceError, CadenceResult, Inbound};

use crate::event::{HciEvent, EVENT_HEADER_SIZE};

/// Packet type byte
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    Command = 0x01,
    AclData = 0x02,
    ScoData = 0x03,
    Event = 0x04,
    Vendor = 0xFF,
}

impl PacketType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(PacketType::Command),
            0x02 => Some(PacketType::AclData),
            0x03 => Some(PacketType::ScoData),
            0x04 => Some(PacketType::Event),
            0xFF => Some(PacketType::Vendor),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// One packet received from the controller
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HciPacket {
    /// Event notification
    Event(HciEvent),
    /// Any non-event packet, kept undecoded
    Other {
        packet_type: PacketType,
        payload: Bytes,
    },
}

impl HciPacket {
    /// Parse a packet from a complete UART buffer
    pub fn parse(buf: &[u8]) -> CadenceResult<Self> {
        let (&type_byte, rest) = buf.split_first().ok_or(CadenceError::BufferTooShort {
            expected: 1,
            actual: 0,
        })?;

        let packet_type =
            PacketType::from_byte(type_byte).ok_or(CadenceError::UnknownPacketType(type_byte))?;

        match packet_type {
            PacketType::Event => {
                if rest.len() < EVENT_HEADER_SIZE {
                    return Err(CadenceError::BufferTooShort {
                        expected: 1 + EVENT_HEADER_SIZE,
                        actual: buf.len(),
                    });
                }
                Ok(HciPacket::Event(HciEvent::parse(rest)?))
            }
            other => Ok(HciPacket::Other {
                packet_type: other,
                payload: Bytes::copy_from_slice(rest),
            }),
        }
    }

    /// Serialize to a UART buffer
    pub fn serialize(&self) -> CadenceResult<Vec<u8>> {
        let mut buf = BytesMut::new();
        match self {
            HciPacket::Event(event) => {
                buf.put_u8(PacketType::Event.to_byte());
                event.encode(&mut buf)?;
            }
            HciPacket::Other {
                packet_type,
                payload,
            } => {
                buf.reserve(1 + payload.len());
                buf.put_u8(packet_type.to_byte());
                buf.put_slice(payload);
            }
        }
        Ok(buf.to_vec())
    }

    pub fn packet_type(&self) -> PacketType {
        match self {
            HciPacket::Event(_) => PacketType::Event,
            HciPacket::Other { packet_type, .. } => *packet_type,
        }
    }

    #[inline]
    pub fn is_event(&self) -> bool {
        matches!(self, HciPacket::Event(_))
    }
}

impl From<HciEvent> for HciPacket {
    fn from(event: HciEvent) -> Self {
        HciPacket::Event(event)
    }
}

impl Inbound for HciPacket {
    type Event = HciEvent;

    fn as_event(&self) -> Option<&HciEvent> {
        match self {
            HciPacket::Event(event) => Some(event),
            HciPacket::Other { .. } => None,
        }
    }
}

//! Packet and error types for the meter's binary protocol
//!
//! # Frame Format
//!
//! Every frame starts with a one-byte type tag:
//! ```text
//! [tag: u8][payload...]
//! ```
//!
//! Multi-byte integers are big-endian throughout. A rejected request is
//! answered with a fixed 2-byte error frame:
//! ```text
//! [tag | 0x40][error code: u8]
//! ```
//!
//! Outbound periodic telemetry instead ORs its parameter number into the
//! tag with 0x80; the two flag namespaces never overlap.

use crate::config::packet::{ERROR_FLAG, RESPONSE_CAPACITY};
use heapless::Vec;

/// A complete response frame ready for the radio
///
/// An empty frame means "nothing to transmit"; it is only produced for
/// empty input.
pub type ResponseFrame = Vec<u8, RESPONSE_CAPACITY>;

/// Packet type tags
///
/// Requests are sent from the network to the meter. Echo, Event and
/// PairEvent are part of the wire vocabulary but carry no inbound handler;
/// receiving one reports [`ErrorCode::InvalidType`] exactly like an unknown
/// tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Read a run of parameters (0x03)
    ///
    /// - Payload: start address (u16), count (u16)
    /// - Response: echoed 5-byte header + `count` 4-byte values
    ReadMultiple = 0x03,

    /// Write one parameter (0x06)
    ///
    /// - Payload: address (u16), value (i32)
    /// - Response: the full 7-byte request echoed back
    WriteSingle = 0x06,

    /// Read one parameter (0x07)
    ///
    /// - Payload: address (u16)
    /// - Response: echoed 3-byte header + 4-byte value
    ReadSingle = 0x07,

    /// Write a run of parameters (0x10)
    ///
    /// - Payload: start address (u16), count (u16), `count` values
    /// - Response: the 5-byte header only; values are never echoed
    WriteMultiple = 0x10,

    /// Echo service (0x19), reserved, not handled
    Echo = 0x19,

    /// Event report (0x20), outbound only
    Event = 0x20,

    /// Paired event report (0x21), outbound only
    PairEvent = 0x21,

    /// Remote control frame (0x27)
    ///
    /// - Payload: fixed 6 command bytes, delegated to the backend
    /// - Response: backend-defined
    Control = 0x27,

    /// Firmware transfer frame (0x29)
    ///
    /// - Payload: at least 1 byte, delegated to the backend
    /// - Response: backend-defined
    FirmwareUpdate = 0x29,
}

impl PacketType {
    /// Try to convert a tag byte to a PacketType
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x03 => Some(Self::ReadMultiple),
            0x06 => Some(Self::WriteSingle),
            0x07 => Some(Self::ReadSingle),
            0x10 => Some(Self::WriteMultiple),
            0x19 => Some(Self::Echo),
            0x20 => Some(Self::Event),
            0x21 => Some(Self::PairEvent),
            0x27 => Some(Self::Control),
            0x29 => Some(Self::FirmwareUpdate),
            _ => None,
        }
    }
}

/// Error codes carried in the second byte of an error frame
///
/// Structural codes (InvalidType, InvalidLength) are decided from the input
/// alone; the remaining codes originate from the storage provider.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Unknown tag, or a delegated tag with no fitted handler (0x01)
    InvalidType = 0x01,

    /// The storage provider rejected the address (0x02)
    InvalidAddress = 0x02,

    /// The storage provider rejected the value (0x03)
    InvalidValue = 0x03,

    /// Storage or hardware fault below the protocol layer (0x04)
    LowLevelError = 0x04,

    /// Write attempted on a read-only parameter (0x05)
    ReadOnly = 0x05,

    /// Frame length does not match the tag's layout (0x06)
    InvalidLength = 0x06,
}

/// Parsed request with payload borrowed from the input frame
#[derive(Debug, Clone, PartialEq)]
pub enum Request<'a> {
    /// Read `count` parameters ascending from `start`
    ReadMultiple { start: u16, count: u16 },

    /// Write a run of big-endian values ascending from `start`
    ///
    /// `values` always holds a whole number of 4-byte parameters.
    WriteMultiple { start: u16, values: &'a [u8] },

    /// Read the parameter at `address`
    ReadSingle { address: u16 },

    /// Write `value` to the parameter at `address`
    WriteSingle { address: u16, value: i32 },

    /// Firmware transfer, handed to the backend verbatim
    FirmwareUpdate { frame: &'a [u8] },

    /// Remote control, handed to the backend verbatim
    Control { frame: &'a [u8] },
}

impl Request<'_> {
    /// Get the wire tag for this request
    pub fn packet_type(&self) -> PacketType {
        match self {
            Request::ReadMultiple { .. } => PacketType::ReadMultiple,
            Request::WriteMultiple { .. } => PacketType::WriteMultiple,
            Request::ReadSingle { .. } => PacketType::ReadSingle,
            Request::WriteSingle { .. } => PacketType::WriteSingle,
            Request::FirmwareUpdate { .. } => PacketType::FirmwareUpdate,
            Request::Control { .. } => PacketType::Control,
        }
    }
}

/// Build the uniform 2-byte error response for a rejected request
///
/// `tag` is the raw first byte of the offending frame, kept even when it
/// matches no known packet type.
pub fn error_frame(tag: u8, code: ErrorCode) -> ResponseFrame {
    let mut frame = ResponseFrame::new();
    let _ = frame.push(tag | ERROR_FLAG);
    let _ = frame.push(code as u8);
    frame
}

//! Request parser for raw radio frames
//!
//! Validates tag and length, then decodes into a typed [`Request`].

use crate::config::packet::{
    CONTROL_LEN, FIRMWARE_MIN_LEN, MULTI_HEADER_LEN, PARAMETER_LEN, READ_SINGLE_LEN,
    RESPONSE_CAPACITY, WRITE_SINGLE_LEN,
};
use crate::packet::types::{ErrorCode, PacketType, Request};

/// Parser for inbound protocol frames
pub struct PacketParser;

impl PacketParser {
    /// Create a new packet parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw frame into a typed request
    ///
    /// All structural validation happens here, before any storage access:
    /// a frame whose length does not match its tag's layout never reaches
    /// the backend. The error code is the one the 2-byte error frame
    /// carries back.
    pub fn parse<'a>(&self, data: &'a [u8]) -> Result<Request<'a>, ErrorCode> {
        let tag = *data.first().ok_or(ErrorCode::InvalidLength)?;

        match PacketType::from_byte(tag) {
            Some(PacketType::ReadMultiple) => {
                if data.len() != MULTI_HEADER_LEN {
                    return Err(ErrorCode::InvalidLength);
                }
                let start = u16::from_be_bytes([data[1], data[2]]);
                let count = u16::from_be_bytes([data[3], data[4]]);
                // The whole response has to fit the radio buffer
                if MULTI_HEADER_LEN + PARAMETER_LEN * count as usize > RESPONSE_CAPACITY {
                    return Err(ErrorCode::InvalidLength);
                }
                Ok(Request::ReadMultiple { start, count })
            }
            Some(PacketType::WriteMultiple) => {
                // The count field must be readable before the length rule
                // can be checked
                if data.len() < MULTI_HEADER_LEN {
                    return Err(ErrorCode::InvalidLength);
                }
                let start = u16::from_be_bytes([data[1], data[2]]);
                let count = u16::from_be_bytes([data[3], data[4]]);
                if data.len() != MULTI_HEADER_LEN + PARAMETER_LEN * count as usize {
                    return Err(ErrorCode::InvalidLength);
                }
                Ok(Request::WriteMultiple {
                    start,
                    values: &data[MULTI_HEADER_LEN..],
                })
            }
            Some(PacketType::ReadSingle) => {
                if data.len() != READ_SINGLE_LEN {
                    return Err(ErrorCode::InvalidLength);
                }
                Ok(Request::ReadSingle {
                    address: u16::from_be_bytes([data[1], data[2]]),
                })
            }
            Some(PacketType::WriteSingle) => {
                if data.len() != WRITE_SINGLE_LEN {
                    return Err(ErrorCode::InvalidLength);
                }
                Ok(Request::WriteSingle {
                    address: u16::from_be_bytes([data[1], data[2]]),
                    value: i32::from_be_bytes([data[3], data[4], data[5], data[6]]),
                })
            }
            Some(PacketType::FirmwareUpdate) => {
                if data.len() < FIRMWARE_MIN_LEN {
                    return Err(ErrorCode::InvalidLength);
                }
                Ok(Request::FirmwareUpdate { frame: data })
            }
            Some(PacketType::Control) => {
                if data.len() != CONTROL_LEN {
                    return Err(ErrorCode::InvalidLength);
                }
                Ok(Request::Control { frame: data })
            }
            // Wire vocabulary without an inbound handler, same as unknown
            Some(PacketType::Echo) | Some(PacketType::Event) | Some(PacketType::PairEvent)
            | None => Err(ErrorCode::InvalidType),
        }
    }
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

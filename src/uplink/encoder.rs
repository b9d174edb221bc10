//! Outbound telemetry builders
//!
//! Formats the meter's self-initiated messages. These never pass through
//! the dispatcher: the host task builds a frame and hands the bytes
//! straight to the radio. An empty frame means the builder rejected its
//! arguments, since no status channel exists on this path.

use crate::backend::traits::MeterBackend;
use crate::config::uplink::{EVENT_RESET, FRAME_CAPACITY, MAX_REGULAR_PARAMETER, REGULAR_FLAG};
use crate::packet::types::PacketType;
use crate::uplink::additional;
use heapless::Vec;

/// A built outbound frame
pub type UplinkFrame = Vec<u8, FRAME_CAPACITY>;

/// Builder for outbound telemetry frames
pub struct UplinkEncoder;

impl UplinkEncoder {
    /// Create a new uplink encoder
    pub fn new() -> Self {
        Self
    }

    /// Generic event report
    ///
    /// 5 bytes: tag 0x20, event id, payload, both big-endian.
    pub fn event(&self, event: u16, payload: u16) -> UplinkFrame {
        let mut frame = UplinkFrame::new();
        let _ = frame.push(PacketType::Event as u8);
        let _ = frame.extend_from_slice(&event.to_be_bytes());
        let _ = frame.extend_from_slice(&payload.to_be_bytes());
        frame
    }

    /// Boot report carrying the reset counter
    ///
    /// A plain event with id [`EVENT_RESET`]. Negative counters clamp to
    /// zero and counters beyond 16 bits wrap silently.
    pub fn start(&self, resets: i32) -> UplinkFrame {
        self.event(EVENT_RESET, resets.max(0) as u16)
    }

    /// Paired report: one parameter value with its delta
    ///
    /// 8 bytes: pair tag, parameter id, value (big-endian 32-bit), diff
    /// (big-endian 16-bit).
    pub fn pair_event(&self, parameter: u8, value: u32, diff: u16) -> UplinkFrame {
        let mut frame = UplinkFrame::new();
        let _ = frame.push(PacketType::PairEvent as u8);
        let _ = frame.push(parameter);
        let _ = frame.extend_from_slice(&value.to_be_bytes());
        let _ = frame.extend_from_slice(&diff.to_be_bytes());
        frame
    }

    /// Short periodic telemetry frame
    ///
    /// 7-byte core: tag 0x80 | `parameter_number`, schedule, payload. Up
    /// to five additional parameters ride behind it, unpacked from the
    /// packed `additional` setting, each encoded as its address byte plus
    /// the value fetched from the backend at build time. A failed fetch
    /// encodes value 0; the block count never shrinks. A
    /// `parameter_number` over 63 does not fit the 6-bit tag field and
    /// builds nothing.
    pub fn short_regular<B: MeterBackend>(
        &self,
        backend: &mut B,
        payload: i32,
        parameter_number: u8,
        schedule: u16,
        additional: i32,
    ) -> UplinkFrame {
        let mut frame = UplinkFrame::new();
        if parameter_number > MAX_REGULAR_PARAMETER {
            return frame;
        }

        let _ = frame.push(REGULAR_FLAG | parameter_number);
        let _ = frame.extend_from_slice(&schedule.to_be_bytes());
        let _ = frame.extend_from_slice(&payload.to_be_bytes());

        for address in additional::unpack(additional) {
            let value = backend.read_parameter(u16::from(address)).unwrap_or(0);
            let _ = frame.push(address);
            let _ = frame.extend_from_slice(&value.to_be_bytes());
        }

        frame
    }
}

impl Default for UplinkEncoder {
    fn default() -> Self {
        Self::new()
    }
}

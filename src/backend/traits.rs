//! Backend trait for abstraction and testability
//!
//! The protocol layer owns no storage and no services of its own; every
//! parameter lives behind this trait, supplied by the surrounding firmware
//! and threaded through each call. Tests swap in a mock.

use crate::packet::types::{ErrorCode, ResponseFrame};

/// What the protocol layer needs from the surrounding firmware
///
/// `read_parameter` and `write_parameter` must always be fitted as a pair;
/// making them required methods enforces that at compile time. The two
/// delegated services are optional: a backend that leaves the defaults in
/// place reports [`ErrorCode::InvalidType`] for their packet types, which
/// the dispatcher turns into the uniform error frame.
pub trait MeterBackend {
    /// Fetch the parameter stored at `address`
    fn read_parameter(&mut self, address: u16) -> Result<i32, ErrorCode>;

    /// Store `value` as the parameter at `address`
    fn write_parameter(&mut self, address: u16, value: i32) -> Result<(), ErrorCode>;

    /// Handle a firmware-transfer frame (tag 0x29), given verbatim
    ///
    /// The returned frame is transmitted as-is apart from its first byte,
    /// which the dispatcher stamps with the request tag.
    fn firmware_frame(&mut self, frame: &[u8]) -> Result<ResponseFrame, ErrorCode> {
        let _ = frame;
        Err(ErrorCode::InvalidType)
    }

    /// Handle a remote-control frame (tag 0x27), given verbatim
    fn control_frame(&mut self, frame: &[u8]) -> Result<ResponseFrame, ErrorCode> {
        let _ = frame;
        Err(ErrorCode::InvalidType)
    }
}

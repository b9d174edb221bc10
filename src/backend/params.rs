//! Parameter transfer between wire form and the storage provider
//!
//! One parameter is always 4 bytes on the wire, big-endian
//! two's-complement, whatever its address.

use crate::backend::traits::MeterBackend;
use crate::config::packet::PARAMETER_LEN;
use crate::packet::types::ErrorCode;

/// Direction of one parameter transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterAction {
    Read,
    Write,
}

/// Move one parameter between its wire form and the backend
///
/// `Read` fetches the value at `address` and encodes it into the first 4
/// bytes of `buf`; `Write` decodes those bytes and stores them. Exactly one
/// backend call per invocation, and the provider's status passes through
/// unchanged. A `buf` shorter than one parameter reports InvalidAddress
/// without touching the backend.
pub fn transfer<B: MeterBackend>(
    backend: &mut B,
    address: u16,
    action: ParameterAction,
    buf: &mut [u8],
) -> Result<(), ErrorCode> {
    if buf.len() < PARAMETER_LEN {
        return Err(ErrorCode::InvalidAddress);
    }
    let buf = &mut buf[..PARAMETER_LEN];

    match action {
        ParameterAction::Read => {
            let value = backend.read_parameter(address)?;
            buf.copy_from_slice(&value.to_be_bytes());
        }
        ParameterAction::Write => {
            let mut raw = [0u8; PARAMETER_LEN];
            raw.copy_from_slice(buf);
            backend.write_parameter(address, i32::from_be_bytes(raw))?;
        }
    }

    Ok(())
}

//! Packed additional-parameter codec
//!
//! One stored setting selects which parameters ride along on the short
//! regular message: up to five 6-bit address fields packed into a single
//! signed word, lowest field first.

use crate::config::uplink::{ADDITIONAL_ADDRESS_BITS, MAX_ADDITIONAL};
use heapless::Vec;

/// Unpack the additional-parameter setting into an address list
///
/// Consumes the low 6 bits per step. A zero field terminates the list,
/// which makes address 0 unreachable through this setting; that is a
/// property of the packing, not a defect. The shift is arithmetic, so a
/// negative setting keeps yielding its sign-extended low field until the
/// list is full.
pub fn unpack(packed: i32) -> Vec<u8, MAX_ADDITIONAL> {
    let mask = (1 << ADDITIONAL_ADDRESS_BITS) - 1;
    let mut addresses = Vec::new();
    let mut remaining = packed;

    while addresses.len() < MAX_ADDITIONAL {
        let address = (remaining & mask) as u8;
        if address == 0 {
            break;
        }
        let _ = addresses.push(address);
        remaining >>= ADDITIONAL_ADDRESS_BITS;
    }

    addresses
}

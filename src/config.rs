//! Protocol configuration constants for the meter radio link

/// Inbound packet constants
pub mod packet {
    /// Response buffer capacity; ReadMultiple is admission-checked
    /// against this before any storage access
    pub const RESPONSE_CAPACITY: usize = 128;

    /// ORed into the request tag of a 2-byte error response
    pub const ERROR_FLAG: u8 = 0x40;

    /// Error responses are always tag + code
    pub const ERROR_FRAME_LEN: usize = 2;

    /// Wire width of one parameter value
    pub const PARAMETER_LEN: usize = 4;

    /// tag, addr16, count16
    pub const MULTI_HEADER_LEN: usize = 5;

    /// tag, addr16
    pub const READ_SINGLE_LEN: usize = 3;

    /// tag, addr16, value32
    pub const WRITE_SINGLE_LEN: usize = 7;

    /// Shortest firmware-transfer frame: tag + one opcode byte
    pub const FIRMWARE_MIN_LEN: usize = 2;

    /// Control frames are fixed-size
    pub const CONTROL_LEN: usize = 7;
}

/// Outbound telemetry constants
pub mod uplink {
    /// Worst case is a short regular message with a full additional set
    pub const FRAME_CAPACITY: usize = 32;

    /// ORed with the parameter number in a regular-message tag
    pub const REGULAR_FLAG: u8 = 0x80;

    /// Largest parameter number the 6-bit regular-tag field can carry
    pub const MAX_REGULAR_PARAMETER: u8 = 63;

    /// Event id reported after a reset
    pub const EVENT_RESET: u16 = 0;

    /// tag, event16, payload16
    pub const EVENT_LEN: usize = 5;

    /// tag, parameter8, value32, diff16
    pub const PAIR_EVENT_LEN: usize = 8;

    /// tag, schedule16, payload32
    pub const REGULAR_HEADER_LEN: usize = 7;

    /// address8, value32 per piggybacked parameter
    pub const ADDITIONAL_BLOCK_LEN: usize = 5;

    /// At most this many additional parameters ride on one regular message
    pub const MAX_ADDITIONAL: usize = 5;

    /// Field width of one packed additional-parameter address
    pub const ADDITIONAL_ADDRESS_BITS: u32 = 6;
}

/// Scheduler constants
pub mod schedule {
    pub const MINUTES_PER_DAY: i32 = 1440;
    pub const SECONDS_PER_DAY: u32 = 86_400;
}

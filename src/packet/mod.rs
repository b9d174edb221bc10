pub mod parser;
pub mod types;

pub use parser::PacketParser;
pub use types::{error_frame, ErrorCode, PacketType, Request, ResponseFrame};

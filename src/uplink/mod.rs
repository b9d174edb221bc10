pub mod additional;
pub mod encoder;

pub use encoder::{UplinkEncoder, UplinkFrame};

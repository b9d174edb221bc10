pub mod params;
pub mod traits;

pub use params::{transfer, ParameterAction};
pub use traits::MeterBackend;

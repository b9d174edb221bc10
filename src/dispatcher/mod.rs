pub mod handler;

pub use handler::PacketDispatcher;

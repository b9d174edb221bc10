#![cfg_attr(not(test), no_std)]

//! Application-layer radio protocol for a battery-powered utility meter
//!
//! Inbound frames are routed by [`PacketDispatcher`] against a
//! caller-supplied [`MeterBackend`]; outbound telemetry is built by
//! [`UplinkEncoder`] and timed by the two schedulers. The crate holds no
//! global state and performs no allocation; every buffer is a bounded
//! `heapless` vector sized in [`config`].

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod packet;
pub mod schedule;
pub mod uplink;

pub use backend::{MeterBackend, ParameterAction};
pub use dispatcher::PacketDispatcher;
pub use packet::{ErrorCode, PacketType, Request, ResponseFrame};
pub use schedule::{PrecisionScheduler, Scheduler};
pub use uplink::{UplinkEncoder, UplinkFrame};

//! WebSocket relay that pairs two browsers per room and forwards their frames.
//!
//! The relay never simulates; it only tracks room membership and the
//! host/client roles the peers rely on.

pub mod config;
pub mod error;
pub mod registry;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::RelayError;
pub use registry::{ConnId, JoinOutcome, LeaveOutcome, RoomRegistry};
pub use router::{ChannelSink, PeerSink, Relay, RelayHandle};
pub use server::serve;

#[cfg(test)]
mod tests;

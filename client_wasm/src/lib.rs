//! Browser peer for networked Pong
//!
//! Either peer may hold authority: the host runs the simulation engine and
//! streams snapshots, the client mirrors them. Rendering, audio and the DOM
//! stay in the page; this crate exposes state and consumes key events.

pub mod fsm;
pub mod input;
pub mod mirror;
pub mod network;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod web;

pub use fsm::{FsmState, GameAction, GameFsm};
pub use input::{key_from_str, InputKey};
pub use mirror::ClientMirror;
pub use network::Transport;
pub use session::{Effect, Session};

#[cfg(target_arch = "wasm32")]
pub use web::PongClient;

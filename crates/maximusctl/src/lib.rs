//! Maximusctl library: module sessions, strategies, timers and the canvas.
//!
//! The binary in `main.rs` is a thin line-driven front end over these.

pub mod canvas;
pub mod modules;
pub mod session;
pub mod shell;
pub mod timer;

pub use session::{SessionController, SessionError, SessionState};

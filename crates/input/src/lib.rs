//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events to the engine's [`InputEvent`](crate::types::InputEvent)
//! presses and releases, and synthesizes releases for terminals that never
//! send them.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::InputHandler;
pub use map::{map_key, should_quit, to_input_event};

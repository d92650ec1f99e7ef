//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It avoids
//! widget/layout libraries and instead renders a [`GameSnapshot`](crate::core::GameSnapshot)
//! into a simple framebuffer that is then flushed to the terminal.
//!
//! - [`GameView`] is pure: snapshot in, framebuffer out
//! - [`Screen`] owns the terminal and repaints only the changed span of each row
//! - Board cells are 2 characters wide by default to keep blocks square

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, FrameBuffer, Rgb, Style};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_rows, Screen};

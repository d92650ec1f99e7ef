//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides how the game plays lives here: the grid of locked
//! blocks, the falling piece, the 7-bag queue, scoring and levels, and the
//! timers that drive gravity and input guards. There is no terminal, no
//! clock and no I/O in this crate; the caller feeds input events and elapsed
//! milliseconds into [`Engine::step`] and reads the state back.
//!
//! # Module Structure
//!
//! - [`grid`]: field of locked blocks, collision rule, cascading row clear
//! - [`piece`]: the falling tetromino, movement, pivot rotation, hard drop
//! - [`bag`]: 7-bag randomizer and the three-deep preview queue
//! - [`scoring`]: score table, level-ups and the gravity curve
//! - [`timer`]: polled one-shot / repeating timers
//! - [`engine`]: one game wired together, advanced by [`Engine::step`]
//! - [`config`]: rule set and shape catalog, loadable from JSON
//! - [`snapshot`]: plain-data copy of the state for views
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Engine, EngineConfig, ScoreLog, ShapeQueue};
//! use blockfall_core::types::{Control, InputEvent};
//!
//! let mut engine =
//!     Engine::new(EngineConfig::default(), ShapeQueue::seeded(12345), ScoreLog::new()).unwrap();
//!
//! // Input is ignored for the first 300ms.
//! engine.step(&[], 300);
//! engine.step(&[InputEvent::Press(Control::HardDrop)], 16);
//!
//! assert!(engine.score() > 0); // hard drop awards points
//! assert_eq!(engine.pieces(), 2);
//! ```
//!
//! # Timing
//!
//! - **Gravity**: 200ms per row at level 1, times 0.9 per level
//! - **Soft drop**: 0.3 × the current gravity interval while held
//! - **Guards**: 200ms between repeats of move, rotate and hard drop
//! - **Input lock**: 300ms after the game starts

pub mod bag;
pub mod config;
pub mod engine;
pub mod grid;
pub mod piece;
pub mod scoring;
pub mod snapshot;
pub mod timer;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use bag::{Bag, ShapeQueue, ShapeSource};
pub use config::{ConfigError, EngineConfig, ShapeCatalog, ShapeSpec};
pub use engine::{Engine, GameOverReason, TimerAction};
pub use grid::{Block, Grid};
pub use piece::Piece;
pub use scoring::{NoopSink, ScoreLog, ScoreSink, ScoreTracker};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use timer::Timer;

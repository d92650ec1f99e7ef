//! Read-only copy of the engine state for views.
//!
//! [`Engine::snapshot_into`](crate::Engine::snapshot_into) refills an existing
//! snapshot so a frame loop can keep reusing one allocation.

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Pos, Rgb, ScoreUpdate, ShapeKind, PREVIEW_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub color: Rgb,
    pub blocks: [Pos; 4],
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind(),
            color: value.color(),
            blocks: *value.blocks(),
        }
    }
}

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSnapshot {
    pub rows: u16,
    pub columns: u16,
    /// Row-major locked cells.
    pub cells: Vec<Option<Rgb>>,
    pub active: Option<ActiveSnapshot>,
    pub ghost: ArrayVec<Pos, 4>,
    pub next: ArrayVec<ShapeKind, PREVIEW_LEN>,
    pub pieces: u32,
    pub game_over: bool,
    pub score: ScoreUpdate,
}

impl GameSnapshot {
    /// Locked cell at `(row, col)`; `None` when empty or off the field.
    pub fn cell(&self, row: i32, col: i32) -> Option<Rgb> {
        if row < 0 || col < 0 || row >= i32::from(self.rows) || col >= i32::from(self.columns) {
            return None;
        }
        self.cells[row as usize * usize::from(self.columns) + col as usize]
    }
}

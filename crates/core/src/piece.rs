//! Piece module - the falling tetromino
//!
//! A piece is four absolute block positions plus its kind and color. Every
//! movement builds the four candidate positions first and commits them only if
//! all of them pass [`Grid::fits`]; a rejected move leaves the piece untouched.
//!
//! Rotation turns every block 90° around block 0 (`(x, y) -> (-y, x)` in
//! column/row space). There are no wall kicks: a rotation that collides is
//! simply refused.

use arrayvec::ArrayVec;

use crate::config::ShapeCatalog;
use crate::grid::Grid;
use crate::types::{Offset, Pos, Rgb, ShapeKind};

/// The active falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: ShapeKind,
    color: Rgb,
    blocks: [Pos; 4],
}

impl Piece {
    /// Place a new piece of `kind` at its catalog offsets shifted by `origin`.
    pub fn spawn(kind: ShapeKind, catalog: &ShapeCatalog, origin: Offset) -> Self {
        let spec = catalog.get(kind);
        Self {
            kind,
            color: spec.color,
            blocks: spec
                .offsets
                .map(|o| Pos::new(origin.row + o.row, origin.col + o.col)),
        }
    }

    /// Build a piece from explicit block positions (block 0 is the pivot).
    pub fn from_blocks(kind: ShapeKind, color: Rgb, blocks: [Pos; 4]) -> Self {
        Self {
            kind,
            color,
            blocks,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn blocks(&self) -> &[Pos; 4] {
        &self.blocks
    }

    fn shifted(&self, d_row: i32, d_col: i32) -> [Pos; 4] {
        self.blocks.map(|p| p.offset(d_row, d_col))
    }

    fn try_commit(&mut self, candidate: [Pos; 4], grid: &Grid) -> bool {
        if grid.fits(&candidate) {
            self.blocks = candidate;
            true
        } else {
            log::trace!("{:?} move to {:?} rejected", self.kind, candidate);
            false
        }
    }

    /// Shift sideways by `dx` columns if nothing is in the way.
    pub fn move_horizontal(&mut self, dx: i32, grid: &Grid) -> bool {
        self.try_commit(self.shifted(0, dx), grid)
    }

    /// Move down one row. `false` means the piece is resting and must lock.
    pub fn move_down(&mut self, grid: &Grid) -> bool {
        self.try_commit(self.shifted(1, 0), grid)
    }

    /// How many rows the piece can fall before it rests.
    pub fn drop_distance(&self, grid: &Grid) -> i32 {
        let mut distance = 0;
        while grid.fits(&self.shifted(distance + 1, 0)) {
            distance += 1;
        }
        distance
    }

    /// Move straight to the resting position and return the distance fallen.
    pub fn hard_drop(&mut self, grid: &Grid) -> i32 {
        let distance = self.drop_distance(grid);
        self.blocks = self.shifted(distance, 0);
        distance
    }

    /// Rotate 90° around block 0. The square never rotates.
    pub fn rotate(&mut self, grid: &Grid) -> bool {
        if self.kind == ShapeKind::O {
            return false;
        }
        let pivot = self.blocks[0];
        let candidate = self.blocks.map(|p| {
            let x = p.col - pivot.col;
            let y = p.row - pivot.row;
            Pos::new(pivot.row + x, pivot.col - y)
        });
        self.try_commit(candidate, grid)
    }

    /// Where the piece would come to rest, skipping blocks still above the field.
    pub fn shadow(&self, grid: &Grid) -> ArrayVec<Pos, 4> {
        let distance = self.drop_distance(grid);
        self.shifted(distance, 0)
            .into_iter()
            .filter(|p| p.row >= 0)
            .collect()
    }

    /// Whether any on-field block sits on a locked cell.
    pub fn overlaps(&self, grid: &Grid) -> bool {
        self.blocks
            .iter()
            .any(|p| p.row >= 0 && grid.is_occupied(p.row, p.col))
    }

    /// Whether any block is still above the visible field.
    pub fn is_above_field(&self) -> bool {
        self.blocks.iter().any(|p| p.row < 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(kind: ShapeKind) -> Piece {
        Piece::spawn(kind, &ShapeCatalog::default(), Offset::new(5, -1))
    }

    #[test]
    fn test_spawn_applies_origin() {
        let piece = spawn(ShapeKind::T);
        assert_eq!(
            piece.blocks(),
            &[
                Pos::new(-1, 5),
                Pos::new(-1, 4),
                Pos::new(-1, 6),
                Pos::new(-2, 5)
            ]
        );
        assert!(piece.is_above_field());
    }

    #[test]
    fn test_rotate_turns_around_first_block() {
        let grid = Grid::new(20, 10);
        let mut piece = Piece::from_blocks(
            ShapeKind::T,
            Rgb::default(),
            [
                Pos::new(5, 5),
                Pos::new(5, 4),
                Pos::new(5, 6),
                Pos::new(4, 5),
            ],
        );
        assert!(piece.rotate(&grid));
        // (col -1, row 0) -> (col 0, row -1); (col 0, row -1) -> (col 1, row 0)
        assert_eq!(
            piece.blocks(),
            &[
                Pos::new(5, 5),
                Pos::new(4, 5),
                Pos::new(6, 5),
                Pos::new(5, 6)
            ]
        );
    }

    #[test]
    fn test_four_rotations_return_home() {
        let grid = Grid::new(20, 10);
        let mut piece = Piece::spawn(ShapeKind::L, &ShapeCatalog::default(), Offset::new(5, 10));
        let start = *piece.blocks();
        for _ in 0..4 {
            assert!(piece.rotate(&grid));
        }
        assert_eq!(piece.blocks(), &start);
    }

    #[test]
    fn test_square_never_rotates() {
        let grid = Grid::new(20, 10);
        let mut piece = spawn(ShapeKind::O);
        let before = piece;
        assert!(!piece.rotate(&grid));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_move_down_stops_at_floor() {
        let grid = Grid::new(4, 10);
        let mut piece = spawn(ShapeKind::I);
        let mut moves = 0;
        while piece.move_down(&grid) {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert!(piece.blocks().iter().all(|p| p.row == 3));
    }

    #[test]
    fn test_shadow_skips_rows_above_field() {
        let grid = Grid::from_picture(&["....####..", ".........."], Rgb::default());
        let piece = spawn(ShapeKind::I);
        // Resting on row 0 already, so the bar stays at row -1.
        assert_eq!(piece.drop_distance(&grid), 0);
        assert!(piece.shadow(&grid).is_empty());
        assert!(!piece.overlaps(&grid));
    }
}

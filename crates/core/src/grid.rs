//! Grid module - the field of locked blocks
//!
//! Cells are stored in a flat row-major vector. Only locked blocks ever occupy
//! a cell; the falling piece is checked against the grid but never written
//! into it until it locks.
//!
//! Coordinates are `(row, col)`. Rows above the field (negative) are treated as
//! empty by the collision rule so pieces can spawn partly hidden.

use crate::types::{Pos, Rgb};

/// A locked block as used by the clear pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub pos: Pos,
    pub color: Rgb,
}

/// The field of locked blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: u16,
    columns: u16,
    /// Row-major cells (row * columns + col).
    cells: Vec<Option<Rgb>>,
}

impl Grid {
    pub fn new(rows: u16, columns: u16) -> Self {
        Self {
            rows,
            columns,
            cells: vec![None; usize::from(rows) * usize::from(columns)],
        }
    }

    /// Build a grid from a picture, one string per row from the top:
    /// `#` is a locked block of `color`, anything else is empty.
    ///
    /// ```
    /// use blockfall_core::Grid;
    /// use blockfall_core::types::Rgb;
    ///
    /// let grid = Grid::from_picture(&["....", "#..#"], Rgb::new(1, 1, 1));
    /// assert_eq!((grid.rows(), grid.columns()), (2, 4));
    /// assert!(grid.is_occupied(1, 3));
    /// ```
    pub fn from_picture(picture: &[&str], color: Rgb) -> Self {
        let columns = picture.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(picture.len() as u16, columns as u16);
        for (row, line) in picture.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == '#' {
                    grid.place(row as i32, col as i32, color);
                }
            }
        }
        grid
    }

    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row >= i32::from(self.rows) || col >= i32::from(self.columns) {
            return None;
        }
        Some(row as usize * usize::from(self.columns) + col as usize)
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Color of the block at `(row, col)`, `None` if empty or off the field.
    pub fn cell(&self, row: i32, col: i32) -> Option<Rgb> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Whether a locked block sits at `(row, col)`. Off-field is never occupied.
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.cell(row, col).is_some()
    }

    /// Collision rule for a single block position.
    ///
    /// The column must be on the field and the row above the floor; rows above
    /// the field are free, rows on the field must be empty.
    pub fn is_free(&self, pos: Pos) -> bool {
        if pos.col < 0 || pos.col >= i32::from(self.columns) || pos.row >= i32::from(self.rows) {
            return false;
        }
        pos.row < 0 || !self.is_occupied(pos.row, pos.col)
    }

    /// All-or-nothing collision check for a candidate piece.
    pub fn fits(&self, positions: &[Pos]) -> bool {
        positions.iter().all(|&p| self.is_free(p))
    }

    /// Lock a block into `(row, col)`. Returns false when off the field.
    pub fn place(&mut self, row: i32, col: i32, color: Rgb) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = Some(color);
                true
            }
            None => false,
        }
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= usize::from(self.rows) {
            return false;
        }
        let width = usize::from(self.columns);
        let start = row * width;
        self.cells[start..start + width].iter().all(Option::is_some)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn cells(&self) -> &[Option<Rgb>] {
        &self.cells
    }

    /// Rows from top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Option<Rgb>]> {
        self.cells.chunks(usize::from(self.columns).max(1))
    }

    /// Every locked block, top-left to bottom-right.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        let width = usize::from(self.columns);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|color| Block {
                pos: Pos::new((i / width) as i32, (i % width) as i32),
                color,
            })
        })
    }

    /// Remove every full row and let the blocks above fall, returning how many
    /// rows were removed.
    ///
    /// Full rows are handled top to bottom. Each one drops its own blocks and
    /// then pushes every surviving block above it down by one, so a block above
    /// two full rows moves two rows. The grid is rebuilt from the surviving
    /// blocks afterwards.
    pub fn clear_full_rows_and_shift(&mut self) -> usize {
        let full_rows: Vec<i32> = (0..usize::from(self.rows))
            .filter(|&row| self.is_row_full(row))
            .map(|row| row as i32)
            .collect();
        if full_rows.is_empty() {
            return 0;
        }

        let mut live: Vec<Block> = self.blocks().collect();
        for &full in &full_rows {
            // Blocks above an earlier full row land at most on that row, so
            // nothing has been pushed into `full` yet.
            live.retain(|b| b.pos.row != full);
            for block in live.iter_mut().filter(|b| b.pos.row < full) {
                block.pos.row += 1;
            }
        }

        self.cells.fill(None);
        for block in live.into_iter().filter(|b| b.pos.row >= 0) {
            self.place(block.pos.row, block.pos.col, block.color);
        }

        full_rows.len()
    }
}

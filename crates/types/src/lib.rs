//! Core types module - shared data structures and constants
//!
//! Everything in here is plain data: it is shared by the simulation core, the
//! input mapping and the terminal view without pulling any of them in.
//!
//! # Coordinates
//!
//! Positions are `(row, col)` with row 0 at the top of the visible field and
//! rows growing downwards. Rows may be negative while a freshly spawned piece
//! is still above the field.
//!
//! # Default rules
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_COLUMNS` | 10 | Field width |
//! | `DEFAULT_ROWS` | 20 | Field height |
//! | `DEFAULT_GRAVITY_MS` | 200 | Gravity interval at level 1 |
//! | `DEFAULT_GUARD_MS` | 200 | Move / rotate / hard-drop repeat guard |
//! | `DEFAULT_INPUT_LOCK_MS` | 300 | Input grace period after start |
//! | `PREVIEW_LEN` | 3 | Length of the next-piece lookahead |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Pos, ShapeKind};
//!
//! assert_eq!(ShapeKind::from_str("t"), Some(ShapeKind::T));
//! assert_eq!(ShapeKind::ALL.len(), 7);
//!
//! let p = Pos::new(3, 4).offset(1, -1);
//! assert_eq!(p, Pos::new(4, 3));
//! ```

use serde::{Deserialize, Serialize};

/// Default field width in cells.
pub const DEFAULT_COLUMNS: u16 = 10;

/// Default field height in cells.
pub const DEFAULT_ROWS: u16 = 20;

/// Gravity interval at level 1 in milliseconds.
pub const DEFAULT_GRAVITY_MS: u32 = 200;

/// Soft drop runs gravity at this fraction of the level interval.
pub const DEFAULT_SOFT_DROP_FACTOR: f64 = 0.3;

/// Soft-drop multiplier once the first level-up has happened.
pub const DEFAULT_LEVEL_SOFT_DROP_FACTOR: f64 = 0.8;

/// Gravity interval multiplier applied on each level-up.
pub const DEFAULT_LEVEL_DECAY: f64 = 0.9;

/// A level-up happens once cumulative lines reach `level * LINES_PER_LEVEL`.
pub const DEFAULT_LINES_PER_LEVEL: u32 = 5;

/// Repeat guard for horizontal moves, rotation and hard drop.
pub const DEFAULT_GUARD_MS: u32 = 200;

/// Input is ignored for this long after an engine is created.
pub const DEFAULT_INPUT_LOCK_MS: u32 = 300;

/// Points per row of hard-drop distance.
pub const DEFAULT_HARD_DROP_POINTS: u32 = 2;

/// Base points for clearing 1, 2, 3 and 4 rows at once (multiplied by level).
pub const DEFAULT_LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

/// Number of upcoming kinds kept in the lookahead queue.
pub const PREVIEW_LEN: usize = 3;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    /// Every kind, in catalog order.
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Position of this kind in [`ShapeKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            ShapeKind::I => 0,
            ShapeKind::O => 1,
            ShapeKind::T => 2,
            ShapeKind::S => 3,
            ShapeKind::Z => 4,
            ShapeKind::J => 5,
            ShapeKind::L => 6,
        }
    }

    /// Parse a kind from its letter (case-insensitive).
    ///
    /// ```
    /// use blockfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "o" => Some(ShapeKind::O),
            "t" => Some(ShapeKind::T),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "I",
            ShapeKind::O => "O",
            ShapeKind::T => "T",
            ShapeKind::S => "S",
            ShapeKind::Z => "Z",
            ShapeKind::J => "J",
            ShapeKind::L => "L",
        }
    }
}

/// 24-bit RGB color of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// A cell position in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

/// A block offset relative to a shape's origin, written `[col, row]` in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Offset {
    pub col: i32,
    pub row: i32,
}

impl Offset {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl From<[i32; 2]> for Offset {
    fn from([col, row]: [i32; 2]) -> Self {
        Self { col, row }
    }
}

impl From<Offset> for [i32; 2] {
    fn from(o: Offset) -> Self {
        [o.col, o.row]
    }
}

/// Logical controls the engine understands.
///
/// The engine tracks which controls are held; `Left`, `Right`, `Rotate` and
/// `HardDrop` fire on press, `SoftDrop` is active while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Rotate,
    SoftDrop,
    HardDrop,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Left,
        Control::Right,
        Control::Rotate,
        Control::SoftDrop,
        Control::HardDrop,
    ];

    pub fn index(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
            Control::Rotate => 2,
            Control::SoftDrop => 3,
            Control::HardDrop => 4,
        }
    }

    /// Parse a control from its camelCase name.
    ///
    /// ```
    /// use blockfall_types::Control;
    ///
    /// assert_eq!(Control::from_str("hardDrop"), Some(Control::HardDrop));
    /// assert_eq!(Control::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Control::Left),
            "right" => Some(Control::Right),
            "rotate" => Some(Control::Rotate),
            "softdrop" => Some(Control::SoftDrop),
            "harddrop" => Some(Control::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Left => "left",
            Control::Right => "right",
            Control::Rotate => "rotate",
            Control::SoftDrop => "softDrop",
            Control::HardDrop => "hardDrop",
        }
    }
}

/// An abstract input event delivered to the engine each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Press(Control),
    Release(Control),
}

/// Score state reported to the score sink after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoreUpdate {
    pub lines: u32,
    pub score: u32,
    pub level: u32,
}

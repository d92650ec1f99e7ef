//! Engine configuration - board size, timing, scoring and the shape catalog
//!
//! Everything the rules depend on lives in one immutable [`EngineConfig`]
//! value handed to the engine at construction. Defaults reproduce the classic
//! ruleset; any field can be overridden from JSON:
//!
//! ```
//! use blockfall_core::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "rows": 24, "gravity_ms": 500 }"#).unwrap();
//! assert_eq!(config.rows, 24);
//! assert_eq!(config.columns, 10);
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::types::*;

/// Largest accepted board dimension.
pub const MAX_DIMENSION: u16 = 1024;

/// Largest distance, per axis, of a catalog block from its pivot.
pub const MAX_SHAPE_REACH: i32 = 4;

/// Configuration problems detected before an engine is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("shape catalog has no entry for {0:?}")]
    MissingShape(ShapeKind),

    #[error("shape {kind:?} lists block offset [{col}, {row}] more than once")]
    DuplicateOffset { kind: ShapeKind, col: i32, row: i32 },

    #[error("board must be between 1x1 and {max}x{max} cells, got {columns}x{rows}", max = MAX_DIMENSION)]
    BadDimensions { columns: u16, rows: u16 },

    #[error("shape {kind:?} block offset [{col}, {row}] is more than {max} cells from the pivot", max = MAX_SHAPE_REACH)]
    OffsetOutOfRange { kind: ShapeKind, col: i32, row: i32 },

    #[error("spawn offset [{col}, {row}] must lie in columns 0..{columns} and rows -{rows}..{rows}")]
    SpawnOffsetOutOfRange {
        col: i32,
        row: i32,
        columns: u16,
        rows: u16,
    },

    #[error("shape {kind:?} spawns a block at ({row}, {col}), outside a {columns}x{rows} board")]
    SpawnOutOfBounds {
        kind: ShapeKind,
        row: i32,
        col: i32,
        columns: u16,
        rows: u16,
    },

    #[error("{name} must be in (0, 1], got {value}")]
    BadFactor { name: &'static str, value: f64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("grid is {grid_columns}x{grid_rows} but the config asks for {columns}x{rows}")]
    GridMismatch {
        grid_columns: u16,
        grid_rows: u16,
        columns: u16,
        rows: u16,
    },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One catalog entry: four block offsets and a color.
///
/// Block 0 is the rotation pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ShapeSpec {
    pub offsets: [Offset; 4],
    pub color: Rgb,
}

/// Offsets and colors for all seven kinds.
///
/// Built from a map so a configuration that forgets a kind is rejected while
/// loading instead of when that kind is first drawn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<ShapeKind, ShapeSpec>")]
pub struct ShapeCatalog {
    specs: [ShapeSpec; 7],
}

impl ShapeCatalog {
    pub fn get(&self, kind: ShapeKind) -> &ShapeSpec {
        &self.specs[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeKind, &ShapeSpec)> {
        ShapeKind::ALL.into_iter().zip(self.specs.iter())
    }
}

impl TryFrom<BTreeMap<ShapeKind, ShapeSpec>> for ShapeCatalog {
    type Error = ConfigError;

    fn try_from(mut map: BTreeMap<ShapeKind, ShapeSpec>) -> Result<Self, Self::Error> {
        let mut specs = [ShapeSpec {
            offsets: [Offset::default(); 4],
            color: Rgb::default(),
        }; 7];
        for kind in ShapeKind::ALL {
            specs[kind.index()] = map.remove(&kind).ok_or(ConfigError::MissingShape(kind))?;
        }
        Ok(Self { specs })
    }
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        let spec = |offsets: [(i32, i32); 4], color: Rgb| ShapeSpec {
            offsets: offsets.map(|(col, row)| Offset::new(col, row)),
            color,
        };
        // Indexed by ShapeKind::index(): I O T S Z J L.
        Self {
            specs: [
                spec([(0, 0), (-1, 0), (1, 0), (2, 0)], Rgb::new(108, 198, 217)),
                spec([(0, 0), (0, -1), (1, 0), (1, -1)], Rgb::new(241, 230, 13)),
                spec([(0, 0), (-1, 0), (1, 0), (0, -1)], Rgb::new(123, 33, 127)),
                spec([(0, 0), (-1, 0), (0, -1), (1, -1)], Rgb::new(101, 179, 46)),
                spec([(0, 0), (1, 0), (0, -1), (-1, -1)], Rgb::new(229, 27, 32)),
                spec([(0, 0), (0, -1), (0, 1), (-1, 1)], Rgb::new(32, 75, 155)),
                spec([(0, 0), (0, -1), (0, 1), (1, 1)], Rgb::new(240, 126, 19)),
            ],
        }
    }
}

/// Immutable rule set for one engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub columns: u16,
    pub rows: u16,
    /// Shared spawn offset; `None` means column `columns / 2`, row -1.
    pub spawn_offset: Option<Offset>,
    pub gravity_ms: u32,
    pub soft_drop_factor: f64,
    /// Replaces `soft_drop_factor` once the level is above 1.
    pub level_soft_drop_factor: f64,
    pub level_decay: f64,
    pub lines_per_level: u32,
    pub line_scores: [u32; 4],
    pub hard_drop_points: u32,
    pub move_guard_ms: u32,
    pub rotate_guard_ms: u32,
    pub hard_drop_guard_ms: u32,
    pub input_lock_ms: u32,
    /// Let a held key fire again once its guard expires instead of waiting
    /// for a release.
    pub hold_to_repeat: bool,
    pub shapes: ShapeCatalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            spawn_offset: None,
            gravity_ms: DEFAULT_GRAVITY_MS,
            soft_drop_factor: DEFAULT_SOFT_DROP_FACTOR,
            level_soft_drop_factor: DEFAULT_LEVEL_SOFT_DROP_FACTOR,
            level_decay: DEFAULT_LEVEL_DECAY,
            lines_per_level: DEFAULT_LINES_PER_LEVEL,
            line_scores: DEFAULT_LINE_SCORES,
            hard_drop_points: DEFAULT_HARD_DROP_POINTS,
            move_guard_ms: DEFAULT_GUARD_MS,
            rotate_guard_ms: DEFAULT_GUARD_MS,
            hard_drop_guard_ms: DEFAULT_GUARD_MS,
            input_lock_ms: DEFAULT_INPUT_LOCK_MS,
            hold_to_repeat: false,
            shapes: ShapeCatalog::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration. Missing fields keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same rules with a different board size.
    pub fn with_size(mut self, columns: u16, rows: u16) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn spawn_offset(&self) -> Offset {
        self.spawn_offset
            .unwrap_or(Offset::new(i32::from(self.columns) / 2, -1))
    }

    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.gravity_ms))
    }

    pub fn input_lock(&self) -> Duration {
        Duration::from_millis(u64::from(self.input_lock_ms))
    }

    /// Check every rule the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DIMENSION).contains(&self.columns) || !(1..=MAX_DIMENSION).contains(&self.rows)
        {
            return Err(ConfigError::BadDimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.gravity_ms == 0 {
            return Err(ConfigError::Zero("gravity_ms"));
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::Zero("lines_per_level"));
        }
        check_factor("soft_drop_factor", self.soft_drop_factor)?;
        check_factor("level_soft_drop_factor", self.level_soft_drop_factor)?;
        check_factor("level_decay", self.level_decay)?;

        let origin = self.spawn_offset();
        let (columns, rows) = (i32::from(self.columns), i32::from(self.rows));
        if !(0..columns).contains(&origin.col) || !(-rows..rows).contains(&origin.row) {
            return Err(ConfigError::SpawnOffsetOutOfRange {
                col: origin.col,
                row: origin.row,
                columns: self.columns,
                rows: self.rows,
            });
        }
        for (kind, spec) in self.shapes.iter() {
            for (i, a) in spec.offsets.iter().enumerate() {
                let reach = -MAX_SHAPE_REACH..=MAX_SHAPE_REACH;
                if !reach.contains(&a.col) || !reach.contains(&a.row) {
                    return Err(ConfigError::OffsetOutOfRange {
                        kind,
                        col: a.col,
                        row: a.row,
                    });
                }
                if spec.offsets[..i].contains(a) {
                    return Err(ConfigError::DuplicateOffset {
                        kind,
                        col: a.col,
                        row: a.row,
                    });
                }
                let row = origin.row + a.row;
                let col = origin.col + a.col;
                if col < 0 || col >= columns || row >= rows {
                    return Err(ConfigError::SpawnOutOfBounds {
                        kind,
                        row,
                        col,
                        columns: self.columns,
                        rows: self.rows,
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_factor(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::BadFactor { name, value })
    }
}

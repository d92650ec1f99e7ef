//! Scoring module - score, lines, level and the gravity curve
//!
//! Line clears score `table[lines] * level`. Every `lines_per_level * level`
//! cumulative lines the level goes up by one and gravity gets faster by the
//! decay factor. The check runs once per clear, so a big clear that crosses
//! two thresholds still only gains one level.
//!
//! Hard drops add a flat bonus that ignores the level.

use std::time::Duration;

use crate::config::EngineConfig;
use crate::types::ScoreUpdate;

/// Receives the `(lines, score, level)` triple after every score change.
///
/// Called synchronously from inside an engine step; implementations must not
/// call back into the engine.
pub trait ScoreSink {
    fn on_score(&mut self, update: ScoreUpdate);
}

impl<F: FnMut(ScoreUpdate)> ScoreSink for F {
    fn on_score(&mut self, update: ScoreUpdate) {
        self(update)
    }
}

/// Sink that drops every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ScoreSink for NoopSink {
    fn on_score(&mut self, _update: ScoreUpdate) {}
}

/// Sink that keeps every update it receives.
#[derive(Debug, Clone, Default)]
pub struct ScoreLog {
    updates: Vec<ScoreUpdate>,
}

impl ScoreLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[ScoreUpdate] {
        &self.updates
    }

    pub fn last(&self) -> Option<ScoreUpdate> {
        self.updates.last().copied()
    }
}

impl ScoreSink for ScoreLog {
    fn on_score(&mut self, update: ScoreUpdate) {
        self.updates.push(update);
    }
}

/// Points for clearing `lines` rows at once on `level`.
///
/// Counts above four (only possible on a hand-built field) use the four-row
/// entry.
pub fn line_clear_points(table: &[u32; 4], lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    table[lines.min(4) - 1].saturating_mul(level)
}

/// Flat hard-drop bonus for falling `distance` rows.
pub fn hard_drop_points(distance: u32, per_row: u32) -> u32 {
    distance.saturating_mul(per_row)
}

fn millis(ms: f64) -> Duration {
    Duration::from_micros((ms * 1000.0).round() as u64)
}

/// Result of a line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    pub update: ScoreUpdate,
    pub points: u32,
    pub leveled_up: bool,
}

/// Owns score, lines, level and the gravity intervals derived from level.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTracker {
    level: u32,
    score: u32,
    lines: u32,
    /// Level gravity in milliseconds; kept fractional so repeated decay
    /// does not accumulate rounding.
    gravity_ms: f64,
    soft_drop_factor: f64,
    level_soft_drop_factor: f64,
    level_decay: f64,
    lines_per_level: u32,
    line_scores: [u32; 4],
    hard_drop_points: u32,
}

impl ScoreTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            level: 1,
            score: 0,
            lines: 0,
            gravity_ms: f64::from(config.gravity_ms),
            soft_drop_factor: config.soft_drop_factor,
            level_soft_drop_factor: config.level_soft_drop_factor,
            level_decay: config.level_decay,
            lines_per_level: config.lines_per_level,
            line_scores: config.line_scores,
            hard_drop_points: config.hard_drop_points,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn state(&self) -> ScoreUpdate {
        ScoreUpdate {
            lines: self.lines,
            score: self.score,
            level: self.level,
        }
    }

    /// Gravity interval for the current level.
    pub fn gravity_interval(&self) -> Duration {
        millis(self.gravity_ms)
    }

    /// Gravity interval while soft drop is held.
    ///
    /// Level 1 uses the start factor; every later level uses the level factor.
    pub fn soft_drop_interval(&self) -> Duration {
        let factor = if self.level > 1 {
            self.level_soft_drop_factor
        } else {
            self.soft_drop_factor
        };
        millis(self.gravity_ms * factor)
    }

    /// Score a clear of `lines` rows and apply at most one level-up.
    pub fn on_lines_cleared(&mut self, lines: usize) -> ClearOutcome {
        let points = line_clear_points(&self.line_scores, lines, self.level);
        self.lines = self.lines.saturating_add(lines as u32);
        self.score = self.score.saturating_add(points);

        let leveled_up = self.lines >= self.level.saturating_mul(self.lines_per_level);
        if leveled_up {
            self.level += 1;
            self.gravity_ms *= self.level_decay;
            log::info!("level {} reached, gravity {:.1}ms", self.level, self.gravity_ms);
        }

        ClearOutcome {
            update: self.state(),
            points,
            leveled_up,
        }
    }

    /// Add the hard-drop bonus for falling `distance` rows.
    pub fn on_hard_drop(&mut self, distance: u32) -> ScoreUpdate {
        self.score = self
            .score
            .saturating_add(hard_drop_points(distance, self.hard_drop_points));
        self.state()
    }
}

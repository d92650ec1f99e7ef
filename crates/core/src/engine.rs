//! Engine module - one game, advanced one step at a time
//!
//! The engine owns the grid, the active piece, the score tracker and every
//! timer. A step applies the step's input events, advances the clock and
//! updates the timers, which may fire a gravity tick and with it the whole
//! lock → clear → score → spawn → game-over chain. Nothing blocks and nothing
//! runs between steps.
//!
//! Game over freezes the engine for good. Restarting means building a new
//! engine, usually from [`Engine::into_parts`] so the same bag keeps going.

use std::time::Duration;

use arrayvec::ArrayVec;

use crate::bag::ShapeSource;
use crate::config::{ConfigError, EngineConfig};
use crate::grid::Grid;
use crate::piece::Piece;
use crate::scoring::{ScoreSink, ScoreTracker};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::timer::Timer;
use crate::types::*;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Gravity,
    UnlockInput,
}

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// A piece locked with a block still above the field.
    LockOut,
    /// A new piece spawned on top of locked blocks.
    BlockOut,
}

#[derive(Debug, Clone)]
struct Timers {
    gravity: Timer<TimerAction>,
    horizontal: Timer<TimerAction>,
    rotate: Timer<TimerAction>,
    hard_drop: Timer<TimerAction>,
    input_lock: Timer<TimerAction>,
}

impl Timers {
    fn new(config: &EngineConfig, gravity: Duration) -> Self {
        let ms = |v: u32| Duration::from_millis(u64::from(v));
        Self {
            gravity: Timer::repeating(gravity, TimerAction::Gravity),
            horizontal: Timer::one_shot(ms(config.move_guard_ms)),
            rotate: Timer::one_shot(ms(config.rotate_guard_ms)),
            hard_drop: Timer::one_shot(ms(config.hard_drop_guard_ms)),
            input_lock: Timer::new(config.input_lock(), false, Some(TimerAction::UnlockInput)),
        }
    }

    fn all_mut(&mut self) -> [&mut Timer<TimerAction>; 5] {
        [
            &mut self.gravity,
            &mut self.horizontal,
            &mut self.rotate,
            &mut self.hard_drop,
            &mut self.input_lock,
        ]
    }

    fn guard(&self, control: Control) -> Option<&Timer<TimerAction>> {
        match control {
            Control::Left | Control::Right => Some(&self.horizontal),
            Control::Rotate => Some(&self.rotate),
            Control::HardDrop => Some(&self.hard_drop),
            Control::SoftDrop => None,
        }
    }
}

/// A running game.
///
/// `S` supplies the kind of each new piece, `K` receives score updates.
pub struct Engine<S, K> {
    config: EngineConfig,
    grid: Grid,
    piece: Piece,
    scores: ScoreTracker,
    shapes: S,
    sink: K,
    timers: Timers,
    /// Time advanced so far, the clock every timer runs on.
    now: Duration,
    input_locked: bool,
    held: [bool; 5],
    /// Set when a control fires; cleared on release.
    latched: [bool; 5],
    soft_dropping: bool,
    game_over: Option<GameOverReason>,
    pieces: u32,
}

impl<S: ShapeSource, K: ScoreSink> Engine<S, K> {
    /// Validate `config` and start a game on an empty grid.
    pub fn new(config: EngineConfig, shapes: S, sink: K) -> Result<Self, ConfigError> {
        let grid = Grid::new(config.rows, config.columns);
        Self::with_grid(config, grid, shapes, sink)
    }

    /// Start a game on a prepared grid.
    ///
    /// The first piece is spawned immediately, so a grid whose spawn area is
    /// already filled produces an engine that is over from the start.
    pub fn with_grid(
        config: EngineConfig,
        grid: Grid,
        mut shapes: S,
        sink: K,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.rows() != config.rows || grid.columns() != config.columns {
            return Err(ConfigError::GridMismatch {
                grid_columns: grid.columns(),
                grid_rows: grid.rows(),
                columns: config.columns,
                rows: config.rows,
            });
        }

        let scores = ScoreTracker::new(&config);
        let mut timers = Timers::new(&config, scores.gravity_interval());
        timers.gravity.activate(Duration::ZERO);
        timers.input_lock.activate(Duration::ZERO);

        let kind = shapes.next_shape();
        let piece = Piece::spawn(kind, &config.shapes, config.spawn_offset());

        let mut engine = Self {
            config,
            grid,
            piece,
            scores,
            shapes,
            sink,
            timers,
            now: Duration::ZERO,
            input_locked: true,
            held: [false; 5],
            latched: [false; 5],
            soft_dropping: false,
            game_over: None,
            pieces: 1,
        };
        log::debug!("engine started with {:?}", kind);
        if engine.piece.overlaps(&engine.grid) {
            engine.end_game(GameOverReason::BlockOut);
        }
        Ok(engine)
    }

    /// Advance the game by one frame.
    ///
    /// Input is applied first, then the clock moves forward by `elapsed_ms` and
    /// the timers run. Does nothing once the game is over.
    pub fn step(&mut self, events: &[InputEvent], elapsed_ms: u32) {
        if self.is_game_over() {
            return;
        }

        for &event in events {
            self.handle_event(event);
            if self.is_game_over() {
                return;
            }
        }
        self.poll_held_controls();
        if self.is_game_over() {
            return;
        }

        self.now += Duration::from_millis(u64::from(elapsed_ms));
        self.update_timers();
    }

    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(control) => {
                if self.held[control.index()] {
                    return;
                }
                self.held[control.index()] = true;
                if self.input_locked {
                    // Keys already down when the game starts need a fresh press.
                    self.latched[control.index()] = true;
                    return;
                }
                self.try_fire(control);
            }
            InputEvent::Release(control) => {
                self.held[control.index()] = false;
                self.latched[control.index()] = false;
                if control == Control::SoftDrop && !self.input_locked {
                    self.set_soft_drop(false);
                }
            }
        }
    }

    /// Controls still held after this step's events fire again once their
    /// guard has run out (and, unless `hold_to_repeat`, once released).
    fn poll_held_controls(&mut self) {
        if self.input_locked {
            return;
        }
        for control in Control::ALL {
            if self.held[control.index()] {
                self.try_fire(control);
                if self.is_game_over() {
                    return;
                }
            }
        }
    }

    fn try_fire(&mut self, control: Control) {
        if control == Control::SoftDrop {
            self.set_soft_drop(true);
            return;
        }
        if self.latched[control.index()] && !self.config.hold_to_repeat {
            return;
        }
        if self.timers.guard(control).is_some_and(Timer::is_active) {
            return;
        }

        match control {
            Control::Left => {
                self.piece.move_horizontal(-1, &self.grid);
                self.timers.horizontal.activate(self.now);
            }
            Control::Right => {
                self.piece.move_horizontal(1, &self.grid);
                self.timers.horizontal.activate(self.now);
            }
            Control::Rotate => {
                self.piece.rotate(&self.grid);
                self.timers.rotate.activate(self.now);
            }
            Control::HardDrop => {
                self.hard_drop();
                if !self.is_game_over() {
                    self.timers.hard_drop.activate(self.now);
                }
            }
            Control::SoftDrop => {}
        }
        self.latched[control.index()] = true;
    }

    fn set_soft_drop(&mut self, on: bool) {
        if self.soft_dropping == on {
            return;
        }
        self.soft_dropping = on;
        self.refresh_gravity();
    }

    fn refresh_gravity(&mut self) {
        let interval = if self.soft_dropping {
            self.scores.soft_drop_interval()
        } else {
            self.scores.gravity_interval()
        };
        self.timers.gravity.set_duration(interval);
    }

    fn update_timers(&mut self) {
        let now = self.now;
        if let Some(action) = self.timers.gravity.update(now) {
            self.run(action);
        }
        self.timers.horizontal.update(now);
        self.timers.rotate.update(now);
        self.timers.hard_drop.update(now);
        if let Some(action) = self.timers.input_lock.update(now) {
            self.run(action);
        }
    }

    fn run(&mut self, action: TimerAction) {
        match action {
            TimerAction::Gravity => self.gravity_tick(),
            TimerAction::UnlockInput => {
                self.input_locked = false;
                log::debug!("input unlocked");
            }
        }
    }

    fn gravity_tick(&mut self) {
        if !self.piece.move_down(&self.grid) {
            self.lock_piece();
        }
    }

    fn hard_drop(&mut self) {
        let distance = self.piece.hard_drop(&self.grid);
        let update = self.scores.on_hard_drop(distance as u32);
        self.sink.on_score(update);
        self.lock_piece();
    }

    /// Merge the piece into the grid and run the post-lock chain.
    fn lock_piece(&mut self) {
        for pos in self.piece.blocks() {
            if pos.row >= 0 {
                self.grid.place(pos.row, pos.col, self.piece.color());
            }
        }
        log::debug!("{:?} locked at {:?}", self.piece.kind(), self.piece.blocks());

        if self.piece.is_above_field() {
            self.end_game(GameOverReason::LockOut);
            return;
        }

        let cleared = self.grid.clear_full_rows_and_shift();
        if cleared > 0 {
            let outcome = self.scores.on_lines_cleared(cleared);
            log::info!("cleared {} rows for {} points", cleared, outcome.points);
            if outcome.leveled_up {
                self.refresh_gravity();
            }
            self.sink.on_score(outcome.update);
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let kind = self.shapes.next_shape();
        self.piece = Piece::spawn(kind, &self.config.shapes, self.config.spawn_offset());
        self.pieces += 1;
        log::debug!("spawned {:?} (piece {})", kind, self.pieces);
        if self.piece.overlaps(&self.grid) {
            self.end_game(GameOverReason::BlockOut);
        }
    }

    fn end_game(&mut self, reason: GameOverReason) {
        self.game_over = Some(reason);
        for timer in self.timers.all_mut() {
            timer.deactivate();
        }
        log::info!(
            "game over ({:?}) with score {} at level {}",
            reason,
            self.scores.score(),
            self.scores.level()
        );
    }
}

impl<S, K> Engine<S, K> {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Landing position of the active piece; empty once the game is over.
    pub fn ghost(&self) -> ArrayVec<Pos, 4> {
        if self.is_game_over() {
            return ArrayVec::new();
        }
        self.piece.shadow(&self.grid)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn level(&self) -> u32 {
        self.scores.level()
    }

    pub fn lines(&self) -> u32 {
        self.scores.lines()
    }

    pub fn score_state(&self) -> ScoreUpdate {
        self.scores.state()
    }

    /// Pieces spawned so far, including the current one.
    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    /// Interval the gravity timer is currently running at.
    pub fn gravity_interval(&self) -> Duration {
        self.timers.gravity.duration()
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn any_timer_active(&self) -> bool {
        let t = &self.timers;
        [&t.gravity, &t.horizontal, &t.rotate, &t.hard_drop, &t.input_lock]
            .iter()
            .any(|timer| timer.is_active())
    }

    /// Time simulated so far.
    pub fn elapsed(&self) -> Duration {
        self.now
    }

    pub fn shape_source(&self) -> &S {
        &self.shapes
    }

    pub fn score_sink(&self) -> &K {
        &self.sink
    }

    /// Give back the collaborators, e.g. to build the next game with them.
    pub fn into_parts(self) -> (S, K) {
        (self.shapes, self.sink)
    }
}

impl<S: ShapeSource, K> Engine<S, K> {
    /// Copy the renderable state into `out`, reusing its allocations.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.rows = self.grid.rows();
        out.columns = self.grid.columns();
        out.cells.clear();
        out.cells.extend_from_slice(self.grid.cells());
        out.active = Some(ActiveSnapshot::from(&self.piece));
        out.ghost = self.ghost();
        out.next.clear();
        out.next
            .extend(self.shapes.preview().iter().copied().take(PREVIEW_LEN));
        out.pieces = self.pieces;
        out.game_over = self.is_game_over();
        out.score = self.scores.state();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::ShapeQueue;
    use crate::scoring::ScoreLog;

    const C: Rgb = Rgb::new(1, 2, 3);

    fn only(kind: ShapeKind) -> impl FnMut() -> ShapeKind {
        move || kind
    }

    fn engine(kind: ShapeKind) -> Engine<impl ShapeSource, ScoreLog> {
        Engine::new(EngineConfig::default(), only(kind), ScoreLog::new()).unwrap()
    }

    fn unlock<S: ShapeSource, K: ScoreSink>(e: &mut Engine<S, K>) {
        e.step(&[], e.config().input_lock_ms);
        assert!(!e.is_input_locked());
    }

    #[test]
    fn test_new_engine_state() {
        let e = engine(ShapeKind::T);
        assert!(!e.is_game_over());
        assert!(e.is_input_locked());
        assert_eq!(e.score_state(), ScoreUpdate { lines: 0, score: 0, level: 1 });
        assert_eq!(e.piece().kind(), ShapeKind::T);
        assert_eq!(e.pieces(), 1);
        assert_eq!(e.grid().occupied_count(), 0);
    }

    #[test]
    fn test_input_ignored_while_locked() {
        let mut e = engine(ShapeKind::T);
        let before = *e.piece().blocks();
        e.step(&[InputEvent::Press(Control::Left)], 0);
        assert_eq!(e.piece().blocks(), &before);
    }

    #[test]
    fn test_key_held_through_lock_needs_fresh_press() {
        let mut e = engine(ShapeKind::T);
        e.step(&[InputEvent::Press(Control::Left)], 0);
        unlock(&mut e);
        let before = *e.piece().blocks();
        e.step(&[], 0);
        assert_eq!(e.piece().blocks(), &before);

        e.step(
            &[
                InputEvent::Release(Control::Left),
                InputEvent::Press(Control::Left),
            ],
            0,
        );
        assert_eq!(e.piece().blocks()[0].col, before[0].col - 1);
    }

    #[test]
    fn test_move_guard_blocks_fast_repeat() {
        let mut e = engine(ShapeKind::T);
        unlock(&mut e);
        let col = e.piece().blocks()[0].col;
        e.step(
            &[
                InputEvent::Press(Control::Right),
                InputEvent::Release(Control::Right),
                InputEvent::Press(Control::Right),
            ],
            0,
        );
        assert_eq!(e.piece().blocks()[0].col, col + 1);

        // The swallowed press is still held, so it fires once the guard runs out.
        e.step(&[], e.config().move_guard_ms);
        e.step(&[], 0);
        assert_eq!(e.piece().blocks()[0].col, col + 2);
        // After that it stays latched until released.
        e.step(&[], e.config().move_guard_ms);
        e.step(&[], 0);
        assert_eq!(e.piece().blocks()[0].col, col + 2);
    }

    #[test]
    fn test_hold_to_repeat_refires_after_guard() {
        let config = EngineConfig {
            hold_to_repeat: true,
            ..EngineConfig::default()
        };
        let mut e = Engine::new(config, only(ShapeKind::T), ScoreLog::new()).unwrap();
        unlock(&mut e);
        let col = e.piece().blocks()[0].col;
        e.step(&[InputEvent::Press(Control::Left)], 0);
        assert_eq!(e.piece().blocks()[0].col, col - 1);
        e.step(&[], e.config().move_guard_ms);
        e.step(&[], 0);
        assert_eq!(e.piece().blocks()[0].col, col - 2);
    }

    #[test]
    fn test_soft_drop_switches_gravity_interval() {
        let mut e = engine(ShapeKind::T);
        unlock(&mut e);
        assert_eq!(e.gravity_interval(), Duration::from_millis(200));
        e.step(&[InputEvent::Press(Control::SoftDrop)], 0);
        assert!(e.is_soft_dropping());
        assert_eq!(e.gravity_interval(), Duration::from_millis(60));
        e.step(&[InputEvent::Release(Control::SoftDrop)], 0);
        assert_eq!(e.gravity_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_gravity_moves_piece_once_per_interval() {
        let mut e = engine(ShapeKind::T);
        let row = e.piece().blocks()[0].row;
        e.step(&[], 199);
        assert_eq!(e.piece().blocks()[0].row, row);
        e.step(&[], 1);
        assert_eq!(e.piece().blocks()[0].row, row + 1);
    }

    #[test]
    fn test_hard_drop_reports_bonus_then_spawns() {
        let mut e = engine(ShapeKind::I);
        unlock(&mut e);
        let distance = 19 - e.piece().blocks()[0].row;
        e.step(&[InputEvent::Press(Control::HardDrop)], 0);
        let expected = distance as u32 * 2;
        assert_eq!(e.score(), expected);
        assert_eq!(
            e.score_sink().updates(),
            &[ScoreUpdate { lines: 0, score: expected, level: 1 }]
        );
        assert_eq!(e.pieces(), 2);
        assert!(e.grid().is_occupied(19, 4));
        assert!(e.grid().is_occupied(19, 7));
    }

    #[test]
    fn test_lock_above_field_ends_game() {
        // Column 5 filled from row 1 down leaves the vertical L no room to enter.
        let mut grid = Grid::new(20, 10);
        for row in 1..20 {
            grid.place(row, 5, C);
        }
        let mut e =
            Engine::with_grid(EngineConfig::default(), grid, only(ShapeKind::L), ScoreLog::new())
                .unwrap();
        assert!(!e.is_game_over());
        // L occupies rows -2..0 in column 5 and cannot fall.
        e.step(&[], 200);
        assert_eq!(e.game_over_reason(), Some(GameOverReason::LockOut));
        assert!(!e.any_timer_active());
        // Blocks on the field were still merged.
        assert!(e.grid().is_occupied(0, 5));
        assert!(e.grid().is_occupied(0, 6));
    }

    #[test]
    fn test_game_over_freezes_engine() {
        let mut grid = Grid::new(20, 10);
        grid.place(0, 5, C);
        let mut e =
            Engine::with_grid(EngineConfig::default(), grid, only(ShapeKind::I), ScoreLog::new())
                .unwrap();
        // The bar spawns on row -1, above the block; it locks out on the first tick.
        e.step(&[], 200);
        assert!(e.is_game_over());
        let snap = e.snapshot();
        e.step(&[InputEvent::Press(Control::Left)], 10_000);
        assert_eq!(e.snapshot(), snap);
        assert!(e.ghost().is_empty());
    }

    #[test]
    fn test_grid_size_must_match_config() {
        let err = Engine::with_grid(
            EngineConfig::default(),
            Grid::new(4, 4),
            only(ShapeKind::I),
            ScoreLog::new(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::GridMismatch { grid_rows: 4, .. }));
    }

    #[test]
    fn test_snapshot_carries_preview_and_ghost() {
        let e = Engine::new(EngineConfig::default(), ShapeQueue::seeded(9), ScoreLog::new())
            .unwrap();
        let snap = e.snapshot();
        assert_eq!(snap.next.as_slice(), e.shape_source().upcoming());
        assert_eq!(snap.ghost.len(), 4);
        assert_eq!(snap.cells.len(), 200);
        assert_eq!(snap.active.map(|a| a.kind), Some(e.piece().kind()));
    }

    #[test]
    fn test_into_parts_keeps_queue_position() {
        let e = Engine::new(EngineConfig::default(), ShapeQueue::seeded(5), ScoreLog::new())
            .unwrap();
        let upcoming = e.shape_source().upcoming().to_vec();
        let (shapes, sink) = e.into_parts();
        let next = Engine::new(EngineConfig::default(), shapes, sink).unwrap();
        assert_eq!(next.piece().kind(), upcoming[0]);
    }
}

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::{
    ConfigError,
    core::{ActivePiece, Board, ShapeKind},
};

use super::{
    EngineConfig, GameStats, MoveRateLimiter, ShapeGenerator, ShapeSeed, ShapeSource, Snapshot,
};

/// Shortest fall interval reachable through level progression.
pub const MIN_FALL_INTERVAL: Duration = Duration::from_millis(50);

/// Holding soft drop makes the piece fall this many times faster than the base interval.
pub const SOFT_DROP_DIVISOR: u32 = 5;

/// Outcome of advancing the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Time passed but no piece locked.
    NoOp,
    /// The active piece locked and the next one spawned.
    PieceLocked { lines_cleared: usize },
    /// The next piece could not spawn. Reported on every tick once reached.
    GameOver,
}

/// Coarse engine phase. Pausing is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Falling,
    GameOver,
}

/// Fall interval at `level` without soft drop.
///
/// Each level above 1 shortens the base interval by a tenth of the base,
/// never going below [`MIN_FALL_INTERVAL`].
///
/// ```
/// use std::time::Duration;
/// use brickfall_engine::level_fall_interval;
///
/// let base = Duration::from_millis(300);
/// assert_eq!(level_fall_interval(base, 1), Duration::from_millis(300));
/// assert_eq!(level_fall_interval(base, 3), Duration::from_millis(240));
/// assert_eq!(level_fall_interval(base, 50), Duration::from_millis(50));
/// ```
#[must_use]
pub fn level_fall_interval(base: Duration, level: u32) -> Duration {
    let reduction = (base / 10).saturating_mul(level.saturating_sub(1));
    base.saturating_sub(reduction).max(MIN_FALL_INTERVAL.min(base))
}

/// The falling-block state machine.
///
/// The engine is driven from outside by exactly two stimuli: elapsed time via
/// [`Engine::tick`], and player commands such as [`Engine::move_left`] or
/// [`Engine::hard_drop`]. Commands report whether they were applied; a
/// rejected command leaves the state untouched and is never an error.
///
/// Construction spawns the first piece right away. If it does not fit (only
/// possible on a prepared board) the engine starts in [`Phase::GameOver`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use brickfall_engine::{Difficulty, Engine, EngineConfig, EngineEvent, ShapeSeed};
///
/// let config = EngineConfig::new(Difficulty::Hard).with_seed(ShapeSeed::from(7));
/// let mut engine = Engine::new(config).unwrap();
///
/// assert_eq!(engine.fall_interval(), Duration::from_millis(150));
/// assert_eq!(engine.tick(Duration::from_millis(149)), EngineEvent::NoOp);
/// assert_eq!(engine.active_piece().map(|p| p.y()), Some(0));
/// assert_eq!(engine.tick(Duration::from_millis(1)), EngineEvent::NoOp);
/// assert_eq!(engine.active_piece().map(|p| p.y()), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Engine<S = ShapeGenerator> {
    config: EngineConfig,
    board: Board,
    active: Option<ActivePiece>,
    next: ShapeKind,
    source: S,
    stats: GameStats,
    phase: Phase,
    paused: bool,
    soft_drop: bool,
    clock: Duration,
    fall_timer: Duration,
    move_limiter: MoveRateLimiter,
}

impl Engine<ShapeGenerator> {
    /// Creates an engine with an empty board and random shapes.
    ///
    /// Shapes come from `config.seed` when present, otherwise from a freshly
    /// drawn seed (see [`Engine::seed`]).
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_board(config, Board::new())
    }

    /// Like [`Engine::new`], but starts from a prepared board.
    ///
    /// The board must not contain complete rows.
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self, ConfigError> {
        let source = config
            .seed
            .map_or_else(ShapeGenerator::new, ShapeGenerator::with_seed);
        Self::from_parts(config, board, source)
    }

    /// Seed of the shape generator, for replaying this game.
    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.source.seed()
    }
}

impl<S> Engine<S>
where
    S: ShapeSource,
{
    /// Creates an engine with an empty board that takes shapes from `source`.
    ///
    /// `config.seed` is ignored.
    pub fn with_shape_source(config: EngineConfig, source: S) -> Result<Self, ConfigError> {
        Self::from_parts(config, Board::new(), source)
    }

    /// Creates an engine from a prepared board and a shape source.
    pub fn from_parts(
        config: EngineConfig,
        board: Board,
        mut source: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let complete_rows = board.complete_rows();
        if !complete_rows.is_empty() {
            return Err(ConfigError::CompleteRowsOnBoard {
                rows: complete_rows,
            });
        }

        let next = source.next_shape();
        let mut engine = Self {
            config,
            board,
            active: None,
            next,
            source,
            stats: GameStats::new(),
            phase: Phase::Falling,
            paused: false,
            soft_drop: false,
            clock: Duration::ZERO,
            fall_timer: Duration::ZERO,
            move_limiter: MoveRateLimiter::new(config.move_repeat_delay),
        };
        debug!(difficulty = %config.difficulty, "engine started");
        engine.spawn();
        Ok(engine)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The falling piece; `None` once the game is over.
    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next_shape(&self) -> ShapeKind {
        self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    #[must_use]
    pub fn is_soft_drop_held(&self) -> bool {
        self.soft_drop
    }

    /// Total unpaused time fed through [`Engine::tick`].
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.clock
    }

    /// Current time between gravity steps, taking level and soft drop into account.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        let base = self.config.difficulty.base_interval();
        let interval = level_fall_interval(base, self.stats.level());
        if self.soft_drop {
            interval.min(base / SOFT_DROP_DIVISOR)
        } else {
            interval
        }
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn drop_position(&self) -> Option<ActivePiece> {
        self.active.map(|piece| piece.drop_position(&self.board))
    }

    /// Advances the engine clock by `elapsed` and applies gravity.
    ///
    /// The piece moves down one row for every full fall interval that has
    /// accumulated. Processing stops at the first lock: the leftover time is
    /// discarded and the new piece starts with a fresh interval. Ticks while
    /// paused do nothing and do not advance the clock.
    pub fn tick(&mut self, elapsed: Duration) -> EngineEvent {
        if self.phase.is_game_over() {
            return EngineEvent::GameOver;
        }
        if self.paused {
            return EngineEvent::NoOp;
        }

        self.clock = self.clock.saturating_add(elapsed);
        self.fall_timer = self.fall_timer.saturating_add(elapsed);
        loop {
            let interval = self.fall_interval();
            if self.fall_timer < interval {
                return EngineEvent::NoOp;
            }
            self.fall_timer -= interval;

            let Some(piece) = self.active else {
                return EngineEvent::GameOver;
            };
            let lowered = piece.down();
            if lowered.fits(&self.board) {
                self.active = Some(lowered);
                continue;
            }
            return self.lock_piece(piece);
        }
    }

    /// Moves the active piece one column left.
    ///
    /// Subject to the horizontal repeat delay, timed as if the move happened
    /// right at the last tick.
    pub fn move_left(&mut self) -> bool {
        self.shift_horizontal(-1, Duration::ZERO)
    }

    /// Moves the active piece one column right. See [`Engine::move_left`].
    pub fn move_right(&mut self) -> bool {
        self.shift_horizontal(1, Duration::ZERO)
    }

    /// Like [`Engine::move_left`], for a move made `since_tick` after the last tick.
    ///
    /// Hosts that tick only at the fall interval use this to report input
    /// timing between ticks, so the repeat delay is not tied to gravity.
    ///
    /// ```
    /// use std::time::Duration;
    /// use brickfall_engine::{Engine, EngineConfig, ShapeSequence};
    ///
    /// let shapes: ShapeSequence = "O".parse().unwrap();
    /// let mut engine = Engine::with_shape_source(EngineConfig::default(), shapes).unwrap();
    /// assert!(engine.move_left_after(Duration::ZERO));
    /// assert!(!engine.move_left_after(Duration::from_millis(10)));
    /// assert!(engine.move_left_after(Duration::from_millis(40)));
    /// ```
    pub fn move_left_after(&mut self, since_tick: Duration) -> bool {
        self.shift_horizontal(-1, since_tick)
    }

    /// Like [`Engine::move_right`], for a move made `since_tick` after the last tick.
    pub fn move_right_after(&mut self, since_tick: Duration) -> bool {
        self.shift_horizontal(1, since_tick)
    }

    /// Rotates the active piece clockwise in place; no kicks are tried.
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.controllable_piece() else {
            return false;
        };
        let rotated = piece.rotated_clockwise();
        if !rotated.fits(&self.board) {
            return false;
        }
        trace!(kind = ?rotated.kind(), "piece rotated");
        self.active = Some(rotated);
        true
    }

    /// Drops the active piece as far as it goes and locks it immediately.
    ///
    /// The lock result is visible through [`Engine::stats`] and
    /// [`Engine::phase`].
    pub fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.controllable_piece() else {
            return false;
        };
        let landed = piece.drop_position(&self.board);
        trace!(kind = ?landed.kind(), rows = landed.y() - piece.y(), "hard drop");
        self.lock_piece(landed);
        true
    }

    /// Sets whether soft drop is held.
    ///
    /// This models a key being held down, so it is accepted while paused.
    /// Rejected only once the game is over. A change restarts the fall timer
    /// so time gathered at the old interval is not spent at the new one.
    pub fn set_soft_drop(&mut self, held: bool) -> bool {
        if self.phase.is_game_over() {
            return false;
        }
        if self.soft_drop != held {
            trace!(held, "soft drop changed");
            self.soft_drop = held;
            self.fall_timer = Duration::ZERO;
        }
        true
    }

    /// Pauses or resumes the game. Rejected once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase.is_game_over() {
            return false;
        }
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        true
    }

    /// Read-only view of the current state for rendering or serialization.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            active_piece: self.active,
            ghost_piece: self.drop_position(),
            next_shape: self.next,
            next_mask: self.next.mask(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            pieces: self.stats.completed_pieces(),
            paused: self.paused,
            game_over: self.phase.is_game_over(),
            soft_drop: self.soft_drop,
            fall_interval: self.fall_interval(),
            play_time: self.clock,
        }
    }

    fn controllable_piece(&self) -> Option<ActivePiece> {
        if self.paused { None } else { self.active }
    }

    fn shift_horizontal(&mut self, dx: i32, since_tick: Duration) -> bool {
        let Some(piece) = self.controllable_piece() else {
            return false;
        };
        let shifted = piece.shifted(dx, 0);
        // Blocked moves must not start the repeat delay.
        if !shifted.fits(&self.board) {
            return false;
        }
        if !self
            .move_limiter
            .try_acquire(self.clock.saturating_add(since_tick))
        {
            return false;
        }
        trace!(dx, x = shifted.x(), "piece shifted");
        self.active = Some(shifted);
        true
    }

    fn lock_piece(&mut self, piece: ActivePiece) -> EngineEvent {
        self.active = None;
        let dropped = piece.lock_into(&mut self.board);
        if dropped > 0 {
            warn!(dropped, kind = ?piece.kind(), "cells above the board were discarded");
        }

        let lines_cleared = self.board.clear_lines();
        let level_before = self.stats.level();
        let points = self.stats.complete_piece_drop(lines_cleared);
        debug!(
            kind = ?piece.kind(),
            x = piece.x(),
            y = piece.y(),
            lines_cleared,
            points,
            "piece locked"
        );
        if self.stats.level() > level_before {
            info!(
                level = self.stats.level(),
                score = self.stats.score(),
                "level up"
            );
        }

        if !self.spawn() {
            return EngineEvent::GameOver;
        }
        EngineEvent::PieceLocked { lines_cleared }
    }

    /// Moves the next shape to the spawn anchor and draws a new next shape.
    ///
    /// Returns `false` and ends the game when the spawn cells are occupied.
    fn spawn(&mut self) -> bool {
        let kind = self.next;
        self.next = self.source.next_shape();
        self.fall_timer = Duration::ZERO;

        let piece = ActivePiece::spawn(kind);
        if !piece.fits(&self.board) {
            self.active = None;
            self.phase = Phase::GameOver;
            info!(
                score = self.stats.score(),
                level = self.stats.level(),
                lines = self.stats.total_cleared_lines(),
                pieces = self.stats.completed_pieces(),
                "game over"
            );
            return false;
        }
        trace!(?kind, next = ?self.next, "piece spawned");
        self.active = Some(piece);
        true
    }
}

//! Game engine - the state machine driving one game
//!
//! The engine advances only inside [`GameEngine::step`]. A step runs in a
//! fixed order:
//!
//! 1. clamp the elapsed time and advance the clock (frozen while paused)
//! 2. apply the input events in order
//! 3. auto-repeat held directions
//! 4. lock a resting piece whose delay ran out, otherwise apply gravity
//!
//! Nothing in a step can fail: rejected moves are dropped and game over is
//! an ordinary state.

use std::time::Duration;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::collision::{drop_distance, is_valid, Delta};
use crate::config::{ConfigError, EngineConfig};
use crate::grid::Grid;
use crate::lines;
use crate::motion::{Direction, MotionController};
use crate::pieces::{check_shape_tables, Piece};
use crate::rng::PieceBag;
use crate::scoring::{gravity_interval_ms, DropKind, ScoreBoard};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, LockEvent};
use crate::types::{InputEvent, InputKey, KeyPhase, PieceKind};

const NANOS_PER_MS: u128 = 1_000_000;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    Start,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    grid: Grid,
    bag: PieceBag,
    current: Option<Piece>,
    next: Option<PieceKind>,
    scores: ScoreBoard,
    motion: MotionController,
    state: GameState,
    /// Clock time of the transition into game over
    game_over_at: Option<u64>,
    clock_ms: u64,
    /// Sub-millisecond remainder carried into the next step
    carry_nanos: u32,
    last_event: Option<LockEvent>,
    quit_requested: bool,
    /// A piece entered play during this step's events
    spawned_this_step: bool,
}

impl GameEngine {
    /// Create an engine with default tunables
    pub fn new(seed: u64) -> Self {
        Self::build(EngineConfig::default(), seed)
    }

    /// Create an engine with custom tunables
    pub fn with_config(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: EngineConfig, seed: u64) -> Self {
        debug_assert_eq!(check_shape_tables(), Ok(()));
        Self {
            config,
            grid: Grid::new(),
            bag: PieceBag::new(seed),
            current: None,
            next: None,
            scores: ScoreBoard::new(),
            motion: MotionController::new(),
            state: GameState::Start,
            game_over_at: None,
            clock_ms: 0,
            carry_nanos: 0,
            last_event: None,
            quit_requested: false,
            spawned_this_step: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for building test and replay setups
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next(&self) -> Option<PieceKind> {
        self.next
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

    pub fn game_over_at(&self) -> Option<u64> {
        self.game_over_at
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn seed(&self) -> u64 {
        self.bag.seed()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Replace the falling piece with a fresh spawn of `kind`.
    ///
    /// Only valid while playing; returns false when there is no game or the
    /// spawn position is blocked.
    pub fn set_current_kind(&mut self, kind: PieceKind) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let piece = Piece::spawn_at_row(kind, self.config.spawn_row);
        if !is_valid(&piece, &self.grid, Delta::NONE) {
            return false;
        }
        self.place_spawned(piece);
        true
    }

    /// Current gravity step for the level
    pub fn gravity_step_ms(&self) -> u32 {
        gravity_interval_ms(self.scores.level(), &self.config)
    }

    /// Advance the simulation by `elapsed` and apply `events` in order
    pub fn step(&mut self, elapsed: Duration, events: &[InputEvent]) -> GameSnapshot {
        self.last_event = None;
        self.spawned_this_step = false;
        let was_playing = self.state == GameState::Playing;
        let dt = if self.state == GameState::Paused {
            0
        } else {
            self.advance_clock(elapsed)
        };

        for &event in events {
            self.apply_event(event);
        }

        if self.state == GameState::Playing {
            // A fresh piece, or a step that begins or resumes play, gets no
            // gravity credit.
            let credit = if was_playing && !self.spawned_this_step {
                dt
            } else {
                0
            };
            self.update_motion(credit);
        }

        self.snapshot()
    }

    /// Clamp `elapsed`, add the carried remainder and advance the clock
    fn advance_clock(&mut self, elapsed: Duration) -> u32 {
        let max_ms = self.config.max_step_ms;
        let capped = elapsed.min(Duration::from_millis(max_ms as u64));
        let total = capped.as_nanos() + self.carry_nanos as u128;
        let whole = total / NANOS_PER_MS;

        let dt = if whole >= max_ms as u128 {
            self.carry_nanos = 0;
            max_ms
        } else {
            self.carry_nanos = (total % NANOS_PER_MS) as u32;
            whole as u32
        };
        self.clock_ms += dt as u64;
        dt
    }

    fn apply_event(&mut self, event: InputEvent) {
        if event.key == InputKey::Quit {
            if event.is_press() {
                info!("quit requested");
                self.quit_requested = true;
            }
            return;
        }

        // Releases always reach the held-key state, even while paused.
        if event.phase == KeyPhase::Release {
            match event.key {
                InputKey::MoveLeft => self.motion.release_horizontal(Direction::Left),
                InputKey::MoveRight => self.motion.release_horizontal(Direction::Right),
                InputKey::SoftDrop => self.motion.release_soft_drop(),
                _ => {}
            }
            return;
        }

        match (self.state, event.key) {
            (GameState::Start, InputKey::BeginOrRestart) => {
                info!("game started (seed {})", self.bag.seed());
                self.begin();
            }
            (GameState::GameOver, InputKey::BeginOrRestart) => {
                info!("game restarted");
                self.begin();
            }
            (GameState::Playing, InputKey::PauseToggle) => {
                info!("paused at {} ms", self.clock_ms);
                self.state = GameState::Paused;
            }
            (GameState::Paused, InputKey::PauseToggle) => {
                info!("resumed at {} ms", self.clock_ms);
                self.state = GameState::Playing;
            }
            (GameState::Playing, key) => self.apply_play_key(key),
            (state, key) => trace!("{key:?} ignored in {state:?}"),
        }
    }

    fn apply_play_key(&mut self, key: InputKey) {
        let Some(mut piece) = self.current else {
            return;
        };
        let now = self.clock_ms;

        match key {
            InputKey::MoveLeft | InputKey::MoveRight => {
                let dir = if key == InputKey::MoveLeft {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.motion
                    .press_horizontal(dir, &mut piece, &self.grid, now, &self.config);
                self.current = Some(piece);
            }
            InputKey::Rotate => {
                self.motion.rotate(&mut piece, &self.grid, now, &self.config);
                self.current = Some(piece);
            }
            InputKey::SoftDrop => {
                let cells = self.motion.press_soft_drop(&mut piece, &self.grid, now);
                self.scores.add_drop(cells, DropKind::Soft, &self.config);
                self.current = Some(piece);
            }
            InputKey::HardDrop => {
                let cells = self.motion.hard_drop(&mut piece, &self.grid);
                self.scores.add_drop(cells, DropKind::Hard, &self.config);
                trace!("hard drop of {:?}: {cells} cells", piece.kind);
                self.current = Some(piece);
                self.lock_current();
            }
            InputKey::PauseToggle | InputKey::BeginOrRestart | InputKey::Quit => {}
        }
    }

    fn update_motion(&mut self, dt: u32) {
        let Some(mut piece) = self.current else {
            return;
        };
        let now = self.clock_ms;

        self.motion.auto_shift(&mut piece, &self.grid, now, &self.config);
        self.current = Some(piece);

        if self.motion.is_resting() && self.motion.lock_due(&piece, &self.grid, now, &self.config) {
            self.lock_current();
            return;
        }

        if !self.motion.is_resting() {
            let step = self.gravity_step_ms();
            let soft_cells =
                self.motion.apply_gravity(&mut piece, &self.grid, dt, step, now, &self.config);
            self.scores.add_drop(soft_cells, DropKind::Soft, &self.config);
            self.current = Some(piece);
        }
    }

    /// Fresh game: empty grid and bag, two pieces drawn, counters reset
    fn begin(&mut self) {
        self.grid.clear();
        self.bag.reset();
        self.scores = ScoreBoard::new();
        self.motion.reset();
        self.last_event = None;
        self.current = None;
        self.next = Some(self.bag.draw_next());
        self.game_over_at = None;
        self.state = GameState::Playing;
        self.spawn_next();
    }

    fn place_spawned(&mut self, piece: Piece) {
        self.motion.reset_for_spawn();
        self.motion.touchdown(&piece, &self.grid, self.clock_ms);
        self.current = Some(piece);
        self.spawned_this_step = true;
    }

    /// Promote the preview piece and draw a new preview
    fn spawn_next(&mut self) {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.bag.draw_next(),
        };
        self.next = Some(self.bag.draw_next());

        let piece = Piece::spawn_at_row(kind, self.config.spawn_row);
        if !is_valid(&piece, &self.grid, Delta::NONE) {
            info!("game over: {kind:?} cannot spawn");
            self.end_game();
            return;
        }
        self.place_spawned(piece);
    }

    /// Commit the falling piece, clear lines, score, then spawn or end
    fn lock_current(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        let hidden = lines::commit(&piece, &mut self.grid);
        let cleared = lines::resolve(&mut self.grid);
        let result = self.scores.add_lines(cleared, &self.config);

        // Blocks above the grid drop with the cleared rows; any still above
        // row 0 mean the stack overflowed.
        let mut overflow = false;
        for (row, col) in hidden {
            let row = row + cleared as i8;
            if row < 0 {
                overflow = true;
            } else {
                self.grid.lock_cell(row, col, piece.color());
            }
        }

        debug!(
            "locked {:?} at ({}, {}): {} lines, +{}",
            piece.kind, piece.row, piece.col, cleared, result.points
        );
        if result.level_up {
            debug!("level up: {}", self.scores.level());
        }

        self.last_event = Some(LockEvent {
            lines_cleared: result.lines,
            line_clear_score: result.points,
            level_up: result.level_up,
            overflow,
        });

        if overflow {
            info!("game over: stack overflow");
            self.end_game();
        } else {
            self.spawn_next();
        }
    }

    fn end_game(&mut self) {
        self.current = None;
        self.motion.reset_for_spawn();
        self.state = GameState::GameOver;
        self.game_over_at = Some(self.clock_ms);
        info!(
            "final score {} (level {}, {} lines)",
            self.scores.score(),
            self.scores.level(),
            self.scores.lines()
        );
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.grid.write_rows(&mut out.grid);

        let step = self.gravity_step_ms();
        out.current = self.current.map(|piece| {
            ActiveSnapshot::new(
                &piece,
                self.motion.fall_progress(step, &self.config),
                self.motion.is_resting(),
            )
        });
        out.ghost_row = self
            .current
            .map(|piece| piece.row + drop_distance(&piece, &self.grid) as i8);
        out.next = self.next;
        out.score = self.scores.score();
        out.level = self.scores.level();
        out.lines = self.scores.lines();
        out.state = self.state;
        out.game_over_at_ms = self.game_over_at;
        out.clock_ms = self.clock_ms;
        out.last_event = self.last_event;
        out.quit_requested = self.quit_requested;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

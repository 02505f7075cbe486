//! Motion controller - gravity, lock delay and held-key auto repeat
//!
//! The controller owns every timer of the falling piece. It never touches
//! the grid: moves go through the collision validator and are applied to the
//! piece handed in by the engine. All times are engine-clock milliseconds.
//!
//! Life cycle of a piece:
//!
//! ```text
//! Falling --cannot fall--> Resting --lock delay elapsed--> Locked
//!    ^                        |
//!    +---move/rotate frees ---+
//! ```

use log::trace;

use crate::collision::{drop_distance, is_resting, is_valid, Delta};
use crate::config::EngineConfig;
use crate::grid::Grid;
use crate::pieces::Piece;

/// Horizontal direction of a held key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> Delta {
        match self {
            Direction::Left => Delta::cols(-1),
            Direction::Right => Delta::cols(1),
        }
    }
}

/// Delayed-auto-shift state of one direction key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HoldTimer {
    held: bool,
    /// DAS has elapsed; further moves come every ARR
    repeating: bool,
    /// Clock time of the press or of the last auto move
    last_move_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionController {
    /// Time credited toward the next gravity step
    gravity_acc_ms: u32,
    resting: bool,
    lock_started_at: u64,
    lock_resets: u8,
    left: HoldTimer,
    right: HoldTimer,
    soft_drop_held: bool,
}

impl MotionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, including held keys (new game)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fresh timers for a newly spawned piece. Held keys stay held.
    pub fn reset_for_spawn(&mut self) {
        self.gravity_acc_ms = 0;
        self.resting = false;
        self.lock_started_at = 0;
        self.lock_resets = 0;
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.timer(dir).held
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    fn timer(&self, dir: Direction) -> &HoldTimer {
        match dir {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    fn timer_mut(&mut self, dir: Direction) -> &mut HoldTimer {
        match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Mark the piece resting and start the lock window
    fn enter_resting(&mut self, now: u64) {
        self.resting = true;
        self.lock_started_at = now;
        self.gravity_acc_ms = 0;
    }

    /// Notice a piece that can no longer fall, even between gravity ticks
    pub fn touchdown(&mut self, piece: &Piece, grid: &Grid, now: u64) {
        if !self.resting && is_resting(piece, grid) {
            self.enter_resting(now);
        }
    }

    /// Re-evaluate resting after a successful lateral move or rotation
    fn after_shift(&mut self, piece: &Piece, grid: &Grid, now: u64, config: &EngineConfig) {
        let can_fall = !is_resting(piece, grid);
        if self.resting {
            if can_fall {
                self.resting = false;
                self.gravity_acc_ms = 0;
            } else if self.lock_resets < config.lock_reset_limit {
                self.lock_resets += 1;
                self.lock_started_at = now;
            }
        } else if !can_fall {
            self.enter_resting(now);
        }
    }

    fn shift(
        &mut self,
        dir: Direction,
        piece: &mut Piece,
        grid: &Grid,
        now: u64,
        config: &EngineConfig,
    ) -> bool {
        let delta = dir.delta();
        if !is_valid(piece, grid, delta) {
            trace!("{dir:?} blocked at col {}", piece.col);
            return false;
        }
        *piece = delta.apply(piece);
        self.after_shift(piece, grid, now, config);
        true
    }

    /// Key-down on a direction: one immediate move, then DAS starts counting
    pub fn press_horizontal(
        &mut self,
        dir: Direction,
        piece: &mut Piece,
        grid: &Grid,
        now: u64,
        config: &EngineConfig,
    ) -> bool {
        *self.timer_mut(dir) = HoldTimer {
            held: true,
            repeating: false,
            last_move_at: now,
        };
        self.shift(dir, piece, grid, now, config)
    }

    pub fn release_horizontal(&mut self, dir: Direction) {
        *self.timer_mut(dir) = HoldTimer::default();
    }

    /// Try the next rotation state; a colliding rotation is dropped
    pub fn rotate(
        &mut self,
        piece: &mut Piece,
        grid: &Grid,
        now: u64,
        config: &EngineConfig,
    ) -> bool {
        let delta = Delta::rotate(1);
        if !is_valid(piece, grid, delta) {
            trace!("rotation of {:?} blocked", piece.kind);
            return false;
        }
        *piece = delta.apply(piece);
        self.after_shift(piece, grid, now, config);
        true
    }

    /// Key-down on soft drop. Moves one cell right away when possible and
    /// returns the number of cells fallen (0 or 1).
    pub fn press_soft_drop(&mut self, piece: &mut Piece, grid: &Grid, now: u64) -> u32 {
        self.soft_drop_held = true;
        if !is_valid(piece, grid, Delta::DOWN) {
            return 0;
        }
        *piece = Delta::DOWN.apply(piece);
        self.resting = false;
        self.gravity_acc_ms = 0;
        self.touchdown(piece, grid, now);
        1
    }

    pub fn release_soft_drop(&mut self) {
        self.soft_drop_held = false;
    }

    /// Move the piece to its landing row; returns the cells travelled
    pub fn hard_drop(&mut self, piece: &mut Piece, grid: &Grid) -> u32 {
        let distance = drop_distance(piece, grid);
        *piece = Delta::rows(distance as i8).apply(piece);
        distance as u32
    }

    /// Run DAS/ARR for held directions up to `now`.
    ///
    /// Missed repeat intervals are caught up one move at a time; a blocked
    /// move ends the catch-up and restarts the interval from `now`.
    pub fn auto_shift(&mut self, piece: &mut Piece, grid: &Grid, now: u64, config: &EngineConfig) {
        for dir in [Direction::Left, Direction::Right] {
            loop {
                let timer = *self.timer(dir);
                if !timer.held {
                    break;
                }
                let interval = u64::from(if timer.repeating {
                    config.arr_ms
                } else {
                    config.das_ms
                });
                if now.saturating_sub(timer.last_move_at) < interval {
                    break;
                }

                let t = self.timer_mut(dir);
                t.repeating = true;
                t.last_move_at += interval;
                if !self.shift(dir, piece, grid, now, config) {
                    self.timer_mut(dir).last_move_at = now;
                    break;
                }
            }
        }
    }

    /// Gravity step in effect: soft drop speeds it up, never slows it down
    pub fn step_ms(&self, level_step_ms: u32, config: &EngineConfig) -> u32 {
        if self.soft_drop_held {
            level_step_ms.min(config.soft_drop_interval_ms)
        } else {
            level_step_ms
        }
    }

    /// Credit `dt_ms` to gravity and move the piece down for every full
    /// step. Returns the cells fallen while soft drop was held.
    pub fn apply_gravity(
        &mut self,
        piece: &mut Piece,
        grid: &Grid,
        dt_ms: u32,
        level_step_ms: u32,
        now: u64,
        config: &EngineConfig,
    ) -> u32 {
        if self.resting {
            return 0;
        }
        let step = self.step_ms(level_step_ms, config);
        let mut soft_cells = 0;

        self.gravity_acc_ms = self.gravity_acc_ms.saturating_add(dt_ms);
        while self.gravity_acc_ms >= step {
            if !is_valid(piece, grid, Delta::DOWN) {
                self.enter_resting(now);
                break;
            }
            *piece = Delta::DOWN.apply(piece);
            self.gravity_acc_ms -= step;
            if self.soft_drop_held {
                soft_cells += 1;
            }
        }

        self.touchdown(piece, grid, now);
        soft_cells
    }

    /// Has a resting piece waited out its lock delay?
    ///
    /// A piece found able to fall again goes back to falling instead.
    pub fn lock_due(
        &mut self,
        piece: &Piece,
        grid: &Grid,
        now: u64,
        config: &EngineConfig,
    ) -> bool {
        if !self.resting {
            return false;
        }
        if !is_resting(piece, grid) {
            self.resting = false;
            self.gravity_acc_ms = 0;
            return false;
        }
        now.saturating_sub(self.lock_started_at) >= config.lock_delay_ms as u64
    }

    /// Fractional fall progress toward the next row, in `[0, 1)`
    pub fn fall_progress(&self, level_step_ms: u32, config: &EngineConfig) -> f32 {
        if self.resting {
            return 0.0;
        }
        let step = self.step_ms(level_step_ms, config).max(1);
        self.gravity_acc_ms.min(step - 1) as f32 / step as f32
    }
}

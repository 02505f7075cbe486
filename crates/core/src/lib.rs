//! Core simulation - pure, deterministic, and testable
//!
//! This crate contains the rules and the state machine of the falling-block
//! game. It has no dependencies on terminals, windows or wall-clock time:
//! the caller supplies elapsed time and input events, the engine returns a
//! snapshot. That makes it:
//!
//! - **Deterministic**: the same seed and the same step sequence replay the same game
//! - **Testable**: every rule is reachable from plain unit tests
//! - **Portable**: any loop (terminal, GUI, replay, test) drives it the same way
//!
//! # Module Structure
//!
//! - [`grid`]: 10x20 locked-block matrix with row clearing and compaction
//! - [`pieces`]: shape tables and the falling piece
//! - [`rng`]: seeded 7-bag randomizer
//! - [`collision`]: the placement validator every move goes through
//! - [`motion`]: gravity, lock delay and DAS/ARR auto repeat
//! - [`lines`]: committing a piece and resolving full rows
//! - [`scoring`]: drop bonuses, line scores, levels and gravity speed
//! - [`config`]: validated tunables
//! - [`engine`]: the game state machine and its `step`
//! - [`snapshot`]: the read-only view handed back after each step
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tetris_sim_core::{GameEngine, GameState};
//! use tetris_sim_types::{InputEvent, InputKey};
//!
//! let mut engine = GameEngine::new(12345);
//! let snap = engine.step(Duration::ZERO, &[InputEvent::press(InputKey::BeginOrRestart)]);
//! assert_eq!(snap.state, GameState::Playing);
//!
//! let snap = engine.step(Duration::from_millis(16), &[InputEvent::press(InputKey::HardDrop)]);
//! assert!(snap.score > 0); // Hard drop awards points
//! assert!(snap.last_event.is_some());
//! ```

pub mod collision;
pub mod config;
pub mod engine;
pub mod grid;
pub mod lines;
pub mod motion;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_sim_types as types;

// Re-export commonly used types for convenience
pub use collision::{drop_distance, is_resting, is_valid, Delta};
pub use config::{ConfigError, EngineConfig};
pub use engine::{GameEngine, GameState};
pub use grid::Grid;
pub use pieces::{get_shape, Piece};
pub use rng::PieceBag;
pub use scoring::{gravity_interval_ms, line_clear_score, ScoreBoard};
pub use snapshot::{ActiveSnapshot, GameSnapshot, LockEvent};

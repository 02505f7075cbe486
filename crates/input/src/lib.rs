//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::InputEvent`]s. Press and
//! release are passed through as they are; the engine runs DAS/ARR itself, so
//! terminal auto-repeat is discarded here.

pub mod map;

pub use tetris_sim_types as types;

pub use map::{map_key_code, map_key_event, parse_key_code, should_quit};

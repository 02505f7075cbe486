//! Falling-block puzzle engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tetris_sim::{core,input,types}` and adds the scripted
//! replay runner used by the `tetris-sim` binary.

pub mod replay;

pub use tetris_sim_core as core;
pub use tetris_sim_input as input;
pub use tetris_sim_types as types;

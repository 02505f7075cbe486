//! Replay runner (default binary).
//!
//! Plays a JSON key script through the engine and prints the final snapshot
//! as JSON on stdout. Logs go to stderr; set `RUST_LOG=debug` to follow
//! locks and line clears.

use anyhow::{anyhow, Result};

use tetris_sim::replay::{self, parse_replay_args};

const USAGE: &str =
    "usage: tetris-sim replay <script.json> [--seed N] [--config engine.json] [--step-ms N]";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(replay_args) = parse_replay_args(&args)? else {
        return Err(anyhow!(USAGE));
    };

    let snapshot = replay::run(&replay_args)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

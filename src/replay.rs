//! Scripted replays: drive the engine from a JSON key script at a fixed
//! timestep and report the final snapshot.
//!
//! ```json
//! {
//!   "seed": 7,
//!   "step_ms": 16,
//!   "duration_ms": 2000,
//!   "events": [
//!     { "at_ms": 0, "key": "enter", "phase": "press" },
//!     { "at_ms": 100, "key": "space", "phase": "press" }
//!   ]
//! }
//! ```
//!
//! Key names go through the same mapping as live terminal input.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::event::KeyModifiers;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, GameEngine, GameSnapshot};
use crate::input::{map_key_code, parse_key_code};
use crate::types::{InputEvent, KeyPhase};

/// Timestep used when neither the script nor the command line sets one
pub const DEFAULT_STEP_MS: u32 = 16;

/// Seed used when neither the script nor the command line sets one
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub key: String,
    pub phase: KeyPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub step_ms: Option<u32>,
    pub duration_ms: u64,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayArgs {
    pub script: PathBuf,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub step_ms: Option<u32>,
}

pub fn parse_replay_args(args: &[String]) -> Result<Option<ReplayArgs>> {
    if args.is_empty() || args[0] != "replay" {
        return Ok(None);
    }

    let mut script: Option<PathBuf> = None;
    let mut seed = None;
    let mut config = None;
    let mut step_ms = None;
    let mut i = 1usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("replay: missing value for --seed"))?;
                seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("replay: invalid --seed value: {}", v))?,
                );
            }
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("replay: missing value for --config"))?;
                config = Some(PathBuf::from(v));
            }
            "--step-ms" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("replay: missing value for --step-ms"))?;
                step_ms = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("replay: invalid --step-ms value: {}", v))?,
                );
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("replay: unknown argument: {}", other));
            }
            path => {
                if script.is_some() {
                    return Err(anyhow!("replay: unexpected extra argument: {}", path));
                }
                script = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let script = script.ok_or_else(|| anyhow!("replay: missing script path"))?;
    Ok(Some(ReplayArgs {
        script,
        seed,
        config,
        step_ms,
    }))
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("replay: cannot read script {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("replay: invalid script {}", path.display()))
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("replay: cannot read config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text)
        .with_context(|| format!("replay: invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("replay: rejected config {}", path.display()))?;
    Ok(config)
}

/// Resolve a script key name to an engine event
pub fn script_event(event: &ScriptEvent) -> Result<InputEvent> {
    let code = parse_key_code(&event.key)
        .ok_or_else(|| anyhow!("replay: unknown key name: {:?}", event.key))?;
    let key = map_key_code(code, KeyModifiers::NONE)
        .ok_or_else(|| anyhow!("replay: key {:?} is not bound", event.key))?;
    Ok(InputEvent {
        key,
        phase: event.phase,
    })
}

/// Play `script` through a new engine.
///
/// Events fire on the first step whose time reaches their `at_ms`. The run
/// stops at `duration_ms` or as soon as a quit is requested.
pub fn run_script(
    script: &ReplayScript,
    config: EngineConfig,
    seed: Option<u64>,
    step_ms: Option<u32>,
) -> Result<GameSnapshot> {
    let seed = seed.or(script.seed).unwrap_or(DEFAULT_SEED);
    let step_ms = step_ms.or(script.step_ms).unwrap_or(DEFAULT_STEP_MS);
    if step_ms == 0 {
        return Err(anyhow!("replay: step_ms must be greater than zero"));
    }

    let mut timeline = script
        .events
        .iter()
        .map(|e| script_event(e).map(|event| (e.at_ms, event)))
        .collect::<Result<Vec<_>>>()?;
    timeline.sort_by_key(|&(at, _)| at);

    let mut engine = GameEngine::with_config(config, seed)?;
    info!(
        "replaying {} events over {} ms (seed {}, step {} ms)",
        timeline.len(),
        script.duration_ms,
        seed,
        step_ms
    );

    let mut pending = timeline.into_iter().peekable();
    let mut batch: Vec<InputEvent> = Vec::new();
    let mut t: u64 = 0;
    let mut elapsed = Duration::ZERO;

    loop {
        batch.clear();
        while let Some((_, event)) = pending.next_if(|&(at, _)| at <= t) {
            batch.push(event);
        }

        let snapshot = engine.step(elapsed, &batch);
        if snapshot.quit_requested || t >= script.duration_ms {
            debug!("replay finished at {} ms", t);
            return Ok(snapshot);
        }

        let dt = u64::from(step_ms).min(script.duration_ms - t);
        t += dt;
        elapsed = Duration::from_millis(dt);
    }
}

/// Load and play a replay described by command-line arguments
pub fn run(args: &ReplayArgs) -> Result<GameSnapshot> {
    let script = load_script(&args.script)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    run_script(&script, config, args.seed, args.step_ms)
}

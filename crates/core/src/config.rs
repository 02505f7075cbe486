//! Engine configuration - every tunable of the simulation in one place
//!
//! Defaults come from the constants in `tetris_sim_types`. Missing fields in
//! a serialized config fall back to those defaults, so a JSON file only needs
//! the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pieces::Piece;
use crate::types::*;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("gravity_level_multiplier must be in (0, 1], got {0}")]
    Multiplier(f64),
    #[error("gravity_min_ms ({min}) exceeds gravity_initial_ms ({initial})")]
    MinAboveInitial { min: u32, initial: u32 },
    #[error("line_scores must be non-decreasing, got {0:?}")]
    LineScores([u32; 5]),
    #[error("spawn_row {0} leaves some piece entirely above the grid")]
    SpawnRow(i8),
}

/// Tunables for timing, scoring and spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Delayed auto shift before a held direction repeats
    pub das_ms: u32,
    /// Interval between auto-repeat moves
    pub arr_ms: u32,
    /// Time a resting piece waits before it locks
    pub lock_delay_ms: u32,
    /// Lock-delay restarts allowed per piece
    pub lock_reset_limit: u8,
    /// Gravity step at level 1
    pub gravity_initial_ms: u32,
    /// Per-level scale of the gravity step
    pub gravity_level_multiplier: f64,
    /// Gravity step floor
    pub gravity_min_ms: u32,
    /// Gravity step while soft drop is held
    pub soft_drop_interval_ms: u32,
    /// Clamp for the elapsed time of one step
    pub max_step_ms: u32,
    pub lines_per_level: u32,
    /// Base points by lines cleared in one lock (index 4 covers 4+)
    pub line_scores: [u32; 5],
    pub soft_drop_bonus: u32,
    pub hard_drop_bonus: u32,
    /// Anchor row of freshly spawned pieces
    pub spawn_row: i8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            lock_reset_limit: LOCK_RESET_LIMIT,
            gravity_initial_ms: GRAVITY_INITIAL_MS,
            gravity_level_multiplier: GRAVITY_LEVEL_MULTIPLIER,
            gravity_min_ms: GRAVITY_MIN_MS,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            max_step_ms: MAX_STEP_MS,
            lines_per_level: LINES_PER_LEVEL,
            line_scores: LINE_SCORES,
            soft_drop_bonus: SCORE_SOFT_DROP_BONUS,
            hard_drop_bonus: SCORE_HARD_DROP_BONUS,
            spawn_row: SPAWN_ROW,
        }
    }
}

impl EngineConfig {
    /// Check the values the simulation relies on.
    ///
    /// Zero intervals would stall the repeat and gravity loops, so they are
    /// rejected here rather than guarded on every step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arr_ms", self.arr_ms),
            ("gravity_initial_ms", self.gravity_initial_ms),
            ("gravity_min_ms", self.gravity_min_ms),
            ("soft_drop_interval_ms", self.soft_drop_interval_ms),
            ("max_step_ms", self.max_step_ms),
            ("lines_per_level", self.lines_per_level),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }

        let m = self.gravity_level_multiplier;
        if !(m > 0.0 && m <= 1.0) {
            return Err(ConfigError::Multiplier(m));
        }
        if self.gravity_min_ms > self.gravity_initial_ms {
            return Err(ConfigError::MinAboveInitial {
                min: self.gravity_min_ms,
                initial: self.gravity_initial_ms,
            });
        }
        if self.line_scores.windows(2).any(|w| w[1] < w[0]) {
            return Err(ConfigError::LineScores(self.line_scores));
        }

        // Every kind must show at least one block on the grid when it spawns,
        // and no block may start below the floor.
        if !(-4..BOARD_HEIGHT as i8).contains(&self.spawn_row) {
            return Err(ConfigError::SpawnRow(self.spawn_row));
        }
        for kind in PieceKind::ALL {
            let cells = Piece::spawn_at_row(kind, self.spawn_row).cells();
            let visible = cells.iter().any(|&(row, _)| row >= 0);
            let in_floor = cells.iter().all(|&(row, _)| row < BOARD_HEIGHT as i8);
            if !visible || !in_floor {
                return Err(ConfigError::SpawnRow(self.spawn_row));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_arr_rejected() {
        let config = EngineConfig {
            arr_ms: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Zero { field: "arr_ms" }));
    }

    #[test]
    fn test_multiplier_bounds() {
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            let config = EngineConfig {
                gravity_level_multiplier: bad,
                ..EngineConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Multiplier(_))));
        }
    }

    #[test]
    fn test_min_above_initial_rejected() {
        let config = EngineConfig {
            gravity_min_ms: 500,
            gravity_initial_ms: 400,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MinAboveInitial {
                min: 500,
                initial: 400
            })
        );
    }

    #[test]
    fn test_spawn_row_limits() {
        let hidden = EngineConfig {
            spawn_row: -3,
            ..EngineConfig::default()
        };
        assert_eq!(hidden.validate(), Err(ConfigError::SpawnRow(-3)));

        let partly_hidden = EngineConfig {
            spawn_row: -1,
            ..EngineConfig::default()
        };
        assert_eq!(partly_hidden.validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "das_ms": 100 }"#).unwrap();
        assert_eq!(config.das_ms, 100);
        assert_eq!(config.arr_ms, DEFAULT_ARR_MS);
        assert_eq!(config.line_scores, LINE_SCORES);
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::Zero { field: "arr_ms" };
        assert_eq!(err.to_string(), "arr_ms must be greater than zero");
    }
}

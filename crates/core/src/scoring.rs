//! Scoring module - drop bonuses, line-clear points and level progression
//!
//! Rules:
//! - Soft drop earns a bonus per cell fallen while held, hard drop per cell travelled.
//! - A lock that clears N lines earns `line_scores[min(N, 4)] * level`, using
//!   the level in effect before the clear.
//! - `level = total_lines / lines_per_level + 1`; it only ever goes up.
//! - Gravity step = `max(min, initial * multiplier^(level - 1))`.

use crate::config::EngineConfig;

/// How a piece travelled down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Soft,
    Hard,
}

/// Result of scoring one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClearResult {
    pub lines: u32,
    /// Points added for the clear itself (drop bonuses excluded)
    pub points: u32,
    /// The clear pushed the level up
    pub level_up: bool,
}

/// Calculate line clear points for `lines` cleared at `level`
pub fn line_clear_score(lines: usize, level: u32, table: &[u32; 5]) -> u32 {
    table[lines.min(4)].saturating_mul(level)
}

/// Calculate drop bonus for `cells` travelled
pub fn drop_score(cells: u32, kind: DropKind, config: &EngineConfig) -> u32 {
    let per_cell = match kind {
        DropKind::Soft => config.soft_drop_bonus,
        DropKind::Hard => config.hard_drop_bonus,
    };
    cells.saturating_mul(per_cell)
}

/// Level for a running total of cleared lines (levels start at 1)
pub fn level_for_lines(total_lines: u32, lines_per_level: u32) -> u32 {
    total_lines / lines_per_level + 1
}

/// Gravity step for a level, in milliseconds
pub fn gravity_interval_ms(level: u32, config: &EngineConfig) -> u32 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let scaled = config.gravity_initial_ms as f64 * config.gravity_level_multiplier.powi(exponent);
    let floor = config.gravity_min_ms as f64;
    // Rounding keeps the sequence non-increasing because the scale is.
    scaled.max(floor).round() as u32
}

/// Score, level and line totals for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u32,
    level: u32,
    lines: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Credit a drop bonus; returns the points added
    pub fn add_drop(&mut self, cells: u32, kind: DropKind, config: &EngineConfig) -> u32 {
        let points = drop_score(cells, kind, config);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Credit the line clears of one lock and advance the level
    pub fn add_lines(&mut self, cleared: usize, config: &EngineConfig) -> LineClearResult {
        if cleared == 0 {
            return LineClearResult::default();
        }

        let points = line_clear_score(cleared, self.level, &config.line_scores);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared as u32);

        let new_level = level_for_lines(self.lines, config.lines_per_level);
        let level_up = new_level > self.level;
        if level_up {
            self.level = new_level;
        }

        LineClearResult {
            lines: cleared as u32,
            points,
            level_up,
        }
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LINE_SCORES;

    #[test]
    fn test_line_clear_scores() {
        assert_eq!(line_clear_score(0, 1, &LINE_SCORES), 0);
        assert_eq!(line_clear_score(1, 1, &LINE_SCORES), 100);
        assert_eq!(line_clear_score(2, 1, &LINE_SCORES), 300);
        assert_eq!(line_clear_score(3, 1, &LINE_SCORES), 500);
        assert_eq!(line_clear_score(4, 1, &LINE_SCORES), 800);
        assert_eq!(line_clear_score(4, 3, &LINE_SCORES), 2400);
        // More than four lines uses the top entry.
        assert_eq!(line_clear_score(6, 1, &LINE_SCORES), 800);
    }

    #[test]
    fn test_drop_scores() {
        let config = EngineConfig::default();
        assert_eq!(drop_score(10, DropKind::Soft, &config), 10);
        assert_eq!(drop_score(10, DropKind::Hard, &config), 20);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for_lines(0, 10), 1);
        assert_eq!(level_for_lines(9, 10), 1);
        assert_eq!(level_for_lines(10, 10), 2);
        assert_eq!(level_for_lines(29, 10), 3);
    }

    #[test]
    fn test_gravity_intervals() {
        let config = EngineConfig::default();
        assert_eq!(gravity_interval_ms(1, &config), 400);
        assert_eq!(gravity_interval_ms(2, &config), 340);
        assert_eq!(gravity_interval_ms(3, &config), 289);
        assert_eq!(gravity_interval_ms(40, &config), 30);
        assert_eq!(gravity_interval_ms(u32::MAX, &config), 30);
    }

    #[test]
    fn test_gravity_non_increasing() {
        let config = EngineConfig::default();
        let mut prev = gravity_interval_ms(1, &config);
        for level in 2..100 {
            let next = gravity_interval_ms(level, &config);
            assert!(next <= prev);
            assert!(next >= config.gravity_min_ms);
            prev = next;
        }
    }

    #[test]
    fn test_scoreboard_uses_level_before_clear() {
        let config = EngineConfig::default();
        let mut board = ScoreBoard::new();
        for _ in 0..9 {
            board.add_lines(1, &config);
        }
        assert_eq!(board.level(), 1);
        assert_eq!(board.score(), 900);

        // The tenth line is scored at level 1, then the level goes up.
        let result = board.add_lines(1, &config);
        assert_eq!(result.points, 100);
        assert!(result.level_up);
        assert_eq!(board.level(), 2);
        assert_eq!(board.lines(), 10);

        let result = board.add_lines(2, &config);
        assert_eq!(result.points, 600);
        assert!(!result.level_up);
    }

    #[test]
    fn test_zero_lines_changes_nothing() {
        let config = EngineConfig::default();
        let mut board = ScoreBoard::new();
        assert_eq!(board.add_lines(0, &config), LineClearResult::default());
        assert_eq!(board, ScoreBoard::new());
    }

    #[test]
    fn test_score_saturates() {
        let config = EngineConfig::default();
        let mut board = ScoreBoard::new();
        board.add_drop(u32::MAX, DropKind::Hard, &config);
        board.add_drop(5, DropKind::Soft, &config);
        assert_eq!(board.score(), u32::MAX);
    }
}

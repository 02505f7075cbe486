//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data: the simulation, the input mapping and the
//! replay runner all speak these types.
//!
//! # Grid Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn anchor**: column `BOARD_WIDTH / 2 - 2` (3), row 0
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRAVITY_INITIAL_MS` | 400 | Gravity step at level 1 |
//! | `GRAVITY_LEVEL_MULTIPLIER` | 0.85 | Step scale per level |
//! | `GRAVITY_MIN_MS` | 30 | Gravity step floor |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Gravity step while soft drop is held |
//! | `LOCK_DELAY_MS` | 500 | Time a resting piece waits before locking |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock-delay restarts per piece |
//! | `DEFAULT_DAS_MS` | 160 | Delay before a held direction repeats |
//! | `DEFAULT_ARR_MS` | 30 | Interval between repeats |
//! | `MAX_STEP_MS` | 200 | Upper clamp for one simulation step |
//!
//! # Examples
//!
//! ```
//! use tetris_sim_types::{InputEvent, InputKey, KeyPhase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::O.rotation_count(), 1);
//!
//! let ev = InputEvent::press(InputKey::MoveLeft);
//! assert_eq!(ev.phase, KeyPhase::Press);
//! assert_eq!(InputKey::from_str("hardDrop"), Some(InputKey::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Grid width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Grid height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the anchor for freshly spawned pieces
pub const SPAWN_COL: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Row of the anchor for freshly spawned pieces
pub const SPAWN_ROW: i8 = 0;

/// Gravity step at level 1 (400ms per row)
pub const GRAVITY_INITIAL_MS: u32 = 400;

/// Each level multiplies the gravity step by this factor
pub const GRAVITY_LEVEL_MULTIPLIER: f64 = 0.85;

/// Gravity step never drops below this floor (30ms)
pub const GRAVITY_MIN_MS: u32 = 30;

/// Gravity step while soft drop is held (50ms)
pub const SOFT_DROP_INTERVAL_MS: u32 = 50;

/// Lock delay for a resting piece (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock-delay restarts per piece
pub const LOCK_RESET_LIMIT: u8 = 15;

/// DAS (Delayed Auto Shift) delay in milliseconds
pub const DEFAULT_DAS_MS: u32 = 160;

/// ARR (Auto Repeat Rate) in milliseconds
pub const DEFAULT_ARR_MS: u32 = 30;

/// Upper bound applied to the elapsed time of a single step
pub const MAX_STEP_MS: u32 = 200;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cell travelled while soft drop is held
pub const SCORE_SOFT_DROP_BONUS: u32 = 1;

/// Points per cell travelled by a hard drop
pub const SCORE_HARD_DROP_BONUS: u32 = 2;

/// Line clear scoring table
///
/// Base points for clearing N lines in one lock (index 4 covers 4+):
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
///
/// Points are multiplied by the current level (which starts at 1).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(GRAVITY_INITIAL_MS, 400);
        assert_eq!(GRAVITY_MIN_MS, 30);
        assert_eq!(SOFT_DROP_INTERVAL_MS, 50);
        assert_eq!(LOCK_DELAY_MS, 500);
        assert_eq!(DEFAULT_DAS_MS, 160);
        assert_eq!(DEFAULT_ARR_MS, 30);
        assert_eq!(MAX_STEP_MS, 200);
    }

    #[test]
    fn spawn_column_is_centered() {
        assert_eq!(SPAWN_COL, 3);
    }

    #[test]
    fn line_scores_reward_multi_clears() {
        for pair in LINE_SCORES.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(LINE_SCORES[4] > 4 * LINE_SCORES[1]);
    }

    #[test]
    fn input_key_names_roundtrip() {
        for key in InputKey::ALL {
            assert_eq!(InputKey::from_str(key.as_str()), Some(key));
        }
    }
}

/// The seven tetromino piece kinds
///
/// Each kind has a distinct shape and palette entry:
/// - **I**: Cyan, straight bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in canonical order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_sim_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Number of distinct rotation states (1 for the square, 4 otherwise)
    pub fn rotation_count(&self) -> u8 {
        match self {
            PieceKind::O => 1,
            _ => 4,
        }
    }

    /// Primary/accent color pair used for this kind's blocks
    pub fn color(&self) -> BlockColor {
        match self {
            PieceKind::I => BlockColor::new(Rgb(0, 255, 255), Rgb(180, 255, 255)),
            PieceKind::O => BlockColor::new(Rgb(255, 255, 0), Rgb(255, 255, 180)),
            PieceKind::T => BlockColor::new(Rgb(160, 0, 255), Rgb(220, 150, 255)),
            PieceKind::S => BlockColor::new(Rgb(0, 255, 0), Rgb(180, 255, 180)),
            PieceKind::Z => BlockColor::new(Rgb(255, 0, 0), Rgb(255, 150, 150)),
            PieceKind::J => BlockColor::new(Rgb(0, 0, 255), Rgb(150, 150, 255)),
            PieceKind::L => BlockColor::new(Rgb(255, 165, 0), Rgb(255, 210, 150)),
        }
    }
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Color pair stored in a locked cell: base color plus the accent (glow) color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockColor {
    pub primary: Rgb,
    pub accent: Rgb,
}

impl BlockColor {
    pub const fn new(primary: Rgb, accent: Rgb) -> Self {
        Self { primary, accent }
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(BlockColor)`: Locked block with its color pair
pub type Cell = Option<BlockColor>;

/// Logical keys understood by the engine, independent of any device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKey {
    /// Rotate the falling piece one state clockwise
    Rotate,
    /// Shift left (held: DAS/ARR repeat)
    MoveLeft,
    /// Shift right (held: DAS/ARR repeat)
    MoveRight,
    /// Fast gravity while held
    SoftDrop,
    /// Drop to the floor and lock
    HardDrop,
    /// Toggle between playing and paused
    PauseToggle,
    /// Begin from the start state, or restart after game over
    BeginOrRestart,
    /// Ask the caller to shut down
    Quit,
}

impl InputKey {
    pub const ALL: [InputKey; 8] = [
        InputKey::Rotate,
        InputKey::MoveLeft,
        InputKey::MoveRight,
        InputKey::SoftDrop,
        InputKey::HardDrop,
        InputKey::PauseToggle,
        InputKey::BeginOrRestart,
        InputKey::Quit,
    ];

    /// Parse key from its camelCase name (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rotate" => Some(InputKey::Rotate),
            "moveleft" => Some(InputKey::MoveLeft),
            "moveright" => Some(InputKey::MoveRight),
            "softdrop" => Some(InputKey::SoftDrop),
            "harddrop" => Some(InputKey::HardDrop),
            "pausetoggle" => Some(InputKey::PauseToggle),
            "beginorrestart" => Some(InputKey::BeginOrRestart),
            "quit" => Some(InputKey::Quit),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKey::Rotate => "rotate",
            InputKey::MoveLeft => "moveLeft",
            InputKey::MoveRight => "moveRight",
            InputKey::SoftDrop => "softDrop",
            InputKey::HardDrop => "hardDrop",
            InputKey::PauseToggle => "pauseToggle",
            InputKey::BeginOrRestart => "beginOrRestart",
            InputKey::Quit => "quit",
        }
    }
}

/// Whether a key went down or came back up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPhase {
    Press,
    Release,
}

/// A discrete input event delivered to the engine in step order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputEvent {
    pub key: InputKey,
    pub phase: KeyPhase,
}

impl InputEvent {
    pub const fn press(key: InputKey) -> Self {
        Self {
            key,
            phase: KeyPhase::Press,
        }
    }

    pub const fn release(key: InputKey) -> Self {
        Self {
            key,
            phase: KeyPhase::Release,
        }
    }

    pub fn is_press(&self) -> bool {
        self.phase == KeyPhase::Press
    }
}

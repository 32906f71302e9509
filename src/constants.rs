//! Constants for board dimensions, the reaction vocabulary, and default skins.
//!
//! The board size is a runtime setting (see [`crate::config::EngineConfig`]),
//! but it can never exceed the number of reaction symbols available per axis:
//! a row or column that has no symbol could never be selected.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 9;

/// Largest board the reaction vocabulary can address.
pub const MAX_BOARD_SIZE: usize = 9;

// =============================================================================
// Reaction Vocabulary
// =============================================================================

/// Row buttons, placed on the board message. Index `i` selects row `i`.
pub const ROW_SYMBOLS: [&str; MAX_BOARD_SIZE] = [
    "1\u{FE0F}\u{20E3}",
    "2\u{FE0F}\u{20E3}",
    "3\u{FE0F}\u{20E3}",
    "4\u{FE0F}\u{20E3}",
    "5\u{FE0F}\u{20E3}",
    "6\u{FE0F}\u{20E3}",
    "7\u{FE0F}\u{20E3}",
    "8\u{FE0F}\u{20E3}",
    "9\u{FE0F}\u{20E3}",
];

/// Column buttons, placed on the prompt message. Regional indicators A through I.
pub const COLUMN_SYMBOLS: [&str; MAX_BOARD_SIZE] = [
    "\u{1F1E6}",
    "\u{1F1E7}",
    "\u{1F1E8}",
    "\u{1F1E9}",
    "\u{1F1EA}",
    "\u{1F1EB}",
    "\u{1F1EC}",
    "\u{1F1ED}",
    "\u{1F1EE}",
];

// =============================================================================
// Tiles and Colors
// =============================================================================

/// Empty intersection in the text rendering.
pub const BLANK_TILE: &str = "\u{2795}";

/// Stone of the player who moves first.
pub const BLACK_TILE: &str = "\u{26AB}";

/// Stone of the player who moves second.
pub const WHITE_TILE: &str = "\u{26AA}";

pub const BLACK_COLOR: (u8, u8, u8) = (0, 0, 0);

pub const WHITE_COLOR: (u8, u8, u8) = (255, 255, 255);

// =============================================================================
// Prompts
// =============================================================================

pub const PROMPT_PLACEMENT: &str = "Make your placement:";

pub const PROMPT_INVALID: &str = "Invalid Placement:";

pub const PROMPT_OPPONENT: &str = "Your opponent chose:";

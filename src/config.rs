//! Engine configuration.
//!
//! Loaded from an optional JSON file and then overridden by command line
//! flags in `main`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};

/// Who places the first stone of a new match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FirstMove {
    /// Coin flip between the two players
    #[default]
    Random,
    /// The player who issued the challenge
    Challenger,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: usize,
    pub first_move: FirstMove,
    /// Print the board after every selection event
    pub verbose: bool,
    /// Where finished matches write their replay frames
    pub replay_dir: Option<PathBuf>,
    /// Seed for the first-move coin flip
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            first_move: FirstMove::default(),
            verbose: false,
            replay_dir: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Board size is zero or has no reaction symbol for its last row/column
    BoardSize(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BoardSize(size) => write!(
                f,
                "unacceptable board size {size}, must be between 1 and {MAX_BOARD_SIZE}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Could not parse config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        Ok(())
    }
}

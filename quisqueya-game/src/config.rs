//! Runtime configuration: file locations, game size and leaderboard bounds.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_PLAYER_NAME, DEFAULT_QUESTIONS_DIR, DEFAULT_QUESTIONS_FALLBACK, DEFAULT_SCORES_FILE,
    LEADERBOARD_DEFAULT_SIZE, LEADERBOARD_MAX_SIZE, MAX_QUESTIONS_PER_GAME,
};

/// Errors raised when configuration cannot be read or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("questions_per_game must be between 1 and {max} (got {value})")]
    QuestionsPerGame { value: usize, max: usize },
    #[error("leaderboard default {default} must be between 1 and max {max}")]
    LeaderboardRange { default: usize, max: usize },
}

/// Configuration for a quiz process. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub questions_dir: PathBuf,
    pub questions_fallback: PathBuf,
    pub scores_file: PathBuf,
    pub questions_per_game: usize,
    pub leaderboard_default: usize,
    pub leaderboard_max: usize,
    pub default_player: String,
    /// Short cosmetic pauses between screens.
    pub pauses: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            questions_dir: PathBuf::from(DEFAULT_QUESTIONS_DIR),
            questions_fallback: PathBuf::from(DEFAULT_QUESTIONS_FALLBACK),
            scores_file: PathBuf::from(DEFAULT_SCORES_FILE),
            questions_per_game: MAX_QUESTIONS_PER_GAME,
            leaderboard_default: LEADERBOARD_DEFAULT_SIZE,
            leaderboard_max: LEADERBOARD_MAX_SIZE,
            default_player: DEFAULT_PLAYER_NAME.to_string(),
            pauses: true,
        }
    }
}

impl QuizConfig {
    /// Parse configuration from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the numeric bounds.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions_per_game == 0 || self.questions_per_game > MAX_QUESTIONS_PER_GAME {
            return Err(ConfigError::QuestionsPerGame {
                value: self.questions_per_game,
                max: MAX_QUESTIONS_PER_GAME,
            });
        }
        if self.leaderboard_default == 0 || self.leaderboard_default > self.leaderboard_max {
            return Err(ConfigError::LeaderboardRange {
                default: self.leaderboard_default,
                max: self.leaderboard_max,
            });
        }
        Ok(())
    }
}

//! Centralized rules and defaults for Quisqueya quiz logic.
//!
//! These values define the game rules. Keeping them together ensures the
//! scoring and sampling behaviour can only be adjusted via reviewed code
//! changes rather than through external JSON assets.

// Sampling -----------------------------------------------------------------
/// Hard cap on the number of questions drawn for a single game.
pub const MAX_QUESTIONS_PER_GAME: usize = 10;

// Scoring ------------------------------------------------------------------
/// Points awarded for each correct answer.
pub const POINTS_PER_CORRECT: u32 = 1;
/// Theme/level label stored when the sampled questions disagree.
pub const MIXED_LABEL: &str = "mix";

// Players ------------------------------------------------------------------
/// Name used when the player submits an empty name.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

// Answer loop --------------------------------------------------------------
/// Responses that request leaving the current game (compared case-insensitively).
pub const ABORT_KEYWORDS: [&str; 4] = ["0", "q", "quit", "quitter"];
/// Responses that confirm a yes/no question (compared case-insensitively).
pub const AFFIRMATIVE_KEYWORDS: [&str; 4] = ["o", "oui", "y", "yes"];

// Files --------------------------------------------------------------------
pub const DEFAULT_QUESTIONS_DIR: &str = "questions";
pub const DEFAULT_QUESTIONS_FALLBACK: &str = "questions.json";
pub const DEFAULT_SCORES_FILE: &str = "scores.json";
/// Extension given to the staging file written before the atomic rename.
pub const STAGING_EXTENSION: &str = "tmp";

// Leaderboard --------------------------------------------------------------
pub const LEADERBOARD_DEFAULT_SIZE: usize = 10;
pub const LEADERBOARD_MAX_SIZE: usize = 50;

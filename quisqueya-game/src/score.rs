//! Completed-game score records and per-player statistics.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MIXED_LABEL, POINTS_PER_CORRECT};
use crate::numbers::{clamp_seconds, len_to_u32, mean_to_tenth, percentage};
use crate::question::Question;

/// One completed game as persisted in the score ledger.
///
/// Older ledgers written with French keys are read through the aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(alias = "id_partie")]
    pub game_id: String,
    #[serde(alias = "joueur_nom")]
    pub player: String,
    /// RFC 3339 UTC text; ranking compares it as plain text.
    #[serde(alias = "date_heure")]
    pub timestamp: String,
    pub theme: String,
    #[serde(alias = "niveau")]
    pub level: String,
    #[serde(alias = "nombre_questions")]
    pub question_count: u32,
    #[serde(alias = "bonnes")]
    pub correct: u32,
    #[serde(alias = "mauvaises")]
    pub incorrect: u32,
    #[serde(alias = "score_total")]
    pub score: u32,
    #[serde(alias = "pourcentage")]
    pub percentage: f64,
    #[serde(alias = "duree_seconds")]
    pub duration_seconds: u64,
}

/// Answer counters accumulated by a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub correct: u32,
    pub incorrect: u32,
}

impl Tally {
    #[must_use]
    pub const fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.correct * POINTS_PER_CORRECT
    }
}

impl ScoreRecord {
    /// Build the record for a completed game over `questions`.
    ///
    /// A missing start instant yields a zero duration.
    #[must_use]
    pub fn completed(
        player: &str,
        questions: &[Question],
        tally: Tally,
        started: Option<DateTime<Utc>>,
        finished: DateTime<Utc>,
    ) -> Self {
        let total = len_to_u32(questions.len());
        let duration_seconds =
            started.map_or(0, |start| clamp_seconds((finished - start).num_seconds()));
        Self {
            game_id: format!("{player}_{}", finished.timestamp()),
            player: player.to_string(),
            timestamp: finished.to_rfc3339_opts(SecondsFormat::Secs, true),
            theme: homogeneous_label(questions.iter().map(Question::theme)),
            level: homogeneous_label(questions.iter().map(Question::level)),
            question_count: total,
            correct: tally.correct,
            incorrect: tally.incorrect,
            score: tally.score(),
            percentage: percentage(tally.correct, total),
            duration_seconds,
        }
    }

    /// Case-insensitive exact match on the player name.
    #[must_use]
    pub fn is_player(&self, name: &str) -> bool {
        self.player.to_lowercase() == name.to_lowercase()
    }

    /// Calendar date portion of the timestamp.
    #[must_use]
    pub fn date(&self) -> &str {
        self.timestamp.get(..10).unwrap_or(&self.timestamp)
    }
}

/// The single shared label, or the mixed sentinel when labels differ (or there are none).
#[must_use]
pub fn homogeneous_label<'a>(mut labels: impl Iterator<Item = &'a str>) -> String {
    let Some(first) = labels.next() else {
        return MIXED_LABEL.to_string();
    };
    if labels.all(|label| label == first) {
        first.to_string()
    } else {
        MIXED_LABEL.to_string()
    }
}

/// History summary for one player name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerStats {
    pub games: usize,
    pub best_score: u32,
    /// Percentage of the first game that reached `best_score`.
    pub best_percentage: f64,
    pub average_percentage: f64,
}

impl PlayerStats {
    /// Summarize the given records; no records yields the zero-games result.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ScoreRecord>) -> Self {
        let mut best: Option<&ScoreRecord> = None;
        let mut percentages = Vec::new();
        for record in records {
            percentages.push(record.percentage);
            if best.is_none_or(|current| record.score > current.score) {
                best = Some(record);
            }
        }
        let Some(best) = best else {
            return Self::default();
        };
        Self {
            games: percentages.len(),
            best_score: best.score,
            best_percentage: best.percentage,
            average_percentage: mean_to_tenth(&percentages),
        }
    }

    #[must_use]
    pub const fn has_history(&self) -> bool {
        self.games > 0
    }
}

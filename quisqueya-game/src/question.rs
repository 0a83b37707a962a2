//! Validated multiple-choice question records.
use num_traits::cast::cast;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a candidate question entry is refused at load time.
#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("malformed entry (id {}): {source}", display_id(.id))]
    Malformed {
        id: Option<i64>,
        #[source]
        source: serde_json::Error,
    },
    #[error("question {id} has no options")]
    NoOptions { id: i64 },
    #[error("question {id} marks option {index} correct but only has {len} options")]
    CorrectOutOfRange { id: i64, index: i64, len: usize },
}

fn display_id(id: &Option<i64>) -> String {
    id.map_or_else(|| "?".to_string(), |id| id.to_string())
}

/// Wire shape of a question entry as found in question files.
///
/// Field names follow the French question files; English aliases are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub id: i64,
    pub theme: String,
    #[serde(alias = "level")]
    pub niveau: String,
    #[serde(alias = "prompt", alias = "text")]
    pub texte: String,
    pub options: Vec<String>,
    #[serde(
        alias = "correct",
        alias = "answer",
        deserialize_with = "whole_number"
    )]
    pub bonne_option: i64,
}

/// An integer, or a float with no fractional part (`1.0` reads as `1`).
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    number
        .as_f64()
        .filter(|value| value.fract() == 0.0)
        .and_then(cast::<f64, i64>)
        .ok_or_else(|| de::Error::custom(format!("expected a whole number, found {number}")))
}

/// An immutable question whose correct index is guaranteed in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: i64,
    theme: String,
    level: String,
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl Question {
    /// Build a question, enforcing `0 <= correct < options.len()`.
    ///
    /// # Errors
    ///
    /// Returns an error when there are no options or the correct index is out of range.
    pub fn new(
        id: i64,
        theme: impl Into<String>,
        level: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: i64,
    ) -> Result<Self, QuestionError> {
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }
        let index = usize::try_from(correct)
            .ok()
            .filter(|index| *index < options.len())
            .ok_or(QuestionError::CorrectOutOfRange {
                id,
                index: correct,
                len: options.len(),
            })?;
        Ok(Self {
            id,
            theme: theme.into(),
            level: level.into(),
            prompt: prompt.into(),
            options,
            correct: index,
        })
    }

    /// Validate a single JSON value taken from a question file.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing or mistyped, or the record fails validation.
    pub fn from_value(value: serde_json::Value) -> Result<Self, QuestionError> {
        let id = value.get("id").and_then(serde_json::Value::as_i64);
        let entry: QuestionEntry = serde_json::from_value(value)
            .map_err(|source| QuestionError::Malformed { id, source })?;
        Self::try_from(entry)
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Zero-based index of the correct option.
    #[must_use]
    pub const fn correct_index(&self) -> usize {
        self.correct
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct
    }
}

impl TryFrom<QuestionEntry> for Question {
    type Error = QuestionError;

    fn try_from(entry: QuestionEntry) -> Result<Self, Self::Error> {
        Self::new(
            entry.id,
            entry.theme,
            entry.niveau,
            entry.texte,
            entry.options,
            entry.bonne_option,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn accepts_in_range_index() {
        let q = Question::new(1, "History", "easy", "Who?", options(3), 2).unwrap();
        assert_eq!(q.correct_index(), 2);
        assert_eq!(q.correct_option(), "option 3");
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn rejects_out_of_range_and_negative_index() {
        let err = Question::new(7, "History", "easy", "Who?", options(3), 3).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectOutOfRange { id: 7, index: 3, len: 3 }
        ));
        let err = Question::new(8, "History", "easy", "Who?", options(3), -1).unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOutOfRange { index: -1, .. }));
    }

    #[test]
    fn rejects_empty_options() {
        let err = Question::new(2, "Geo", "hard", "Where?", Vec::new(), 0).unwrap_err();
        assert!(matches!(err, QuestionError::NoOptions { id: 2 }));
    }

    #[test]
    fn parses_french_and_english_field_names() {
        let french = json!({
            "id": 1,
            "theme": "Histoire",
            "niveau": "facile",
            "texte": "En quelle année ?",
            "options": ["1492", "1804"],
            "bonne_option": 1
        });
        let q = Question::from_value(french).unwrap();
        assert_eq!(q.level(), "facile");
        assert_eq!(q.prompt(), "En quelle année ?");

        let english = json!({
            "id": 2,
            "theme": "History",
            "level": "easy",
            "prompt": "Which year?",
            "options": ["1492", "1804"],
            "correct": 0
        });
        let q = Question::from_value(english).unwrap();
        assert_eq!(q.correct_option(), "1492");
    }

    #[test]
    fn whole_float_index_is_accepted() {
        let entry = |correct: serde_json::Value| {
            json!({
                "id": 5,
                "theme": "Géographie",
                "niveau": "facile",
                "texte": "Capitale ?",
                "options": ["Jacmel", "Port-au-Prince"],
                "bonne_option": correct
            })
        };
        let q = Question::from_value(entry(json!(1.0))).unwrap();
        assert_eq!(q.correct_option(), "Port-au-Prince");

        let err = Question::from_value(entry(json!(1.5))).unwrap_err();
        assert!(matches!(err, QuestionError::Malformed { id: Some(5), .. }));
        let err = Question::from_value(entry(json!(2.0))).unwrap_err();
        assert!(matches!(err, QuestionError::CorrectOutOfRange { index: 2, .. }));
        assert!(Question::from_value(entry(json!("1"))).is_err());
    }

    #[test]
    fn missing_field_reports_the_approximate_id() {
        let value = json!({ "id": 12, "theme": "History", "options": ["a"] });
        let err = Question::from_value(value).unwrap_err();
        assert!(matches!(err, QuestionError::Malformed { id: Some(12), .. }));
        assert!(err.to_string().contains("id 12"));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let value = json!({
            "id": "three",
            "theme": "History",
            "niveau": "easy",
            "texte": "?",
            "options": ["a"],
            "bonne_option": 0
        });
        let err = Question::from_value(value).unwrap_err();
        assert!(matches!(err, QuestionError::Malformed { id: None, .. }));
    }
}

//! Question bank: loading, theme listing, filtering and sampling.
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::MAX_QUESTIONS_PER_GAME;
use crate::question::{Question, QuestionError};

/// Diagnostics raised while loading question files. None of them abort a load.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} does not contain a list of questions, skipped", .path.display())]
    NotASequence { path: PathBuf },
    #[error("skipped entry in {}: {source}", .path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: QuestionError,
    },
}

/// Outcome of a bank load: how many files were consulted and what was skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub files_read: usize,
    pub accepted: usize,
    pub skipped: Vec<BankError>,
}

impl LoadReport {
    fn skip(&mut self, err: BankError) {
        log::warn!("{err}");
        self.skipped.push(err);
    }
}

/// In-memory collection of validated questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Load every `*.json` file in `dir` (sorted by name), or `fallback` when
    /// `dir` is not a directory.
    ///
    /// Invalid entries and files are logged and skipped; loading never fails.
    pub fn load(dir: &Path, fallback: &Path) -> (Self, LoadReport) {
        let mut bank = Self::default();
        let mut report = LoadReport::default();

        if dir.is_dir() {
            match json_files_in(dir) {
                Ok(files) => {
                    for file in files {
                        bank.load_file(&file, &mut report);
                    }
                }
                Err(source) => report.skip(BankError::Unreadable {
                    path: dir.to_path_buf(),
                    source,
                }),
            }
        } else if fallback.is_file() {
            bank.load_file(fallback, &mut report);
        } else {
            log::info!(
                "no question directory at {} and no fallback at {}",
                dir.display(),
                fallback.display()
            );
        }

        log::info!(
            "loaded {} questions from {} files ({} skipped)",
            report.accepted,
            report.files_read,
            report.skipped.len()
        );
        (bank, report)
    }

    /// Merge the questions of one file into the bank.
    pub fn load_file(&mut self, path: &Path, report: &mut LoadReport) {
        report.files_read += 1;
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) => {
                report.skip(BankError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                });
                return;
            }
        };
        self.load_json(&raw, path, report);
    }

    /// Merge the questions of one JSON document into the bank.
    ///
    /// `origin` only labels diagnostics.
    pub fn load_json(&mut self, raw: &str, origin: &Path, report: &mut LoadReport) {
        let document: serde_json::Value = match serde_json::from_str(raw) {
            Ok(document) => document,
            Err(source) => {
                report.skip(BankError::InvalidJson {
                    path: origin.to_path_buf(),
                    source,
                });
                return;
            }
        };
        let serde_json::Value::Array(entries) = document else {
            report.skip(BankError::NotASequence {
                path: origin.to_path_buf(),
            });
            return;
        };

        for entry in entries {
            match Question::from_value(entry) {
                Ok(question) => {
                    self.questions.push(question);
                    report.accepted += 1;
                }
                Err(source) => report.skip(BankError::Entry {
                    path: origin.to_path_buf(),
                    source,
                }),
            }
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct theme labels in alphabetical order.
    #[must_use]
    pub fn list_themes(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| q.theme().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Questions matching the theme and level sets. `None` or an empty set matches everything.
    #[must_use]
    pub fn filter(&self, themes: Option<&[String]>, levels: Option<&[String]>) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| matches_any(themes, q.theme()))
            .filter(|q| matches_any(levels, q.level()))
            .collect()
    }

    /// Draw up to `min(count, 10)` distinct questions of the given themes, in random order.
    ///
    /// An empty result means no game can be played with these settings.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        themes: Option<&[String]>,
        rng: &mut R,
    ) -> Vec<Question> {
        let count = count.min(MAX_QUESTIONS_PER_GAME);
        let mut pool = self.filter(themes, None);
        if pool.is_empty() || count == 0 {
            return Vec::new();
        }
        let (picked, _) = pool.partial_shuffle(rng, count);
        picked.iter().map(|&q| q.clone()).collect()
    }
}

fn matches_any(filter: Option<&[String]>, value: &str) -> bool {
    match filter {
        Some(set) if !set.is_empty() => set.iter().any(|wanted| wanted == value),
        _ => true,
    }
}

fn json_files_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    fn question(id: i64, theme: &str, level: &str) -> Question {
        Question::new(
            id,
            theme,
            level,
            format!("Question {id}?"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            0,
        )
        .unwrap()
    }

    fn mixed_bank() -> QuestionBank {
        QuestionBank::from_questions(vec![
            question(1, "History", "easy"),
            question(2, "Geography", "hard"),
            question(3, "History", "hard"),
            question(4, "Culture", "easy"),
            question(5, "Geography", "easy"),
        ])
    }

    #[test]
    fn themes_are_sorted_and_unique() {
        assert_eq!(
            mixed_bank().list_themes(),
            vec!["Culture", "Geography", "History"]
        );
    }

    #[test]
    fn filter_combines_theme_and_level() {
        let bank = mixed_bank();
        let themes = vec!["History".to_string()];
        let levels = vec!["hard".to_string()];
        let ids: Vec<i64> = bank
            .filter(Some(themes.as_slice()), Some(levels.as_slice()))
            .iter()
            .map(|q| q.id())
            .collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(bank.filter(None, None).len(), 5);
        assert_eq!(bank.filter(Some(Vec::new().as_slice()), None).len(), 5);
        assert_eq!(bank.len(), 5, "filtering must not touch the master list");
    }

    #[test]
    fn sample_returns_whole_small_pool_once() {
        let bank = QuestionBank::from_questions(vec![
            question(1, "History", "easy"),
            question(2, "History", "easy"),
            question(3, "History", "easy"),
        ]);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let drawn = bank.sample(10, None, &mut rng);
        let ids: HashSet<i64> = drawn.iter().map(Question::id).collect();
        assert_eq!(drawn.len(), 3);
        assert_eq!(ids, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn sample_caps_at_ten_without_repeats() {
        let questions = (0..25).map(|id| question(id, "Mixed", "easy")).collect();
        let bank = QuestionBank::from_questions(questions);
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        for requested in [1, 4, 10, 40] {
            let drawn = bank.sample(requested, None, &mut rng);
            assert_eq!(drawn.len(), requested.min(10));
            let ids: HashSet<i64> = drawn.iter().map(Question::id).collect();
            assert_eq!(ids.len(), drawn.len());
        }
    }

    #[test]
    fn sample_respects_theme_and_empty_pool() {
        let bank = mixed_bank();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let geo = vec!["Geography".to_string()];
        let drawn = bank.sample(10, Some(geo.as_slice()), &mut rng);
        assert_eq!(drawn.len(), 2);
        assert!(drawn.iter().all(|q| q.theme() == "Geography"));

        let unknown = vec!["Sports".to_string()];
        assert!(bank.sample(10, Some(unknown.as_slice()), &mut rng).is_empty());
        assert!(bank.sample(0, None, &mut rng).is_empty());
    }

    #[test]
    fn load_json_skips_bad_entries_and_keeps_good_ones() {
        let raw = r#"[
            {"id": 1, "theme": "History", "niveau": "easy", "texte": "A?", "options": ["x", "y"], "bonne_option": 1},
            {"id": 2, "theme": "History", "niveau": "easy", "texte": "B?", "options": ["x", "y"], "bonne_option": 2},
            {"id": 3, "theme": "History", "texte": "C?", "options": ["x"], "bonne_option": 0},
            {"id": 1, "theme": "Geo", "niveau": "hard", "texte": "D?", "options": ["x"], "bonne_option": 0}
        ]"#;
        let mut bank = QuestionBank::default();
        let mut report = LoadReport::default();
        bank.load_json(raw, Path::new("inline.json"), &mut report);
        assert_eq!(bank.len(), 2, "duplicate ids are tolerated");
        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(
            bank.questions()
                .iter()
                .all(|q| q.correct_index() < q.options().len())
        );
    }

    #[test]
    fn load_json_rejects_non_sequence_documents() {
        let mut bank = QuestionBank::default();
        let mut report = LoadReport::default();
        bank.load_json(r#"{"questions": []}"#, Path::new("obj.json"), &mut report);
        bank.load_json("not json", Path::new("broken.json"), &mut report);
        assert!(bank.is_empty());
        assert!(matches!(report.skipped[0], BankError::NotASequence { .. }));
        assert!(matches!(report.skipped[1], BankError::InvalidJson { .. }));
    }
}

//! Quisqueya Quiz Engine
//!
//! Platform-agnostic core logic for the Quisqueya terminal trivia game: the
//! question bank, the score ledger, player-name resolution and the session engine.
//! Terminal I/O lives behind the `IdentityPrompt` and `SessionIo` traits.

pub mod answer;
pub mod bank;
pub mod config;
pub mod constants;
pub mod identity;
pub mod ledger;
pub mod numbers;
pub mod question;
pub mod score;
pub mod session;

// Re-export commonly used types
pub use answer::{AnswerError, Response, interpret, is_abort, is_affirmative, parse_bounded};
pub use bank::{BankError, LoadReport, QuestionBank};
pub use config::{ConfigError, QuizConfig};
pub use identity::{IdentityChoice, IdentityPrompt, IdentityResolver, Recognition};
pub use ledger::{JsonFileStore, Ledger, LedgerError, MemoryStore, ScoreStore};
pub use question::{Question, QuestionEntry, QuestionError};
pub use score::{PlayerStats, ScoreRecord, Tally, homogeneous_label};
pub use session::{
    Clock, QuizSession, SaveStatus, SessionError, SessionEvent, SessionIo, SessionOutcome,
    SessionState, SystemClock,
};

use rand::Rng;
use std::collections::BTreeSet;

/// Which questions a game draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameMode {
    /// Random questions across every theme.
    Quick,
    /// Random questions of a single theme.
    Theme(String),
}

impl GameMode {
    fn themes(&self) -> Option<Vec<String>> {
        match self {
            Self::Quick => None,
            Self::Theme(theme) => Some(vec![theme.clone()]),
        }
    }
}

/// How a request to play ended.
#[derive(Debug)]
pub enum PlayOutcome {
    /// The player cancelled name selection.
    Cancelled,
    /// No question matched the mode; no game was possible.
    NoQuestions,
    Played(SessionOutcome),
}

/// Context owned by the top-level loop: the bank, the ledger and the game rules.
#[derive(Debug)]
pub struct QuizContext<S: ScoreStore> {
    bank: QuestionBank,
    ledger: Ledger<S>,
    resolver: IdentityResolver,
    questions_per_game: usize,
}

impl<S: ScoreStore> QuizContext<S> {
    #[must_use]
    pub fn new(bank: QuestionBank, ledger: Ledger<S>, config: &QuizConfig) -> Self {
        Self {
            bank,
            ledger,
            resolver: IdentityResolver::new(config.default_player.clone()),
            questions_per_game: config.questions_per_game,
        }
    }

    #[must_use]
    pub const fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Themes offered by the leaderboard filter: bank themes plus recorded themes.
    #[must_use]
    pub fn leaderboard_themes(&self) -> Vec<String> {
        self.bank
            .list_themes()
            .into_iter()
            .chain(self.ledger.distinct_themes())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolve the player, draw the questions and run one game.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session engine refuses to start.
    pub fn play<F, R, C>(
        &self,
        mode: &GameMode,
        frontend: &mut F,
        rng: &mut R,
        clock: C,
    ) -> Result<PlayOutcome, SessionError>
    where
        F: IdentityPrompt + SessionIo + ?Sized,
        R: Rng + ?Sized,
        C: Clock,
    {
        let Some(player) = self.resolver.resolve(&self.ledger, frontend) else {
            log::debug!("name selection cancelled");
            return Ok(PlayOutcome::Cancelled);
        };

        let themes = mode.themes();
        let questions = self
            .bank
            .sample(self.questions_per_game, themes.as_deref(), rng);
        if questions.is_empty() {
            log::warn!("no questions available for {mode:?}");
            return Ok(PlayOutcome::NoQuestions);
        }

        let mut session = QuizSession::with_clock(player, questions, clock);
        session.run(&self.ledger, frontend).map(PlayOutcome::Played)
    }
}

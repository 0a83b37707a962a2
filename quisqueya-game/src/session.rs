//! Session engine: runs one game from the first question to completion or abort.
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::answer::{AnswerError, Response, interpret};
use crate::ledger::{Ledger, LedgerError, ScoreStore};
use crate::question::Question;
use crate::score::{ScoreRecord, Tally};

/// Source of wall-clock time for start/end instants.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
    Aborted,
}

/// Something the front-end should show the player.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    Started {
        player: &'a str,
        total: usize,
    },
    /// Display (or re-display) a question. `number` counts from 1.
    Question {
        question: &'a Question,
        number: usize,
        total: usize,
    },
    InvalidChoice {
        error: &'a AnswerError,
        option_count: usize,
    },
    /// The player declined to confirm an abort request.
    Resumed,
    Correct,
    Incorrect {
        correct_option: &'a str,
    },
    /// The game was left early; nothing was saved.
    Aborted {
        answered: u32,
        total: usize,
        correct: u32,
    },
    Completed {
        record: &'a ScoreRecord,
    },
    Saved,
    SaveFailed {
        error: &'a LedgerError,
    },
}

/// Interactive side of a game, provided by the front-end.
pub trait SessionIo {
    /// Read one response line. End of input reads as an empty line.
    fn read_response(&mut self) -> String;

    /// Ask whether an abort request is meant. Returning `false` resumes the game.
    fn confirm_abort(&mut self) -> bool;

    fn notify(&mut self, event: SessionEvent<'_>);
}

/// Whether a completed game reached the ledger.
#[derive(Debug)]
pub enum SaveStatus {
    Saved,
    Failed(LedgerError),
}

impl SaveStatus {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Result of running a session.
#[derive(Debug)]
pub enum SessionOutcome {
    /// All questions answered. The record is returned even when saving failed.
    Completed {
        record: ScoreRecord,
        save: SaveStatus,
    },
    Aborted {
        answered: u32,
        total: usize,
        correct: u32,
    },
}

impl SessionOutcome {
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match self {
            Self::Completed { .. } => SessionState::Completed,
            Self::Aborted { .. } => SessionState::Aborted,
        }
    }

    #[must_use]
    pub const fn record(&self) -> Option<&ScoreRecord> {
        match self {
            Self::Completed { record, .. } => Some(record),
            Self::Aborted { .. } => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session already ran and ended as {0:?}")]
    AlreadyRun(SessionState),
}

enum Step {
    Answered,
    Abort,
}

/// One game over a fixed question sequence.
#[derive(Debug)]
pub struct QuizSession<C: Clock = SystemClock> {
    player: String,
    questions: Vec<Question>,
    clock: C,
    state: SessionState,
    tally: Tally,
    started: Option<DateTime<Utc>>,
}

impl QuizSession<SystemClock> {
    #[must_use]
    pub fn new(player: impl Into<String>, questions: Vec<Question>) -> Self {
        Self::with_clock(player, questions, SystemClock)
    }
}

impl<C: Clock> QuizSession<C> {
    #[must_use]
    pub fn with_clock(player: impl Into<String>, questions: Vec<Question>, clock: C) -> Self {
        Self {
            player: player.into(),
            questions,
            clock,
            state: SessionState::NotStarted,
            tally: Tally::default(),
            started: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn tally(&self) -> Tally {
        self.tally
    }

    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Play every question in order, then persist the result when the game completes.
    ///
    /// An aborted game never touches the ledger. A failed save is reported through
    /// the returned outcome; the completed record is still returned.
    ///
    /// # Errors
    ///
    /// Returns an error if this session has already been run.
    pub fn run<S, IO>(
        &mut self,
        ledger: &Ledger<S>,
        io: &mut IO,
    ) -> Result<SessionOutcome, SessionError>
    where
        S: ScoreStore,
        IO: SessionIo + ?Sized,
    {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyRun(self.state));
        }
        self.state = SessionState::InProgress;
        self.started = Some(self.clock.now());
        let total = self.questions.len();
        log::info!("game started for {} with {total} questions", self.player);
        io.notify(SessionEvent::Started {
            player: &self.player,
            total,
        });

        for index in 0..total {
            if let Step::Abort = self.ask(index, io) {
                return Ok(self.abort(io));
            }
        }

        Ok(self.complete(ledger, io))
    }

    fn ask<IO: SessionIo + ?Sized>(&mut self, index: usize, io: &mut IO) -> Step {
        let question = &self.questions[index];
        let total = self.questions.len();
        let option_count = question.options().len();
        io.notify(SessionEvent::Question {
            question,
            number: index + 1,
            total,
        });

        loop {
            let response = io.read_response();
            match interpret(&response, option_count) {
                Ok(Response::Abort) => {
                    if io.confirm_abort() {
                        return Step::Abort;
                    }
                    io.notify(SessionEvent::Resumed);
                    io.notify(SessionEvent::Question {
                        question,
                        number: index + 1,
                        total,
                    });
                }
                Ok(Response::Choice(choice)) => {
                    if question.is_correct(choice) {
                        self.tally.correct += 1;
                        io.notify(SessionEvent::Correct);
                    } else {
                        self.tally.incorrect += 1;
                        io.notify(SessionEvent::Incorrect {
                            correct_option: question.correct_option(),
                        });
                    }
                    return Step::Answered;
                }
                Err(error) => {
                    log::debug!("rejected response {response:?}: {error}");
                    io.notify(SessionEvent::InvalidChoice {
                        error: &error,
                        option_count,
                    });
                }
            }
        }
    }

    fn abort<IO: SessionIo + ?Sized>(&mut self, io: &mut IO) -> SessionOutcome {
        self.state = SessionState::Aborted;
        let answered = self.tally.answered();
        let total = self.questions.len();
        let correct = self.tally.correct;
        log::info!(
            "game aborted by {} after {answered}/{total} answers",
            self.player
        );
        io.notify(SessionEvent::Aborted {
            answered,
            total,
            correct,
        });
        SessionOutcome::Aborted {
            answered,
            total,
            correct,
        }
    }

    fn complete<S, IO>(&mut self, ledger: &Ledger<S>, io: &mut IO) -> SessionOutcome
    where
        S: ScoreStore,
        IO: SessionIo + ?Sized,
    {
        self.state = SessionState::Completed;
        let finished = self.clock.now();
        let record = ScoreRecord::completed(
            &self.player,
            &self.questions,
            self.tally,
            self.started,
            finished,
        );
        log::info!(
            "game {} completed: {}/{} ({}%)",
            record.game_id,
            record.correct,
            record.question_count,
            record.percentage
        );
        io.notify(SessionEvent::Completed { record: &record });

        let save = match ledger.append(record.clone()) {
            Ok(()) => {
                io.notify(SessionEvent::Saved);
                SaveStatus::Saved
            }
            Err(error) => {
                io.notify(SessionEvent::SaveFailed { error: &error });
                SaveStatus::Failed(error)
            }
        };
        SessionOutcome::Completed { record, save }
    }
}

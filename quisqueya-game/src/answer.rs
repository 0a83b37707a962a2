//! Interpretation of typed responses: answers, abort requests, menu numbers.
use thiserror::Error;

use crate::constants::{ABORT_KEYWORDS, AFFIRMATIVE_KEYWORDS};

/// A typed line that cannot be used as a choice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
}

/// What a response typed during the answer loop means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The player asked to leave the game (still needs confirmation).
    Abort,
    /// Zero-based option index.
    Choice(usize),
}

/// True for the quit tokens, ignoring case and surrounding whitespace.
#[must_use]
pub fn is_abort(input: &str) -> bool {
    let token = input.trim();
    ABORT_KEYWORDS
        .iter()
        .any(|keyword| token.eq_ignore_ascii_case(keyword))
}

/// True for yes-like confirmations, ignoring case and surrounding whitespace.
#[must_use]
pub fn is_affirmative(input: &str) -> bool {
    let token = input.trim();
    AFFIRMATIVE_KEYWORDS
        .iter()
        .any(|keyword| token.eq_ignore_ascii_case(keyword))
}

/// Parse an integer and check it lies in `min..=max`.
///
/// # Errors
///
/// Returns an error for non-numeric input or values outside the range.
pub fn parse_bounded(input: &str, min: i64, max: i64) -> Result<i64, AnswerError> {
    let token = input.trim();
    let value: i64 = token
        .parse()
        .map_err(|_| AnswerError::NotANumber(token.to_string()))?;
    if value < min || value > max {
        return Err(AnswerError::OutOfRange { value, min, max });
    }
    Ok(value)
}

/// Interpret a response to a question with `option_count` options (numbered from 1).
///
/// # Errors
///
/// Returns an error when the response is neither an abort keyword nor a valid option number.
pub fn interpret(input: &str, option_count: usize) -> Result<Response, AnswerError> {
    if is_abort(input) {
        return Ok(Response::Abort);
    }
    let max = i64::try_from(option_count).unwrap_or(i64::MAX);
    let value = parse_bounded(input, 1, max)?;
    let index = usize::try_from(value - 1).map_err(|_| AnswerError::OutOfRange {
        value,
        min: 1,
        max,
    })?;
    Ok(Response::Choice(index))
}

//! Line-based terminal front-end: prompts, pauses and the game's I/O traits.
use colored::Colorize;
use quisqueya_game::{
    AnswerError, IdentityChoice, IdentityPrompt, Recognition, SessionEvent, SessionIo,
    is_affirmative, parse_bounded,
};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::render;

/// Reads answers from `input` and prints screens to `output`.
///
/// Once `input` reaches end of file every prompt reads as an empty line, menus
/// fall back to "back"/"cancel", and a running game is left without saving.
/// A line read while the interrupt flag went up (Ctrl-C) is discarded and
/// reads as empty, but the input stays open.
pub struct Terminal<R, W> {
    input: R,
    output: W,
    pauses: bool,
    closed: bool,
    interrupted: Arc<AtomicBool>,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W, pauses: bool) -> Self {
        Self {
            input,
            output,
            pauses,
            closed: false,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share the flag raised by the Ctrl-C handler.
    #[must_use]
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = interrupted;
        self
    }

    /// True once the input stream is exhausted or unreadable.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.output, "{text}") {
            log::warn!("cannot write to terminal: {err}");
        }
    }

    /// Print `prompt` and read one line without its line ending.
    pub fn ask(&mut self, prompt: &str) -> String {
        if let Err(err) = write!(self.output, "{prompt}").and_then(|()| self.output.flush()) {
            log::warn!("cannot write to terminal: {err}");
        }
        if self.closed {
            return String::new();
        }
        // only an interrupt raised while this prompt waits counts
        self.interrupted.store(false, Ordering::SeqCst);
        let mut line = String::new();
        let read = self.input.read_line(&mut line);
        if self.interrupted.swap(false, Ordering::SeqCst) {
            log::debug!("prompt interrupted, reply discarded");
            self.say("");
            return String::new();
        }
        match read {
            Ok(0) => {
                log::debug!("input closed");
                self.closed = true;
                self.say("");
                String::new()
            }
            Ok(_) => line.trim_end_matches(['\r', '\n']).to_string(),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                log::debug!("read interrupted");
                self.say("");
                String::new()
            }
            Err(err) => {
                log::warn!("cannot read input: {err}");
                self.closed = true;
                self.say("");
                String::new()
            }
        }
    }

    /// Ask for a whole number in `range` until one is given.
    ///
    /// An empty line yields `default` when there is one. Returns `None` only when
    /// the input is closed and there is no default.
    pub fn prompt_int(
        &mut self,
        prompt: &str,
        range: RangeInclusive<i64>,
        default: Option<i64>,
    ) -> Option<i64> {
        loop {
            let raw = self.ask(prompt);
            let token = raw.trim();
            if token.is_empty() {
                if default.is_some() {
                    return default;
                }
                if self.closed {
                    return None;
                }
            }
            match parse_bounded(token, *range.start(), *range.end()) {
                Ok(value) => return Some(value),
                Err(AnswerError::OutOfRange { min, max, .. }) => self.say(
                    format!("Invalid value - enter a whole number >= {min} and <= {max}.")
                        .as_str()
                        .yellow(),
                ),
                Err(AnswerError::NotANumber(_)) => {
                    self.say("Invalid input - please enter a whole number.".yellow());
                }
            }
        }
    }

    /// Print `items` numbered from 1 and return the zero-based index picked.
    ///
    /// With `allow_back`, `0` or an empty line returns `None`.
    pub fn choose_from(&mut self, items: &[String], prompt: &str, allow_back: bool) -> Option<usize> {
        if items.is_empty() {
            self.say("[No items available]");
            return None;
        }
        for (index, item) in items.iter().enumerate() {
            self.say(format!("{}) {item}", index + 1));
        }
        if allow_back {
            self.say("0) Back");
        }
        loop {
            let raw = self.ask(prompt);
            let token = raw.trim();
            if token.is_empty() && (allow_back || self.closed) {
                return None;
            }
            match token.parse::<usize>() {
                Ok(0) if allow_back => return None,
                Ok(number) if (1..=items.len()).contains(&number) => return Some(number - 1),
                Ok(_) => self.say("Choice out of range. Try again.".yellow()),
                Err(_) => self.say("Invalid choice - enter the matching number.".yellow()),
            }
        }
    }

    pub fn wait_for_enter(&mut self, prompt: &str) {
        self.ask(prompt);
    }

    /// Cosmetic delay between screens; skipped when pauses are off or input is closed.
    pub fn pause(&mut self, millis: u64) {
        if self.pauses && !self.closed {
            thread::sleep(Duration::from_millis(millis));
        }
    }

    #[cfg(test)]
    pub(crate) const fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> IdentityPrompt for Terminal<R, W> {
    fn ask_name(&mut self) -> String {
        self.ask("👤 Enter your name or nickname: ")
    }

    fn confirm_identity(&mut self, name: &str, recognition: &Recognition) -> IdentityChoice {
        self.say(render::identity_notice(name, recognition));
        match self.prompt_int("➤ Your choice: ", 0..=2, None) {
            Some(1) => IdentityChoice::Confirm,
            Some(2) => {
                self.say("\nPlease choose another name.\n");
                IdentityChoice::Reject
            }
            _ => IdentityChoice::Cancel,
        }
    }

    fn welcome(&mut self, name: &str, recognition: &Recognition) {
        self.say(render::welcome(name, recognition));
        self.pause(1000);
    }
}

impl<R: BufRead, W: Write> SessionIo for Terminal<R, W> {
    fn read_response(&mut self) -> String {
        let response = self.ask("Your answer (number): ");
        if self.closed {
            // Nobody is left to answer: request an abort, which `confirm_abort` accepts.
            return "q".to_string();
        }
        response
    }

    fn confirm_abort(&mut self) -> bool {
        let reply = self.ask("\n⚠️  Do you really want to leave the quiz? (y/N): ");
        self.closed || is_affirmative(&reply)
    }

    fn notify(&mut self, event: SessionEvent<'_>) {
        match event {
            SessionEvent::Started { player, total } => {
                self.say(render::game_start(player, total));
                self.pause(800);
            }
            SessionEvent::Question {
                question,
                number,
                total,
            } => self.say(render::question(question, number, total)),
            SessionEvent::InvalidChoice { option_count, .. } => {
                self.say(render::invalid_choice(option_count));
                self.pause(1000);
            }
            SessionEvent::Resumed => {
                self.say("\nLet's carry on!");
                self.pause(500);
            }
            SessionEvent::Correct => {
                self.say(render::correct());
                self.pause(1100);
            }
            SessionEvent::Incorrect { correct_option } => {
                self.say(render::incorrect(correct_option));
                self.pause(1100);
            }
            SessionEvent::Aborted {
                answered,
                total,
                correct,
            } => self.say(render::abort_report(answered, total, correct)),
            SessionEvent::Completed { record } => self.say(render::summary(record)),
            SessionEvent::Saved => self.say(render::saved()),
            SessionEvent::SaveFailed { error } => self.say(render::save_failed(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn terminal(input: &str) -> Terminal<&[u8], Vec<u8>> {
        Terminal::new(input.as_bytes(), Vec::new(), false)
    }

    fn printed(term: &Terminal<&[u8], Vec<u8>>) -> String {
        String::from_utf8_lossy(term.output()).into_owned()
    }

    /// Raises the interrupt flag on its first read, like Ctrl-C pressed while
    /// the first prompt waits for a line.
    struct CtrlCOnFirstRead {
        data: &'static [u8],
        flag: Arc<AtomicBool>,
        fired: bool,
    }

    impl io::Read for CtrlCOnFirstRead {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.fired {
                self.fired = true;
                self.flag.store(true, Ordering::SeqCst);
            }
            self.data.read(buf)
        }
    }

    fn interrupted_terminal(
        input: &'static str,
    ) -> Terminal<io::BufReader<CtrlCOnFirstRead>, Vec<u8>> {
        let flag = Arc::new(AtomicBool::new(false));
        let reader = CtrlCOnFirstRead {
            data: input.as_bytes(),
            flag: Arc::clone(&flag),
            fired: false,
        };
        // a one-byte buffer keeps later lines behind further reads
        Terminal::new(io::BufReader::with_capacity(1, reader), Vec::new(), false)
            .with_interrupt(flag)
    }

    #[test]
    fn prompt_int_reprompts_until_in_range() {
        let mut term = terminal("abc\n99\n7\n");
        assert_eq!(term.prompt_int("n? ", 1..=50, None), Some(7));
        let out = printed(&term);
        assert!(out.contains("please enter a whole number"));
        assert!(out.contains(">= 1 and <= 50"));
    }

    #[test]
    fn prompt_int_uses_default_on_empty_line() {
        let mut term = terminal("\n");
        assert_eq!(term.prompt_int("n? ", 1..=50, Some(10)), Some(10));
    }

    #[test]
    fn closed_input_without_default_gives_none() {
        let mut term = terminal("");
        assert_eq!(term.prompt_int("n? ", 1..=4, None), None);
        assert!(term.is_closed());
        assert_eq!(term.prompt_int("n? ", 1..=4, Some(2)), Some(2));
    }

    #[test]
    fn choose_from_supports_back() {
        let items = vec!["Geography".to_string(), "History".to_string()];
        let mut term = terminal("5\nx\n2\n");
        assert_eq!(term.choose_from(&items, "> ", true), Some(1));
        let out = printed(&term);
        assert!(out.contains("1) Geography"));
        assert!(out.contains("0) Back"));
        assert!(out.contains("out of range"));

        let mut term = terminal("0\n");
        assert_eq!(term.choose_from(&items, "> ", true), None);
        let mut term = terminal("\n");
        assert_eq!(term.choose_from(&items, "> ", true), None);
        assert_eq!(terminal("").choose_from(&[], "> ", false), None);
    }

    #[test]
    fn identity_menu_maps_numbers_to_choices() {
        let recognition = Recognition::FirstTime;
        assert_eq!(
            terminal("1\n").confirm_identity("Ana", &recognition),
            IdentityChoice::Confirm
        );
        assert_eq!(
            terminal("3\n2\n").confirm_identity("Ana", &recognition),
            IdentityChoice::Reject
        );
        assert_eq!(
            terminal("0\n").confirm_identity("Ana", &recognition),
            IdentityChoice::Cancel
        );
        assert_eq!(
            terminal("").confirm_identity("Ana", &recognition),
            IdentityChoice::Cancel
        );
    }

    #[test]
    fn abort_confirmation_needs_a_yes() {
        assert!(terminal("oui\n").confirm_abort());
        assert!(terminal("Y\n").confirm_abort());
        assert!(!terminal("\n").confirm_abort());
        assert!(!terminal("nope\n").confirm_abort());
    }

    #[test]
    fn ctrl_c_at_a_prompt_reads_as_empty_and_keeps_input_open() {
        let mut term = interrupted_terminal("7\n3\n");
        assert_eq!(term.ask("n? "), "");
        assert!(!term.is_closed());
        assert_eq!(term.ask("n? "), "3");

        let mut term = interrupted_terminal("7\n");
        assert_eq!(term.prompt_int("n? ", 1..=50, Some(10)), Some(10));

        let mut term = interrupted_terminal("y\n");
        assert!(!term.confirm_abort());
        assert!(!term.is_closed());
    }

    #[test]
    fn ctrl_c_during_a_question_is_not_an_answer() {
        let mut term = interrupted_terminal("1\n2\n");
        assert_eq!(term.read_response(), "");
        assert_eq!(term.read_response(), "2");
    }

    #[test]
    fn closed_input_leaves_the_game() {
        let mut term = terminal("2\n");
        assert_eq!(term.read_response(), "2");
        assert_eq!(term.read_response(), "q");
        assert!(term.confirm_abort());
    }
}

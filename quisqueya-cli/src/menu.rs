//! Main menu, play sub-menu, leaderboard and help screens.
use quisqueya_game::{GameMode, PlayOutcome, QuizConfig, QuizContext, ScoreStore, SystemClock};
use rand::Rng;
use std::io::{BufRead, Write};

use crate::render;
use crate::terminal::Terminal;

const BACK_TO_MENU: &str = "\nPress [ENTER] to return to the main menu...";

/// Entries of the main menu, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    Play,
    Leaderboard,
    Instructions,
    Quit,
}

impl MainChoice {
    const fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(Self::Play),
            2 => Some(Self::Leaderboard),
            3 => Some(Self::Instructions),
            4 => Some(Self::Quit),
            _ => None,
        }
    }
}

/// The interactive screens of one process run.
pub struct Menu<'a, S: ScoreStore, G: Rng> {
    ctx: &'a QuizContext<S>,
    rng: G,
    leaderboard_default: i64,
    leaderboard_max: i64,
}

impl<'a, S: ScoreStore, G: Rng> Menu<'a, S, G> {
    pub fn new(ctx: &'a QuizContext<S>, rng: G, config: &QuizConfig) -> Self {
        Self {
            ctx,
            rng,
            leaderboard_default: i64::try_from(config.leaderboard_default).unwrap_or(10),
            leaderboard_max: i64::try_from(config.leaderboard_max).unwrap_or(50),
        }
    }

    /// Loop on the main menu until the player confirms quitting or input closes.
    pub fn run<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>) {
        loop {
            term.say(render::main_menu());
            let choice = term
                .prompt_int("➤ Your choice (1-4): ", 1..=4, None)
                .and_then(MainChoice::from_number);
            log::debug!("main menu choice: {choice:?}");
            match choice {
                Some(MainChoice::Play) => self.play_menu(term),
                Some(MainChoice::Leaderboard) => self.leaderboard(term),
                Some(MainChoice::Instructions) => {
                    term.say(render::instructions());
                    term.wait_for_enter("\nPress [ENTER] to return to the menu...");
                }
                Some(MainChoice::Quit) => {
                    if confirm_quit(term) {
                        term.say(render::farewell());
                        return;
                    }
                }
                None => {
                    log::info!("input closed, leaving");
                    return;
                }
            }
        }
    }

    fn play_menu<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>) {
        loop {
            term.say(render::play_menu());
            match term.prompt_int("➤ Your choice: ", 0..=2, Some(0)) {
                Some(1) => {
                    term.say(render::section("⚡ QUICK MODE"));
                    self.play(term, &GameMode::Quick);
                }
                Some(2) => self.theme_mode(term),
                _ => return,
            }
            if term.is_closed() {
                return;
            }
        }
    }

    fn theme_mode<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>) {
        let themes = self.ctx.bank().list_themes();
        if themes.is_empty() {
            term.say("No theme available.");
            term.wait_for_enter("Press [ENTER] to go back...");
            return;
        }
        term.say("\nPick the quiz theme");
        let Some(index) = term.choose_from(&themes, "➤ Choose a theme: ", true) else {
            return;
        };
        self.play(term, &GameMode::Theme(themes[index].clone()));
    }

    fn play<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>, mode: &GameMode) {
        match self.ctx.play(mode, term, &mut self.rng, SystemClock) {
            Ok(PlayOutcome::Cancelled) => {}
            Ok(PlayOutcome::NoQuestions) => {
                term.say("\nNo questions available.");
                term.wait_for_enter("\nPress [ENTER] to go back...");
            }
            Ok(PlayOutcome::Played(_)) => term.wait_for_enter(BACK_TO_MENU),
            Err(err) => {
                log::error!("game could not run: {err}");
                term.say(format!("\n[Unexpected error] {err}"));
                term.wait_for_enter(BACK_TO_MENU);
            }
        }
    }

    fn leaderboard<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>) {
        term.say(render::section("LEADERBOARD"));
        let prompt = format!(
            " How many scores do you want to see? (1-{}, default: {}): ",
            self.leaderboard_max, self.leaderboard_default
        );
        let count = term
            .prompt_int(
                &prompt,
                1..=self.leaderboard_max,
                Some(self.leaderboard_default),
            )
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(1);

        let themes = self.ctx.leaderboard_themes();
        term.say(format!("\n{}\n FILTER BY THEME\n{}\n", render::rule('─'), render::rule('─')));
        let theme = if themes.is_empty() {
            term.say(" No theme available.");
            None
        } else {
            let options: Vec<String> = std::iter::once("All themes".to_string())
                .chain(themes.iter().cloned())
                .collect();
            term.say("Available themes:\n");
            let Some(index) =
                term.choose_from(&options, "➤ Choose a theme (or 0 to cancel): ", true)
            else {
                return;
            };
            index.checked_sub(1).map(|i| themes[i].as_str())
        };

        let top = self.ctx.ledger().top_n(count, theme);
        term.say(format!("\n{}", render::rule('─')));
        if top.is_empty() {
            term.say("\n No scores recorded yet.");
            term.say("   Play a game to appear on the leaderboard!");
        } else {
            match theme {
                Some(theme) => term.say(format!(" Theme: {theme}")),
                None => term.say(" All themes"),
            }
            term.say(format!("{}\n", render::rule('─')));
            for (rank, record) in top.iter().enumerate() {
                term.say(render::leaderboard_entry(rank + 1, record));
            }
        }
        term.say(render::rule('─'));
        term.wait_for_enter(BACK_TO_MENU);
    }
}

fn confirm_quit<R: BufRead, W: Write>(term: &mut Terminal<R, W>) -> bool {
    let reply = term.ask("❓ Are you sure you want to quit? (y/N): ");
    term.is_closed() || confirms_quit(&reply)
}

/// Any reply starting with `o` (oui) or `y` (yes), ignoring case.
fn confirms_quit(reply: &str) -> bool {
    reply
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| matches!(first.to_ascii_lowercase(), 'o' | 'y'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quisqueya_game::{Ledger, MemoryStore, Question, QuestionBank, ScoreRecord};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn context(records: Vec<ScoreRecord>) -> QuizContext<MemoryStore> {
        let questions = (1..=2)
            .map(|id| {
                Question::new(
                    id,
                    "History",
                    "easy",
                    format!("Q{id}?"),
                    vec!["right".into(), "wrong".into()],
                    0,
                )
                .unwrap()
            })
            .collect();
        QuizContext::new(
            QuestionBank::from_questions(questions),
            Ledger::new(MemoryStore::with_records(records)),
            &QuizConfig::default(),
        )
    }

    fn record(player: &str, score: u32, theme: &str) -> ScoreRecord {
        ScoreRecord {
            game_id: format!("{player}_1"),
            player: player.to_string(),
            timestamp: "2025-02-03T04:05:06Z".to_string(),
            theme: theme.to_string(),
            level: "easy".to_string(),
            question_count: 10,
            correct: score,
            incorrect: 10 - score,
            score,
            percentage: f64::from(score) * 10.0,
            duration_seconds: 30,
        }
    }

    fn run(ctx: &QuizContext<MemoryStore>, script: &str) -> String {
        let mut term = Terminal::new(script.as_bytes(), Vec::new(), false);
        let mut menu = Menu::new(ctx, ChaCha20Rng::seed_from_u64(7), &QuizConfig::default());
        menu.run(&mut term);
        String::from_utf8_lossy(term.output()).into_owned()
    }

    #[test]
    fn quick_game_is_played_and_saved() {
        let ctx = context(Vec::new());
        // play > quick > name > two right answers > enter > back > quit > yes
        let out = run(&ctx, "1\n1\nAna\n1\n1\n\n0\n4\ny\n");
        assert!(out.contains("This is your first game"));
        assert!(out.contains("Correct answers: 2/2 (100.0%)"));
        assert!(out.contains("Thanks for playing"));
        let saved = ctx.ledger().load_all();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].player, "Ana");
        assert_eq!(saved[0].score, 2);
    }

    #[test]
    fn theme_game_can_be_abandoned() {
        let ctx = context(Vec::new());
        // play > theme > History > name > abort > confirm > enter > back > quit > yes
        let out = run(&ctx, "1\n2\n1\nBo\nq\no\n\n0\n4\nyes\n");
        assert!(out.contains("1) History"));
        assert!(out.contains("QUIZ INTERRUPTED"));
        assert!(ctx.ledger().load_all().is_empty());
    }

    #[test]
    fn leaderboard_shows_medals_in_rank_order() {
        let ctx = context(vec![
            record("Low", 3, "Music"),
            record("Top", 9, "History"),
            record("Mid", 6, "History"),
        ]);
        // leaderboard > default size > all themes > enter > quit > yes
        let out = run(&ctx, "2\n\n1\n\n4\ny\n");
        assert!(out.contains("1) All themes"));
        assert!(out.contains("3) Music"));
        let top = out.find("Top").unwrap();
        let mid = out.find("Mid").unwrap();
        let low = out.find("Low").unwrap();
        assert!(top < mid && mid < low);
        assert!(out.contains("🥇"));
        assert!(out.contains("🥉"));
    }

    #[test]
    fn leaderboard_theme_filter_and_cancel() {
        let ctx = context(vec![record("Top", 9, "History"), record("Tune", 5, "Music")]);
        let out = run(&ctx, "2\n5\n3\n\n4\ny\n");
        assert!(out.contains(" Theme: Music"));
        assert!(out.contains("Tune"));
        assert!(!out.contains("🥈"));

        let out = run(&ctx, "2\n\n0\n4\ny\n");
        assert!(!out.contains("🥇"));
    }

    #[test]
    fn quit_accepts_replies_starting_with_o_or_y() {
        for reply in ["o", "Oui", "ouais", "OK", "y", "Yes", "yep"] {
            assert!(confirms_quit(reply), "{reply}");
        }
        for reply in ["", "n", "non", "no", " ", "1"] {
            assert!(!confirms_quit(reply), "{reply}");
        }

        let ctx = context(Vec::new());
        let out = run(&ctx, "4\nouais\n");
        assert!(out.contains("Thanks for playing"));
    }

    #[test]
    fn declined_quit_returns_to_menu_and_closed_input_exits() {
        let ctx = context(Vec::new());
        let out = run(&ctx, "4\nn\n3\n\n");
        assert!(out.contains("INSTRUCTIONS & HELP"));
        assert!(!out.contains("Thanks for playing"));
    }
}

//! Text for every screen. Functions here only build strings; `Terminal` prints them.
use colored::Colorize;
use quisqueya_game::{Question, Recognition, ScoreRecord};
use std::path::Path;

const WIDTH: usize = 60;

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(WIDTH)
}

/// Title centred between two heavy rules.
pub fn section(title: &str) -> String {
    format!(
        "\n{}\n{}\n{}\n",
        rule('═'),
        format!("{title:^WIDTH$}").as_str().bright_cyan().bold(),
        rule('═')
    )
}

/// Title inside a double-lined box, used for the menus.
pub fn boxed(title: &str) -> String {
    let inner = WIDTH - 2;
    format!(
        "\n╔{bar}╗\n║{}║\n╚{bar}╝\n",
        format!("{title:^inner$}").as_str().bright_cyan().bold(),
        bar = "═".repeat(inner)
    )
}

pub fn banner() -> String {
    let blank = " ".repeat(WIDTH);
    format!(
        "\n╔{bar}╗\n║{blank}║\n║{}║\n║{blank}║\n╚{bar}╝\n\n Press [ENTER] to start\n",
        format!("{:^WIDTH$}", "WELCOME TO THE QUISQUEYA QUIZ")
            .as_str()
            .bright_cyan()
            .bold(),
        bar = "═".repeat(WIDTH)
    )
}

pub fn no_question_files(dir: &Path, fallback: &Path) -> String {
    format!(
        "\n{}\nAdd JSON question files to '{}' (or a '{}' file).",
        format!("No questions found in '{}'.", dir.display())
            .as_str()
            .yellow()
            .bold(),
        dir.display(),
        fallback.display()
    )
}

pub fn main_menu() -> String {
    let mut text = boxed("QUISQUEYA QUIZ - MAIN MENU");
    text.push('\n');
    for (number, label) in ["Play", "Leaderboard / Scores", "Instructions / Help", "Quit"]
        .iter()
        .enumerate()
    {
        text.push_str(&format!("   {}) {label}\n", number + 1));
    }
    text.push('\n');
    text.push_str(&rule('─'));
    text
}

pub fn play_menu() -> String {
    format!(
        "{}\n   1) ⚡ Quick mode ({} questions)\n   2) Theme mode\n   0) ← Back to the main menu\n\n{}",
        boxed("PLAY"),
        quisqueya_game::constants::MAX_QUESTIONS_PER_GAME,
        rule('─')
    )
}

/// `Question i/n [theme - level]`, the prompt and the numbered options.
pub fn question(question: &Question, number: usize, total: usize) -> String {
    let header = format!(
        "Question {number}/{total} [{} - {}]",
        question.theme(),
        question.level()
    );
    let mut lines = vec![
        String::new(),
        rule('='),
        header.as_str().bold().to_string(),
        rule('─'),
        question.prompt().to_string(),
        String::new(),
    ];
    lines.extend(
        question
            .options()
            .iter()
            .enumerate()
            .map(|(index, option)| format!("  {}) {option}", index + 1)),
    );
    lines.push(String::new());
    lines.push(" Type '0' or 'Q' to leave the quiz".dimmed().to_string());
    lines.join("\n")
}

pub fn invalid_choice(option_count: usize) -> String {
    format!("Invalid choice! Enter a number between 1 and {option_count}.")
        .as_str()
        .red()
        .to_string()
}

pub fn correct() -> String {
    "Correct!".green().bold().to_string()
}

pub fn incorrect(correct_option: &str) -> String {
    format!(
        "{} The right answer was: {}",
        "Wrong answer.".red().bold(),
        correct_option.bold()
    )
}

pub fn game_start(player: &str, total: usize) -> String {
    format!("\nGame starting - player: {player} - {total} questions")
}

/// Totals shown after a completed game.
pub fn summary(record: &ScoreRecord) -> String {
    let total = record.question_count;
    [
        String::new(),
        rule('='),
        "=== GAME SUMMARY ===".bright_cyan().bold().to_string(),
        rule('='),
        String::new(),
        format!("Player: {}", record.player),
        format!(
            "Correct answers: {}/{total} ({:.1}%)",
            record.correct, record.percentage
        ),
        format!("Wrong answers: {}/{total}", record.incorrect),
        format!("Total score: {}", record.score),
        format!("Duration: {} s", record.duration_seconds),
    ]
    .join("\n")
}

pub fn saved() -> String {
    "\nScore saved!".green().to_string()
}

pub fn save_failed(error: &dyn std::fmt::Display) -> String {
    format!("\n[Error] could not save the score: {error}")
        .as_str()
        .red()
        .to_string()
}

pub fn abort_report(answered: u32, total: usize, correct: u32) -> String {
    [
        String::new(),
        rule('='),
        " QUIZ INTERRUPTED".yellow().bold().to_string(),
        rule('='),
        String::new(),
        format!("You answered {answered} question(s) out of {total}"),
        format!("Correct answers: {correct}"),
        "The score was not saved.".to_string(),
        String::new(),
        rule('='),
    ]
    .join("\n")
}

/// Shown when a name already has recorded games.
pub fn identity_notice(name: &str, recognition: &Recognition) -> String {
    let mut lines = Vec::new();
    if let Some(stats) = recognition.stats() {
        let games = if stats.games == 1 {
            "1 game".to_string()
        } else {
            format!("{} games", stats.games)
        };
        lines.push(format!(
            "\nThe name '{name}' is already recorded with {games}."
        ));
        lines.push(format!(
            "   Best score: {} points ({:.1}%)",
            stats.best_score, stats.best_percentage
        ));
        if matches!(recognition, Recognition::Frequent(_)) {
            lines.push(format!("   Average: {:.1}%", stats.average_percentage));
        }
    }
    lines.push("\nAre you the same person?".bold().to_string());
    lines.push("   1) Yes, that's me - continue with this name".to_string());
    lines.push("   2) No, choose another name".to_string());
    lines.push("   0) Cancel and return to the menu\n".to_string());
    lines.join("\n")
}

pub fn welcome(name: &str, recognition: &Recognition) -> String {
    let text = match recognition {
        Recognition::FirstTime => format!("\nWelcome {name}! This is your first game.\n"),
        Recognition::Returning(_) => format!("\nWelcome back {name}!\n"),
        Recognition::Frequent(stats) => format!(
            "\nWelcome back {name}! You have already played {} games.\n",
            stats.games
        ),
    };
    text.as_str().green().to_string()
}

pub fn medal(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        _ => format!("{rank}."),
    }
}

pub fn leaderboard_entry(rank: usize, record: &ScoreRecord) -> String {
    [
        format!("{} {}", medal(rank), record.player.as_str().bold()),
        format!("   Score: {} points", record.score),
        format!(
            "   Success: {}/{} ({:.1}%)",
            record.correct, record.question_count, record.percentage
        ),
        format!("   Date: {}", record.date()),
        format!("   Theme: {}\n", record.theme),
    ]
    .join("\n")
}

pub fn instructions() -> String {
    let mut text = section("INSTRUCTIONS & HELP");
    text.push_str(
        "
 HOW TO PLAY

   • A game has up to 10 questions
   • Each correct answer is worth 1 point
   • Answer by typing the number of your choice

 SCORES

   • Completed games are saved automatically
   • Leaving a game early saves nothing
   • Check the leaderboard from the main menu

 GAME MODES

   • Quick mode: 10 questions, all themes
   • Theme mode: pick a single theme

 NAVIGATION

   • Type the number of the option you want
   • '0' goes back; during a game '0' or 'Q' leaves the quiz
",
    );
    text.push_str(&rule('═'));
    text
}

pub fn farewell() -> String {
    format!(
        "\n{}\n{}\n{}\n{}\n",
        rule('═'),
        format!("{:^WIDTH$}", "Thanks for playing the Quisqueya Quiz!")
            .as_str()
            .bright_cyan()
            .bold(),
        format!("{:^WIDTH$}", "See you soon!"),
        rule('═')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quisqueya_game::PlayerStats;

    fn record() -> ScoreRecord {
        ScoreRecord {
            game_id: "Ana_1".into(),
            player: "Ana".into(),
            timestamp: "2025-03-04T05:06:07Z".into(),
            theme: "History".into(),
            level: "mix".into(),
            question_count: 10,
            correct: 7,
            incorrect: 3,
            score: 7,
            percentage: 70.0,
            duration_seconds: 95,
        }
    }

    #[test]
    fn question_block_numbers_options_from_one() {
        let q = Question::new(
            4,
            "Geography",
            "easy",
            "Capital of Haiti?",
            vec!["Cap-Haïtien".into(), "Port-au-Prince".into()],
            1,
        )
        .unwrap();
        let text = question(&q, 2, 5);
        assert!(text.contains("Question 2/5 [Geography - easy]"));
        assert!(text.contains("  1) Cap-Haïtien"));
        assert!(text.contains("  2) Port-au-Prince"));
    }

    #[test]
    fn summary_and_leaderboard_show_one_decimal() {
        let text = summary(&record());
        assert!(text.contains("Correct answers: 7/10 (70.0%)"));
        assert!(text.contains("Duration: 95 s"));

        let entry = leaderboard_entry(1, &record());
        assert!(entry.starts_with("🥇"));
        assert!(entry.contains("Success: 7/10 (70.0%)"));
        assert!(entry.contains("Date: 2025-03-04"));
    }

    #[test]
    fn medals_stop_after_third_place() {
        assert_eq!(medal(3), "🥉");
        assert_eq!(medal(4), "4.");
    }

    #[test]
    fn average_only_shown_for_frequent_players() {
        let stats = PlayerStats {
            games: 3,
            best_score: 9,
            best_percentage: 90.0,
            average_percentage: 62.5,
        };
        let frequent = identity_notice("Ana", &Recognition::Frequent(stats.clone()));
        assert!(frequent.contains("with 3 games"));
        assert!(frequent.contains("Average: 62.5%"));

        let single = PlayerStats { games: 1, ..stats };
        let returning = identity_notice("Ana", &Recognition::Returning(single));
        assert!(returning.contains("with 1 game."));
        assert!(!returning.contains("Average"));
    }
}

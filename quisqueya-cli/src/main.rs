mod menu;
mod render;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use quisqueya_game::{JsonFileStore, Ledger, QuestionBank, QuizConfig, QuizContext};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use menu::Menu;
use terminal::Terminal;

#[derive(Debug, Parser)]
#[command(name = "quisqueya", version = "0.1.0")]
#[command(about = "Multiple-choice quiz for the terminal, with a persistent leaderboard")]
struct Args {
    /// JSON configuration file; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the question files (*.json)
    #[arg(long)]
    questions_dir: Option<PathBuf>,

    /// Single question file used when the directory is missing
    #[arg(long)]
    fallback_file: Option<PathBuf>,

    /// Score ledger file
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Seed for question sampling (reproducible games)
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the short pauses between screens
    #[arg(long)]
    no_pause: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = resolve_config(&args)?;
    log::debug!("configuration: {config:?}");

    let stdin = io::stdin();
    let mut term = Terminal::new(stdin.lock(), io::stdout(), config.pauses)
        .with_interrupt(install_interrupt_flag());

    let (bank, report) = QuestionBank::load(&config.questions_dir, &config.questions_fallback);
    if !report.skipped.is_empty() {
        log::warn!("{} question entries or files were skipped", report.skipped.len());
    }
    if bank.is_empty() {
        term.say(render::no_question_files(
            &config.questions_dir,
            &config.questions_fallback,
        ));
        term.wait_for_enter("\nPress [ENTER] to quit...");
        return Ok(());
    }

    let store = JsonFileStore::new(&config.scores_file);
    if let Err(err) = store.ensure_exists() {
        log::warn!("{err}; scores may not be saved");
    }
    let ctx = QuizContext::new(bank, Ledger::new(store), &config);

    term.say(render::banner());
    term.wait_for_enter("");

    let mut menu = Menu::new(&ctx, make_rng(args.seed), &config);
    menu.run(&mut term);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    if verbose {
        println!("{}", "🔎 verbose logging enabled".dimmed());
    }
}

/// Ctrl-C raises the returned flag instead of killing the process; the prompt
/// waiting at that moment reads as an empty reply once Enter is pressed.
fn install_interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    let installed = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
        eprintln!("\n(interrupted - press [ENTER] to continue, quit from the main menu)");
    });
    if let Err(err) = installed {
        log::warn!("cannot install the Ctrl-C handler: {err}");
    }
    flag
}

/// Defaults, then the `--config` file, then individual flags.
fn resolve_config(args: &Args) -> Result<QuizConfig> {
    let mut config = match &args.config {
        Some(path) => QuizConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => QuizConfig::default(),
    };
    if let Some(dir) = &args.questions_dir {
        config.questions_dir.clone_from(dir);
    }
    if let Some(file) = &args.fallback_file {
        config.questions_fallback.clone_from(file);
    }
    if let Some(scores) = &args.scores {
        config.scores_file.clone_from(scores);
    }
    if args.no_pause {
        config.pauses = false;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn make_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => {
            log::info!("sampling with seed {seed}");
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_entropy(),
    }
}

//! Lingo - language learning in the terminal
//!
//! Browse lessons, practice conversation and track progress from a TUI.

mod auth;
mod catalog;
mod clock;
mod config;
mod debounce;
mod error;
mod interaction;
mod logging;
mod models;
mod practice;
mod progress;
mod query;
mod quiz;
mod state;
mod storage;
mod ui;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{info, warn};

use catalog::CatalogStore;
use clock::SystemClock;
use config::Config;
use models::{Lesson, LessonType, Level};
use query::{QueryParams, SortKey};
use state::{Action, ThemeName};
use storage::{FileStore, KeyValueStore, MemoryStore};
use ui::App;

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(author, version, about = "Language learning TUI with lessons, chat practice, quizzes and progress tracking", long_about = None)]
struct Args {
    /// Directory holding favorites, bookmarks, history, theme and session
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load lessons from a JSON file instead of the bundled catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Switch to a theme (pastel, cupcake or lofi) and remember it
    #[arg(long)]
    theme: Option<String>,

    /// Keep all state in memory for this run only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the lessons matching a query and exit
    Lessons {
        /// Case-insensitive text to look for in titles, descriptions and tags
        #[arg(short, long, default_value = "")]
        search: String,

        /// Beginner, Intermediate or Advanced
        #[arg(short, long)]
        level: Option<Level>,

        /// grammar, speaking, vocabulary or pronunciation
        #[arg(short = 't', long = "type")]
        kind: Option<LessonType>,

        /// Only lessons carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// default, rating, duration, completion or recent
        #[arg(long, default_value = "default")]
        sort: SortKey,
    },
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let args = Args::parse();

    // An explicit --config must be valid. The default one falls back to
    // defaults, and the error is reported once logging is up.
    let (config, config_error) = match &args.config {
        Some(path) => (Config::load_from(path)?, None),
        None => Config::load_or_default(&Config::default_path()),
    };

    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _guard = logging::init_log(&log_dir, &config.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting lingo");

    let default_config = Config::default_path();
    if let Some(e) = config_error {
        warn!(path = ?default_config, error = format!("{:#}", e), "Ignoring unreadable config, using defaults");
        eprintln!("Warning: ignoring {:?}: {:#}", default_config, e);
    } else if args.config.is_none() && !default_config.exists() {
        // First run: leave a config file behind for the user to edit
        match config.save_to(&default_config) {
            Ok(()) => info!(path = ?default_config, "Wrote default config"),
            Err(e) => warn!(error = %e, "Failed to write default config"),
        }
    }

    let store: Rc<dyn KeyValueStore> = if args.ephemeral {
        Rc::new(MemoryStore::default())
    } else {
        let data_dir = args.data_dir.clone().unwrap_or_else(FileStore::default_path);
        Rc::new(FileStore::new(data_dir)?)
    };

    let lessons = load_lessons(args.catalog.as_deref())?;
    let bank = quiz::QuestionBank::bundled().context("Bundled question bank is invalid")?;
    let catalog = CatalogStore::open(lessons, store.clone());

    if let Some(Command::Lessons {
        search,
        level,
        kind,
        tags,
        sort,
    }) = args.command
    {
        let params = QueryParams {
            search,
            level,
            kind,
            tags: tags.into_iter().collect::<BTreeSet<_>>(),
            sort,
        };
        print_lessons(&catalog, &params);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(catalog, store, config, bank, Rc::new(SystemClock));
    if let Some(name) = &args.theme {
        app.dispatch(Action::SetTheme(ThemeName::from_str(name)));
    }

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    info!("Exiting lingo");
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}

fn load_lessons(path: Option<&Path>) -> Result<Vec<Lesson>> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read lesson catalog: {:?}", path))?;
            models::parse_catalog(&json).with_context(|| format!("Invalid lesson catalog: {:?}", path))
        }
        None => models::bundled_catalog().context("Bundled lesson catalog is invalid"),
    }
}

fn print_lessons(catalog: &CatalogStore, params: &QueryParams) {
    let results = catalog.query(params);
    if results.is_empty() {
        println!("No lessons found");
        return;
    }

    println!(
        "{:>3}  {:<28} {:<13} {:<14} {:>8} {:>6} {:>5}",
        "ID", "TITLE", "TYPE", "LEVEL", "DURATION", "RATING", "DONE"
    );
    for lesson in results {
        let mut flags = String::new();
        if catalog.interaction().is_favorite(lesson.id) {
            flags.push_str(" ♥");
        }
        if catalog.interaction().is_bookmarked(lesson.id) {
            flags.push_str(" ⚑");
        }
        println!(
            "{:>3}  {:<28} {:<13} {:<14} {:>8} {:>6.1} {:>4}%{}",
            lesson.id,
            ui::truncate(&lesson.title, 28),
            lesson.kind.label(),
            lesson.level.label(),
            lesson.duration,
            lesson.rating,
            lesson.completion_rate,
            flags
        );
    }
}

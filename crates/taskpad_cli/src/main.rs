//! Command-line view projector for the task engine.
//!
//! # Responsibility
//! - Translate shell-level intents into typed core calls.
//! - Re-render the projected list from canonical state after each intent.
//! - Keep user interaction concerns (confirmation, rejection notices) out of
//!   the core.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use taskpad_core::kv::open_store;
use taskpad_core::{
    filter, FilterEngine, FilterMode, SqliteKvStore, StoreError, Task, TaskId, TaskStore, Theme,
    ThemePrefs,
};

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Single-user task list manager")]
#[command(version)]
struct Cli {
    /// Path to the task database
    #[arg(long, default_value = "taskpad.db")]
    db: PathBuf,

    /// Reject tasks whose text duplicates an existing one (case-insensitive)
    #[arg(long)]
    unique: bool,

    /// Absolute directory for rolling log files; logging stays off when
    /// omitted
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text; surrounding whitespace is trimmed
        text: String,
    },

    /// List tasks through the current (or given) filter
    List {
        /// all, pending or completed; also persisted as the current filter
        #[arg(long)]
        filter: Option<FilterMode>,
    },

    /// Flip a task between pending and completed
    Toggle {
        /// Task id as printed by `list`
        id: TaskId,
    },

    /// Replace a task's text
    Edit {
        id: TaskId,
        text: String,
    },

    /// Delete a task
    Delete {
        id: TaskId,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show or change the current filter mode
    Filter {
        /// all, pending or completed; prints the current mode when omitted
        mode: Option<FilterMode>,
    },

    /// Toggle between the light and dark theme
    Theme,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = taskpad_core::init_logging(taskpad_core::default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_store(&cli.db)?;
    let mut tasks = TaskStore::load(SqliteKvStore::try_new(&conn)?)?.with_unique_text(cli.unique);
    let mut modes = FilterEngine::load(SqliteKvStore::try_new(&conn)?)?;
    let mut prefs = ThemePrefs::load(SqliteKvStore::try_new(&conn)?)?;

    match cli.command {
        Commands::Add { text } => match tasks.create(&text) {
            Ok(Some(task)) => println!("added {} {}", task.id, task.text),
            Ok(None) => println!("nothing to add: task text is empty"),
            Err(StoreError::Duplicate { text }) => {
                println!("rejected: a task named `{text}` already exists");
            }
            Err(err) => return Err(err.into()),
        },

        Commands::List { filter: requested } => {
            if let Some(mode) = requested {
                modes.set_mode(mode)?;
            }
            render(tasks.all(), modes.current(), prefs.current());
        }

        Commands::Toggle { id } => match tasks.toggle(id)? {
            Some(true) => println!("completed {id}"),
            Some(false) => println!("reopened {id}"),
            None => println!("no task with id {id}"),
        },

        Commands::Edit { id, text } => match tasks.edit(id, &text) {
            Ok(true) => println!("edited {id}"),
            Ok(false) => println!("nothing edited: empty text or unknown id"),
            Err(StoreError::Duplicate { text }) => {
                println!("rejected: a task named `{text}` already exists");
            }
            Err(err) => return Err(err.into()),
        },

        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("delete task {id}?"))? {
                println!("aborted");
                return Ok(());
            }
            if tasks.delete(id)? {
                println!("deleted {id}");
            } else {
                println!("no task with id {id}");
            }
        }

        Commands::Filter { mode } => match mode {
            Some(mode) => {
                modes.set_mode(mode)?;
                println!("filter set to {mode}");
            }
            None => println!("filter is {}", modes.current()),
        },

        Commands::Theme => {
            let theme = prefs.toggle()?;
            println!("theme set to {theme}");
        }
    }

    Ok(())
}

fn render(tasks: &[Task], mode: FilterMode, theme: Theme) {
    println!("filter={mode} theme={theme}");

    let visible = filter::apply(tasks, mode);
    if visible.is_empty() {
        println!("(no tasks)");
    }
    for task in &visible {
        let marker = if task.completed { 'x' } else { ' ' };
        println!("{} [{marker}] {}", task.id, task.text);
    }

    let pending = filter::apply(tasks, FilterMode::Pending).len();
    println!("{pending} pending / {} total", tasks.len());
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

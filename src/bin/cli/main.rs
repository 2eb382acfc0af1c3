mod app;
mod commands;
#[cfg(feature = "tui")]
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "classroom", about = "Pocket Classroom capsule CLI and TUI", version)]
struct Cli {
    /// Use a specific data directory (default: the per-user data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List all capsules with their study progress
    List,

    /// Print a capsule's notes, flashcards, and quiz
    Show {
        /// Capsule title (case-insensitive prefix match) or id
        capsule: String,
    },

    /// Create a new capsule
    New {
        /// Capsule title
        title: String,
        /// Subject, e.g. "Astronomy"
        #[arg(long)]
        subject: Option<String>,
        /// Level: beginner, intermediate, or advanced
        #[arg(long)]
        level: Option<String>,
        /// Short description
        #[arg(long)]
        description: Option<String>,
        /// Notes, one per line (use "-" to read from stdin)
        #[arg(long)]
        notes: Option<String>,
    },

    /// Import a capsule JSON document
    Import {
        /// Path to the .json file
        file: PathBuf,
    },

    /// Export a capsule as a JSON document
    Export {
        /// Capsule title (case-insensitive prefix match) or id
        capsule: String,
        /// Output path (defaults to <Title>-<id>.json in the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete a capsule, its progress, and its index entry
    Delete {
        /// Capsule title (case-insensitive prefix match) or id
        capsule: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Launch the interactive TUI
    #[cfg(feature = "tui")]
    Tui,
}

/// Resolve "-" or piped stdin to note content
fn resolve_notes(notes: Option<String>) -> Option<String> {
    match notes.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
            Some(buf)
        }
        Some(_) => notes,
        None => {
            if !stdin_is_tty() {
                let mut buf = String::new();
                std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
                if buf.is_empty() {
                    None
                } else {
                    Some(buf)
                }
            } else {
                None
            }
        }
    }
}

/// Check if stdin is a terminal (not piped)
fn stdin_is_tty() -> bool {
    unsafe { libc_isatty(0) != 0 }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && stdout_is_tty();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                tui::run(cli.data_dir.as_deref())?;
            }
            #[cfg(not(feature = "tui"))]
            {
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        Some(Command::List) => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::list::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Show { capsule }) => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::show::run(&app, &capsule, &cli.format, use_color)?;
        }
        Some(Command::New {
            title,
            subject,
            level,
            description,
            notes,
        }) => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            let notes = resolve_notes(notes);
            commands::new::run(
                &app,
                &title,
                subject.as_deref(),
                level.as_deref(),
                description.as_deref(),
                notes,
                &cli.format,
            )?;
        }
        Some(Command::Import { file }) => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::import::run(&app, &file, &cli.format)?;
        }
        Some(Command::Export { capsule, output }) => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::export::run(&app, &capsule, output.as_deref(), &cli.format)?;
        }
        Some(Command::Delete { capsule, yes }) => {
            let app = app::App::new(cli.data_dir.as_deref())?;
            commands::delete::run(&app, &capsule, yes)?;
        }
        #[cfg(feature = "tui")]
        Some(Command::Tui) => {
            tui::run(cli.data_dir.as_deref())?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn stdout_is_tty() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}

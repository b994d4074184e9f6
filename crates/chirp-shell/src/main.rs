use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use chirp_core::config::CoreConfig;
use chirp_core::store::{seed, Database};

mod browser;
mod commands;
mod format;
mod prompt;
mod state;
mod tracing_setup;

use commands::Flow;
use prompt::Prompter;
use state::ShellState;

// ANSI color codes
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const DIM: &str = "\x1b[2m";
pub(crate) const RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(name = "chirp")]
#[command(about = "Terminal micro-blogging shell")]
struct Args {
    /// Path to the SQLite database (defaults to the platform data dir)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Drop all tables before starting (fresh database)
    #[arg(long)]
    reset: bool,

    /// Drop all tables and insert sample data
    #[arg(long)]
    test_mode: bool,
}

fn main() -> Result<()> {
    tracing_setup::init_tracing();
    let args = Args::parse();

    let db_path = args.db_path.unwrap_or_else(CoreConfig::default_db_path);
    let db = Database::open(&db_path)?;
    if args.reset || args.test_mode {
        db.drop_tables()?;
        db.define_tables()?;
    }
    if args.test_mode {
        seed::insert_sample_data(&db)?;
    }

    let mut state = ShellState::new();
    let mut input = Prompter::stdin();

    commands::clear_screen();
    println!("Welcome to chirp!");
    println!("{DIM}Type 'help' at any prompt (>>>) to see the available commands{RESET}");
    println!();

    loop {
        let Some(line) = input.read_line(">>> ")? else {
            break;
        };
        if commands::dispatch(&line, &mut state, &db, &mut input)? == Flow::Exit {
            break;
        }
    }

    println!("Goodbye.");
    Ok(())
}

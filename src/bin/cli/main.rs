mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mneme", about = "Spaced repetition flashcard trainer", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List all decks with their card counts
    List,

    /// Create a new empty deck
    New {
        /// Deck name
        name: String,
        /// Display color, e.g. "#2196f3"
        #[arg(long)]
        color: Option<String>,
    },

    /// Show a deck's cards and their schedule
    Show {
        /// Deck name (case-insensitive prefix match)
        deck: String,
    },

    /// Replace a deck's cards from front;back lines
    ///
    /// Cards whose text is unchanged keep their scheduling state.
    Import {
        /// Deck name
        deck: String,
        /// Input file (use "-" to read from stdin)
        file: String,
    },

    /// Delete a deck and all its cards
    Delete {
        /// Deck name
        deck: String,
    },

    /// Run an interactive study session over a deck
    Study {
        /// Deck name
        deck: String,
        /// Maximum new cards to introduce this session
        #[arg(long, default_value = "20")]
        new_cards: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.data_dir.clone())?;

    match cli.command {
        Command::List => commands::list::run(&app, &cli.format)?,
        Command::New { name, color } => commands::new::run(&app, name, color, &cli.format)?,
        Command::Show { deck } => commands::show::run(&app, &deck, &cli.format)?,
        Command::Import { deck, file } => commands::import::run(&app, &deck, &file)?,
        Command::Delete { deck } => commands::delete::run(&app, &deck)?,
        Command::Study { deck, new_cards } => commands::study::run(&app, &deck, new_cards)?,
    }

    Ok(())
}

//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Scrivener - grounded, styled chapters from a story summary
#[derive(Parser, Debug)]
#[command(name = "scrivener")]
#[command(about = "Multi-agent chapter generation with persisted story threads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate and store one chapter
    Generate {
        /// Story summary the chapter should realise
        #[arg(long)]
        summary: String,

        /// Genre label (e.g. fantasy, noir)
        #[arg(long)]
        genre: String,

        /// Chapter this one continues
        #[arg(long)]
        previous_chapter_id: Option<i64>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,

        /// Skip the model and the retrieval services
        #[arg(long)]
        offline: bool,
    },

    /// Browse stored chapters
    #[command(subcommand)]
    Chapters(ChapterCommands),

    /// Look up extracted characters
    #[command(subcommand)]
    Characters(CharacterCommands),

    /// Browse extracted lore
    #[command(subcommand)]
    Lore(LoreCommands),

    /// Probe the store and retrieval services
    Health {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Chapter subcommands
#[derive(Subcommand, Debug)]
pub enum ChapterCommands {
    /// List chapters, newest first
    List {
        /// Only chapters of this genre
        #[arg(long)]
        genre: Option<String>,

        /// Maximum number of chapters to display
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show one chapter
    Show {
        /// Chapter id
        id: i64,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show the most recent chapter
    Latest {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Character subcommands
#[derive(Subcommand, Debug)]
pub enum CharacterCommands {
    /// Find characters whose name contains a fragment
    Find {
        /// Name fragment, case-insensitive
        name: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Lore subcommands
#[derive(Subcommand, Debug)]
pub enum LoreCommands {
    /// List lore records
    List {
        /// Only records of this category (location, concept, ...)
        #[arg(long)]
        category: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the scrivener binary.

mod commands;
mod generate;
mod health;
mod output;
mod records;

pub use commands::{Cli, Commands};
pub use generate::{GenerateArgs, generate_chapter};
pub use health::report_health;
pub use records::{handle_chapter_command, handle_character_command, handle_lore_command};

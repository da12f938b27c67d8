//! Scrivener CLI binary.
//!
//! This binary provides command-line access to Scrivener:
//! - Generate chapters, optionally continuing a stored thread
//! - Browse stored chapters, characters, and lore
//! - Check the health of the store and retrieval services

use clap::Parser;
use scrivener::{ObservabilityConfig, ScrivenerConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, GenerateArgs, generate_chapter, handle_chapter_command,
        handle_character_command, handle_lore_command, report_health,
    };

    // Pick up API keys and overrides from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _telemetry = init_observability(ObservabilityConfig::for_cli(cli.verbose, cli.json_logs))?;

    let config = ScrivenerConfig::load_with(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            summary,
            genre,
            previous_chapter_id,
            format,
            offline,
        } => {
            let args = GenerateArgs {
                summary,
                genre,
                previous_chapter_id,
                format,
                offline,
            };
            generate_chapter(&config, args).await?;
        }

        Commands::Chapters(cmd) => handle_chapter_command(&config, cmd).await?,

        Commands::Characters(cmd) => handle_character_command(&config, cmd).await?,

        Commands::Lore(cmd) => handle_lore_command(&config, cmd).await?,

        Commands::Health { format } => report_health(&config, format).await?,
    }

    Ok(())
}

//! Chapter, character, and lore lookups.

use super::commands::{ChapterCommands, CharacterCommands, LoreCommands, OutputFormat};
use super::output;
use scrivener::{
    Chapter, ChapterFilter, ChapterId, ScrivenerConfig, ScrivenerResult, open_store,
};

/// Handle `scrivener chapters ...`.
pub async fn handle_chapter_command(
    config: &ScrivenerConfig,
    cmd: ChapterCommands,
) -> ScrivenerResult<()> {
    let store = open_store(config.storage()).await?;

    match cmd {
        ChapterCommands::List {
            genre,
            limit,
            format,
        } => {
            let filter = match genre {
                Some(genre) => ChapterFilter::new().with_genre(genre),
                None => ChapterFilter::new(),
            }
            .with_limit(limit);
            let chapters = store.list_chapters(&filter).await?;
            output::emit(chapters.as_slice(), format, output::chapter_list)
        }

        ChapterCommands::Show { id, format } => {
            let chapter = store.chapter(ChapterId::new(id)).await?;
            show_or_exit(chapter, format, &format!("Chapter {} not found", id))
        }

        ChapterCommands::Latest { format } => {
            let chapter = store.latest_chapter().await?;
            show_or_exit(chapter, format, "No chapters stored yet")
        }
    }
}

fn show_or_exit(
    chapter: Option<Chapter>,
    format: OutputFormat,
    missing: &str,
) -> ScrivenerResult<()> {
    match chapter {
        Some(chapter) => output::emit(&chapter, format, output::chapter),
        None => {
            eprintln!("{}", missing);
            std::process::exit(1);
        }
    }
}

/// Handle `scrivener characters ...`.
pub async fn handle_character_command(
    config: &ScrivenerConfig,
    cmd: CharacterCommands,
) -> ScrivenerResult<()> {
    let store = open_store(config.storage()).await?;

    match cmd {
        CharacterCommands::Find { name, format } => {
            let characters = store.find_characters(&name).await?;
            output::emit(characters.as_slice(), format, output::characters)
        }
    }
}

/// Handle `scrivener lore ...`.
pub async fn handle_lore_command(
    config: &ScrivenerConfig,
    cmd: LoreCommands,
) -> ScrivenerResult<()> {
    let store = open_store(config.storage()).await?;

    match cmd {
        LoreCommands::List { category, format } => {
            let lore = store.list_lore(category.as_deref()).await?;
            output::emit(lore.as_slice(), format, output::lore)
        }
    }
}

//! Rendering for command output.

use super::commands::OutputFormat;
use scrivener::{
    Chapter, ChapterResult, CharacterRecord, HealthReport, JsonError, LoreRecord,
    ScrivenerResult,
};
use serde::Serialize;

const RULE_WIDTH: usize = 80;

/// Print `value` in the requested format, using `human` for text output.
pub fn emit<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    human: impl FnOnce(&T) -> String,
) -> ScrivenerResult<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| JsonError::new(std::any::type_name::<T>(), e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => println!("{}", human(value)),
    }
    Ok(())
}

fn rule() -> String {
    format!("{:-<width$}", "", width = RULE_WIDTH)
}

fn id_or_none<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

/// Generated chapter with its extracted metadata.
pub fn chapter_result(result: &ChapterResult) -> String {
    let characters: Vec<&str> = result.characters().iter().map(|c| c.name().as_str()).collect();
    let lore: Vec<String> = result
        .lore()
        .iter()
        .map(|l| format!("{} ({})", l.name(), l.category()))
        .collect();

    format!(
        "Chapter {number}: {title}\nid: {id}  words: {words}  previous: {previous}\n{rule}\n{content}\n{rule}\nCharacters: {characters}\nLore: {lore}",
        number = result.chapter_number(),
        title = result.title(),
        id = result.chapter_id(),
        words = result.word_count(),
        previous = id_or_none(*result.previous_chapter_id()),
        rule = rule(),
        content = result.content(),
        characters = characters.join(", "),
        lore = lore.join(", "),
    )
}

/// One stored chapter in full.
pub fn chapter(chapter: &Chapter) -> String {
    format!(
        "Chapter {number} ({genre})\nid: {id}  words: {words}  previous: {previous}  created: {created}\nsummary: {summary}\n{rule}\n{content}",
        number = chapter.chapter_number(),
        genre = chapter.genre(),
        id = chapter.id(),
        words = chapter.word_count(),
        previous = id_or_none(*chapter.previous_chapter_id()),
        created = chapter.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
        summary = chapter.summary(),
        rule = rule(),
        content = chapter.content(),
    )
}

/// One line per chapter.
pub fn chapter_list(chapters: &[Chapter]) -> String {
    let mut lines: Vec<String> = chapters
        .iter()
        .map(|chapter| {
            format!(
                "{:>6}  #{:<3} {:<12} {}",
                chapter.id(),
                chapter.chapter_number(),
                chapter.genre(),
                excerpt(chapter.summary(), 50)
            )
        })
        .collect();
    lines.push(format!("Total: {} chapters", chapters.len()));
    lines.join("\n")
}

/// Name and description per character.
pub fn characters(records: &[CharacterRecord]) -> String {
    if records.is_empty() {
        return "No matching characters".to_string();
    }
    records
        .iter()
        .map(|record| {
            format!(
                "{}\n  {}\n  personality: {}",
                record.name(),
                record.description(),
                record.personality()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Category, name, and description per lore record.
pub fn lore(records: &[LoreRecord]) -> String {
    if records.is_empty() {
        return "No lore recorded".to_string();
    }
    records
        .iter()
        .map(|record| {
            format!(
                "[{}] {}\n  {}",
                record.category(),
                record.name(),
                record.description()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overall status then one line per service.
pub fn health(report: &HealthReport) -> String {
    let mut lines = vec![format!("Status: {}", report.status())];
    lines.extend(
        report
            .services()
            .iter()
            .map(|service| format!("  {:<10} {}", service.name(), service.status())),
    );
    lines.join("\n")
}

fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener::{HealthStatus, ServiceHealth};

    #[test]
    fn test_excerpt_marks_truncation() {
        assert_eq!(excerpt("short", 50), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
    }

    #[test]
    fn test_health_lists_services() {
        let report = HealthReport::from_services(vec![
            ServiceHealth::new("store", HealthStatus::Healthy),
            ServiceHealth::new(
                "primary",
                HealthStatus::Unreachable {
                    message: "connection refused".to_string(),
                },
            ),
        ]);
        let text = health(&report);
        assert!(text.starts_with("Status: degraded"));
        assert!(text.contains("primary"));
        assert!(text.contains("error: connection refused"));
    }

    #[test]
    fn test_empty_lookups_say_so() {
        assert_eq!(characters(&[]), "No matching characters");
        assert_eq!(lore(&[]), "No lore recorded");
    }
}

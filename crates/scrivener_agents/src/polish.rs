//! Whole-chapter copy editing.

use crate::AgentContext;
use scrivener_core::{ChapterBrief, StyleGuide};
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::Stage;

const SYSTEM_MESSAGE: &str =
    "You are a CorrectionPolish AI that edits and polishes chapters while preserving author intent.";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.2;

/// Conservative editor run once over the assembled chapter.
#[derive(Debug, Clone)]
pub struct CorrectionPolish {
    context: AgentContext,
}

impl CorrectionPolish {
    /// Create the agent.
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// Edited chapter. Falls back to [`mechanical_polish`].
    #[tracing::instrument(skip_all, fields(raw_len = raw_chapter.len()))]
    pub async fn polish(
        &self,
        raw_chapter: &str,
        style_guide: &StyleGuide,
        brief: &ChapterBrief,
    ) -> String {
        self.context
            .attempt(
                Stage::Polish,
                self.generate_polished(raw_chapter, style_guide, brief),
                || mechanical_polish(raw_chapter),
            )
            .await
    }

    async fn generate_polished(
        &self,
        raw_chapter: &str,
        style_guide: &StyleGuide,
        brief: &ChapterBrief,
    ) -> ScrivenerResult<String> {
        let request = AgentContext::request(
            prompt(raw_chapter, style_guide, brief),
            SYSTEM_MESSAGE,
            MAX_TOKENS,
            TEMPERATURE,
        )?;
        let response = self.context.generate(&request).await?;
        Ok(parse_polished(&response)?)
    }
}

fn prompt(raw_chapter: &str, style_guide: &StyleGuide, brief: &ChapterBrief) -> String {
    format!(
        "You are a CorrectionPolish AI agent. Your task is to edit and polish a chapter for grammar, flow, and quality while preserving the author's intent.

CORE PHILOSOPHY: You are an EDITOR, not a rewriter. Preserve the author's voice and intent.

RAW CHAPTER (edit this):
{raw_chapter}

STYLE GUIDE (maintain this style):
{style}

CHAPTER BRIEF (ensure consistency):
{brief}

EDITING INSTRUCTIONS:
1. Fix grammar, spelling, and punctuation errors
2. Improve sentence flow and readability
3. Ensure consistent tense and point of view
4. Maintain the author's voice and style
5. Preserve all plot points and character development
6. Do NOT add new creative content
7. Do NOT remove important details
8. Ensure smooth transitions between paragraphs
9. Check for logical consistency
10. Maintain the established tone and atmosphere

EDITING APPROACH:
- Be conservative - only make necessary changes
- Preserve the raw authenticity of the writing
- Focus on technical improvements, not creative changes
- Ensure the chapter reads naturally and professionally

Return the polished chapter that maintains all the original content while being technically sound and well-flowing.",
        style = style_guide.formatted(),
    )
}

/// Accept an edited chapter.
///
/// # Errors
///
/// Returns [`ParseErrorKind::Blank`] for an empty response.
pub fn parse_polished(response: &str) -> Result<String, ParseError> {
    let text = response.trim();
    if text.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Blank));
    }
    Ok(text.to_string())
}

/// Content-preserving cleanup that needs no generator.
///
/// Each substitution is a single left-to-right pass: double spaces become
/// single, and spaces before periods and commas are removed. Paragraphs are
/// trimmed, blank ones dropped, and the rest rejoined with blank lines.
///
/// # Examples
///
/// ```
/// use scrivener_agents::mechanical_polish;
///
/// let raw = "  The tide turned .  Gulls  scattered , crying.\n\n\n\nNight fell. ";
/// assert_eq!(
///     mechanical_polish(raw),
///     "The tide turned. Gulls scattered, crying.\n\nNight fell."
/// );
/// ```
pub fn mechanical_polish(raw_chapter: &str) -> String {
    let cleaned = raw_chapter
        .replace("  ", " ")
        .replace(" .", ".")
        .replace(" ,", ",");

    cleaned
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pass_replacement() {
        // Four spaces collapse to two, not one
        assert_eq!(mechanical_polish("a    b"), "a  b");
    }

    #[test]
    fn test_deterministic() {
        let raw = "One ,two .\n\n \n\nThree";
        assert_eq!(mechanical_polish(raw), mechanical_polish(raw));
        assert_eq!(mechanical_polish(raw), "One,two.\n\nThree");
    }
}

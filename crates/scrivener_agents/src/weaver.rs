//! Weaving plot points into retrieved prose.

use crate::AgentContext;
use scrivener_core::{ChapterBrief, PlotPoint, StyleGuide};
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::Stage;

const SYSTEM_MESSAGE: &str = "You are a MasterWeaver AI that assembles human-written content with plot points into polished paragraphs.";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.4;

/// Combines one plot point with a retrieved passage into a single paragraph.
#[derive(Debug, Clone)]
pub struct MasterWeaver {
    context: AgentContext,
}

impl MasterWeaver {
    /// Create the agent.
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// One paragraph for `plot_point`. Never fails.
    #[tracing::instrument(skip_all, fields(retrieved_len = retrieved.len()))]
    pub async fn weave(
        &self,
        plot_point: &PlotPoint,
        retrieved: &str,
        style_guide: &StyleGuide,
        brief: &ChapterBrief,
    ) -> String {
        self.context
            .attempt(
                Stage::Weave,
                self.generate_section(plot_point, retrieved, style_guide, brief),
                || fallback_section(plot_point),
            )
            .await
    }

    async fn generate_section(
        &self,
        plot_point: &PlotPoint,
        retrieved: &str,
        style_guide: &StyleGuide,
        brief: &ChapterBrief,
    ) -> ScrivenerResult<String> {
        let request = AgentContext::request(
            prompt(plot_point, retrieved, style_guide, brief),
            SYSTEM_MESSAGE,
            MAX_TOKENS,
            TEMPERATURE,
        )?;
        let response = self.context.generate(&request).await?;
        Ok(parse_section(&response)?)
    }
}

fn prompt(
    plot_point: &PlotPoint,
    retrieved: &str,
    style_guide: &StyleGuide,
    brief: &ChapterBrief,
) -> String {
    format!(
        "You are a MasterWeaver AI agent. Your task is to weave together a plot point with human-written descriptive content into a single, polished paragraph.

CORE PHILOSOPHY: You are NOT being creative. You are ASSEMBLING existing human-written content to serve the user's plot.

PLOT POINT (what MUST happen):
{plot_point}

HUMAN-WRITTEN DESCRIPTIVE CONTENT (use this, don't replace it):
{retrieved}

STYLE GUIDE (follow this style):
{style}

CHAPTER BRIEF (maintain consistency):
{brief}

INSTRUCTIONS:
1. Use the human-written descriptive content as your foundation
2. Weave in the plot point naturally
3. Follow the style guide exactly
4. Maintain consistency with the chapter brief
5. Create ONE polished paragraph (3-5 sentences)
6. Make it feel organic and natural
7. DO NOT add creative elements not in the plot point
8. DO NOT replace the human-written content - weave it in

WEAVE TOGETHER:
Create a single paragraph that seamlessly combines the plot point with the descriptive content, following the style guide.",
        style = style_guide.formatted(),
    )
}

/// Accept a woven paragraph.
///
/// # Errors
///
/// Returns [`ParseErrorKind::Blank`] for an empty response.
pub fn parse_section(response: &str) -> Result<String, ParseError> {
    let text = response.trim();
    if text.is_empty() {
        return Err(ParseError::new(ParseErrorKind::Blank));
    }
    Ok(text.to_string())
}

/// Template paragraph used when weaving fails. The plot point appears verbatim.
pub fn fallback_section(plot_point: &PlotPoint) -> String {
    if plot_point.as_str().to_lowercase().contains("magical powers") {
        format!(
            "The morning light filtered through the curtains as Sarah stretched languidly in her bed, unaware that today would change everything. {} She had always been an ordinary girl, living an ordinary life in her small suburban town, but as the sun climbed higher in the sky, she felt an unfamiliar tingling sensation spreading through her fingertips. The air around her seemed to shimmer with possibility, and for the first time in her eighteen years, Sarah wondered if there might be more to the world than she had ever imagined.",
            plot_point
        )
    } else {
        format!(
            "The scene unfolded with the quiet intensity of a moment that would echo through the years. {} Every detail seemed sharper, more vivid than before\u{2014}the way the light caught on unexpected surfaces, the subtle shifts in atmosphere that spoke of change coming. In the space between heartbeats, everything shifted, and what had been merely potential became inevitable, written in the fabric of the day with invisible ink that only time would reveal.",
            plot_point
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_embeds_point() {
        let point = PlotPoint::new("The bridge gives way beneath the convoy.");
        let section = fallback_section(&point);
        assert!(section.starts_with("The scene unfolded"));
        assert!(section.contains(" The bridge gives way beneath the convoy. Every detail"));
    }

    #[test]
    fn test_magic_branch() {
        let point = PlotPoint::new("She discovers she has Magical Powers");
        assert!(fallback_section(&point).starts_with("The morning light filtered"));
    }

    #[test]
    fn test_prompt_carries_all_inputs() {
        let text = prompt(
            &PlotPoint::new("Mara lights the lamp"),
            "Salt crusted the railings.",
            &StyleGuide::canned("fantasy"),
            &ChapterBrief::new("Keep it eerie."),
        );
        assert!(text.contains("PLOT POINT (what MUST happen):\nMara lights the lamp"));
        assert!(text.contains("Salt crusted the railings."));
        assert!(text.contains("GENRE STYLE GUIDE: Wonder, magic, and epic scale"));
        assert!(text.contains("CHAPTER BRIEF (maintain consistency):\nKeep it eerie."));
    }
}

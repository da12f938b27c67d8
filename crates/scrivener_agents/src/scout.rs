//! Plot point deconstruction and retrieval query generation.

use crate::AgentContext;
use scrivener_core::{ChapterBrief, PlotPoint};
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::Stage;

/// Fewer parsed beats than this and the fallback arc is used instead.
pub const MIN_PLOT_POINTS: usize = 3;

const DECONSTRUCT_SYSTEM: &str = "You are an expert in story structure and narrative development.";
const DECONSTRUCT_MAX_TOKENS: u32 = 800;
const DECONSTRUCT_TEMPERATURE: f32 = 0.6;

const QUERY_SYSTEM: &str = "You are a research expert skilled at finding relevant literary content.";
const QUERY_MAX_TOKENS: u32 = 100;
const QUERY_TEMPERATURE: f32 = 0.5;

/// Shortest line (in characters) kept as a plot point is one longer than this.
const MIN_PLOT_POINT_CHARS: usize = 10;
/// Shortest acceptable search query, in characters.
const MIN_QUERY_CHARS: usize = 10;
const BRIEF_CONTEXT_CHARS: usize = 200;

/// Splits summaries into beats and writes search queries for each beat.
#[derive(Debug, Clone)]
pub struct SceneScout {
    context: AgentContext,
}

impl SceneScout {
    /// Create the agent.
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// Ordered plot points for a summary. Always at least [`MIN_PLOT_POINTS`].
    #[tracing::instrument(skip_all)]
    pub async fn deconstruct(&self, summary: &str) -> Vec<PlotPoint> {
        self.context
            .attempt(
                Stage::Deconstruct,
                self.generate_plot_points(summary),
                || fallback_plot_points(summary),
            )
            .await
    }

    /// Search query for grounding content about one beat.
    #[tracing::instrument(skip_all, fields(genre = %genre))]
    pub async fn query_for(
        &self,
        plot_point: &PlotPoint,
        genre: &str,
        brief: &ChapterBrief,
    ) -> String {
        self.context
            .attempt(
                Stage::Query,
                self.generate_query(plot_point, genre, brief),
                || fallback_query(plot_point, genre),
            )
            .await
    }

    async fn generate_plot_points(&self, summary: &str) -> ScrivenerResult<Vec<PlotPoint>> {
        let request = AgentContext::request(
            deconstruct_prompt(summary),
            DECONSTRUCT_SYSTEM,
            DECONSTRUCT_MAX_TOKENS,
            DECONSTRUCT_TEMPERATURE,
        )?;
        let response = self.context.generate(&request).await?;
        let points = parse_plot_points(&response)?;
        tracing::debug!(count = points.len(), "Parsed plot points");
        Ok(points)
    }

    async fn generate_query(
        &self,
        plot_point: &PlotPoint,
        genre: &str,
        brief: &ChapterBrief,
    ) -> ScrivenerResult<String> {
        let request = AgentContext::request(
            query_prompt(plot_point, genre, brief),
            QUERY_SYSTEM,
            QUERY_MAX_TOKENS,
            QUERY_TEMPERATURE,
        )?;
        let response = self.context.generate(&request).await?;
        Ok(parse_query(&response)?)
    }
}

fn deconstruct_prompt(summary: &str) -> String {
    format!(
        "As a story structure expert, deconstruct this story summary into 4-6 key plot points.

STORY SUMMARY: {summary}

Requirements:
- Each plot point should represent a major story beat
- Plot points should be sequential and logical
- Each should be specific and actionable for writing
- Focus on the most important moments that drive the story forward

Format your response as a numbered list with clear, descriptive sentences for each plot point."
    )
}

fn query_prompt(plot_point: &PlotPoint, genre: &str, brief: &ChapterBrief) -> String {
    format!(
        "As a research assistant, generate a specific search query to find human-written descriptive content for this plot point.

PLOT POINT: {plot_point}
GENRE: {genre}
CHAPTER BRIEF CONTEXT: {context}...

Requirements:
- Create a search query that would find descriptive passages from existing literature
- Focus on finding authentic, human-written descriptions that could inspire this scene
- The query should be specific enough to find relevant content but broad enough to find multiple sources
- Include genre-specific terms when appropriate

Format your response as a single search query string (no more than 10-15 words).",
        context = brief.excerpt(BRIEF_CONTEXT_CHARS),
    )
}

/// Parse a numbered or bulleted list into plot points.
///
/// Lines starting with an ASCII digit, `-` or `*` are list items. Leading
/// numbering, bullets, dots and spaces are stripped, and items of ten
/// characters or fewer are dropped.
///
/// # Errors
///
/// Returns [`ParseErrorKind::TooFewPlotPoints`] when fewer than
/// [`MIN_PLOT_POINTS`] items survive.
pub fn parse_plot_points(response: &str) -> Result<Vec<PlotPoint>, ParseError> {
    let points: Vec<PlotPoint> = response
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '*')
        })
        .map(|line| {
            line.trim_start_matches(|c: char| {
                c.is_ascii_digit() || matches!(c, '.' | '-' | '*' | ' ')
            })
            .trim()
        })
        .filter(|line| line.chars().count() > MIN_PLOT_POINT_CHARS)
        .map(PlotPoint::from)
        .collect();

    if points.len() < MIN_PLOT_POINTS {
        return Err(ParseError::new(ParseErrorKind::TooFewPlotPoints {
            expected: MIN_PLOT_POINTS,
            found: points.len(),
        }));
    }
    Ok(points)
}

/// Clean a generated search query.
///
/// Surrounding whitespace is trimmed, then double quotes, then single quotes.
///
/// # Errors
///
/// Returns [`ParseErrorKind::QueryTooShort`] for queries under ten characters.
pub fn parse_query(response: &str) -> Result<String, ParseError> {
    let query = response.trim().trim_matches('"').trim_matches('\'');
    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(ParseError::new(ParseErrorKind::QueryTooShort(query.to_string())));
    }
    Ok(query.to_string())
}

/// Fixed four-beat arc used when deconstruction fails.
///
/// Summaries mentioning both "magical powers" and "birthday" get the
/// coming-of-age arc; everything else gets a generic arc.
pub fn fallback_plot_points(summary: &str) -> Vec<PlotPoint> {
    let lowered = summary.to_lowercase();
    let beats: [&str; 4] = if lowered.contains("magical powers") && lowered.contains("birthday") {
        [
            "A young woman wakes up on her 18th birthday feeling strange and different",
            "She discovers she has magical powers when objects start moving around her",
            "She struggles to understand and control her newfound abilities",
            "She realizes her life will never be the same again",
        ]
    } else {
        [
            "The main character faces an initial challenge or discovery",
            "They encounter obstacles and conflicts",
            "They learn something important about themselves or the world",
            "They reach a resolution or transformation",
        ]
    };
    beats.into_iter().map(PlotPoint::from).collect()
}

/// Templated query used when query generation fails.
///
/// # Examples
///
/// ```
/// use scrivener_agents::fallback_query;
/// use scrivener_core::PlotPoint;
///
/// let point = PlotPoint::new("She celebrates her birthday alone");
/// assert_eq!(
///     fallback_query(&point, "gothic"),
///     "gothic 18th birthday transformation descriptive passage"
/// );
/// ```
pub fn fallback_query(plot_point: &PlotPoint, genre: &str) -> String {
    let lowered = plot_point.as_str().to_lowercase();
    if lowered.contains("magical powers") {
        format!("{} discovering magical abilities descriptive scene", genre)
    } else if lowered.contains("birthday") {
        format!("{} 18th birthday transformation descriptive passage", genre)
    } else {
        let head: String = plot_point.as_str().chars().take(50).collect();
        format!("{} {} descriptive narrative", genre, head)
    }
}

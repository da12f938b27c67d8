//! Genre style guides with a two-tier cache.

use crate::AgentContext;
use scrivener_cache::{TtlCache, TtlCacheConfig};
use scrivener_core::StyleGuide;
use scrivener_error::{ParseError, ParseErrorKind, ScrivenerResult};
use scrivener_interface::{ChapterStore, Stage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.3;

/// How long a canned guide stands in for a generated one.
const FALLBACK_TTL: Duration = Duration::from_secs(300);

/// Header keywords in match order, with the section each one opens.
const SECTION_KEYWORDS: [(&str, Section); 5] = [
    ("TROPE", Section::Tropes),
    ("TECHNIQUE", Section::Techniques),
    ("TONE", Section::Tone),
    ("QUALITY", Section::Quality),
    ("STYLE", Section::Style),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    Style,
    Tone,
    Tropes,
    Techniques,
    Quality,
}

/// Researches the conventions of a genre.
///
/// Guides are looked up in an in-process TTL cache, then in the chapter
/// store, and only generated when both miss. Lookups for one genre are
/// serialized so concurrent requests generate at most once; different genres
/// proceed independently.
pub struct StyleAnalyst {
    context: AgentContext,
    store: Option<Arc<dyn ChapterStore>>,
    cache: Mutex<TtlCache<StyleGuide>>,
    genre_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl std::fmt::Debug for StyleAnalyst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleAnalyst")
            .field("context", &self.context)
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl StyleAnalyst {
    /// Create the agent with a default cache and no persistent tier.
    pub fn new(context: AgentContext) -> Self {
        Self {
            context,
            store: None,
            cache: Mutex::new(TtlCache::new(TtlCacheConfig::default())),
            genre_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Persist generated guides in, and read them back from, `store`.
    pub fn with_store(mut self, store: Arc<dyn ChapterStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the in-process cache configuration.
    pub fn with_cache_config(mut self, config: TtlCacheConfig) -> Self {
        self.cache = Mutex::new(TtlCache::new(config));
        self
    }

    /// Style guide for a genre. Never fails.
    #[tracing::instrument(skip(self))]
    pub async fn research(&self, genre: &str) -> StyleGuide {
        let started = Instant::now();

        if let Some(guide) = self.cached(genre) {
            self.context
                .emit(Stage::Style, started, false, Some("cache".to_string()));
            return guide;
        }

        let lock = self.genre_lock(genre);
        let _guard = lock.lock().await;

        // Another request may have filled the cache while we waited
        if let Some(guide) = self.cached(genre) {
            self.context
                .emit(Stage::Style, started, false, Some("cache".to_string()));
            return guide;
        }

        if let Some(guide) = self.stored(genre).await {
            self.remember(genre, &guide, None);
            self.context
                .emit(Stage::Style, started, false, Some("store".to_string()));
            return guide;
        }

        match self.generate_guide(genre).await {
            Ok(guide) => {
                self.remember(genre, &guide, None);
                self.persist(genre, &guide).await;
                self.context
                    .emit(Stage::Style, started, false, Some("generated".to_string()));
                guide
            }
            Err(e) => {
                tracing::warn!(
                    genre,
                    error = %e,
                    "Style guide generation failed, using canned guide"
                );
                let guide = StyleGuide::canned(genre);
                self.remember(genre, &guide, Some(FALLBACK_TTL));
                self.context
                    .emit(Stage::Style, started, true, Some(e.kind().to_string()));
                guide
            }
        }
    }

    fn cached(&self, genre: &str) -> Option<StyleGuide> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(genre)
    }

    fn remember(&self, genre: &str, guide: &StyleGuide, ttl: Option<Duration>) {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match ttl {
            Some(ttl) => cache.insert_expiring(genre, guide.clone(), ttl),
            None => cache.insert(genre, guide.clone()),
        }
    }

    fn genre_lock(&self, genre: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.genre_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(TtlCache::<StyleGuide>::key_for(genre))
            .or_default()
            .clone()
    }

    async fn stored(&self, genre: &str) -> Option<StyleGuide> {
        let store = self.store.as_ref()?;
        match store.style_guide(genre).await {
            Ok(guide) => guide,
            Err(e) => {
                tracing::warn!(genre, error = %e, "Style guide lookup failed");
                None
            }
        }
    }

    async fn persist(&self, genre: &str, guide: &StyleGuide) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.store_style_guide(genre, guide).await {
            tracing::warn!(genre, error = %e, "Failed to persist style guide");
        }
    }

    async fn generate_guide(&self, genre: &str) -> ScrivenerResult<StyleGuide> {
        let system = format!(
            "You are a StyleAnalyst AI that creates comprehensive style guides for {} writing.",
            genre
        );
        let request = AgentContext::request(prompt(genre), &system, MAX_TOKENS, TEMPERATURE)?;
        let response = self.context.generate(&request).await?;
        Ok(parse_style_guide(&response, genre)?)
    }
}

fn prompt(genre: &str) -> String {
    format!(
        "You are a StyleAnalyst AI agent. Create a comprehensive style guide for writing in the {genre} genre.

CORE PHILOSOPHY: You are analyzing existing styles, NOT creating new ones. Base your guide on established conventions.

Genre: {genre}

Create a detailed style guide including:

1. STYLE DESCRIPTION
   - Key characteristics of {genre} writing
   - What makes it distinctive
   - Essential elements that define the genre

2. TONE GUIDELINES
   - Appropriate emotional tone
   - Voice and perspective recommendations
   - Atmosphere and mood requirements

3. COMMON TROPES AND CONVENTIONS
   - Frequently used literary devices
   - Genre-specific conventions
   - Elements readers expect

4. WRITING TECHNIQUES
   - Sentence structure preferences
   - Vocabulary choices
   - Pacing and rhythm guidelines
   - Dialogue style (if applicable)

5. QUALITY STANDARDS
   - What makes {genre} writing effective
   - Common pitfalls to avoid
   - Benchmarks for good writing in this genre

Be specific and detailed. This guide will be used by other AI agents to maintain authentic {genre} style.

Format your response as a structured guide with clear sections."
    )
}

/// Longest line still treated as a heading when the keyword is not in capitals.
const MAX_HEADER_CHARS: usize = 60;

fn section_header(line: &str) -> Option<Section> {
    let upper = line.to_uppercase();
    let (keyword, section) = SECTION_KEYWORDS
        .iter()
        .find(|(keyword, _)| upper.contains(*keyword))?;

    if line.contains(*keyword) {
        return Some(*section);
    }

    let heading_shaped = line.starts_with('#')
        || line.starts_with("**")
        || line.ends_with(':')
        || line.starts_with(|c: char| c.is_ascii_digit());
    (heading_shaped && line.chars().count() <= MAX_HEADER_CHARS).then_some(*section)
}

/// Parse a sectioned style guide response.
///
/// A header line naming one of `TROPE`, `TECHNIQUE`, `TONE`, `QUALITY` or
/// `STYLE` (in any case, checked in that order) opens a section; the
/// non-empty lines that follow are joined with single spaces. A line counts
/// as a header when the keyword is written in capitals, or when it is short
/// and shaped like a heading (markdown `#`, bold, numbered or ending in `:`).
/// Quality notes are appended to the writing techniques. Sections the
/// response leaves out come from [`StyleGuide::genre_default`].
///
/// # Errors
///
/// Returns [`ParseErrorKind::NoSections`] when no section header is found.
///
/// # Examples
///
/// ```
/// use scrivener_agents::parse_style_guide;
///
/// let guide = parse_style_guide(
///     "TONE GUIDELINES:\nBleak and clipped.\nNever sentimental.",
///     "noir",
/// )
/// .unwrap();
/// assert_eq!(guide.tone_guidelines(), "Bleak and clipped. Never sentimental.");
/// assert!(guide.style_description().starts_with("Authentic noir writing style"));
/// ```
pub fn parse_style_guide(response: &str, genre: &str) -> Result<StyleGuide, ParseError> {
    let mut sections: HashMap<Section, Vec<&str>> = HashMap::new();
    let mut current: Option<Section> = None;

    for line in response.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match section_header(line) {
            Some(section) => {
                sections.entry(section).or_default();
                current = Some(section);
            }
            None => {
                if let Some(section) = current {
                    sections.entry(section).or_default().push(line);
                }
            }
        }
    }

    if sections.is_empty() {
        return Err(ParseError::new(ParseErrorKind::NoSections));
    }

    let text = |section: Section| {
        sections
            .get(&section)
            .map(|lines| lines.join(" "))
            .unwrap_or_default()
    };

    let techniques = text(Section::Techniques);
    let quality = text(Section::Quality);
    let writing_tips = match (techniques.is_empty(), quality.is_empty()) {
        (_, true) => techniques,
        (true, false) => quality,
        (false, false) => format!("{} {}", techniques, quality),
    };

    let parsed = StyleGuide::new(
        text(Section::Style),
        text(Section::Tone),
        text(Section::Tropes),
        writing_tips,
    );
    Ok(parsed.filled_from(&StyleGuide::genre_default(genre)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_map_by_keyword() {
        let response = "1. STYLE DESCRIPTION\n\
            Lean prose.\n\
            \n\
            2. TONE GUIDELINES\n\
            Dread builds slowly.\n\
            3. COMMON TROPES AND CONVENTIONS\n\
            Haunted houses.\n\
            4. WRITING TECHNIQUES\n\
            Short sentences.\n\
            5. QUALITY STANDARDS\n\
            Earn every scare.";
        let guide = parse_style_guide(response, "horror").unwrap();
        assert_eq!(guide.style_description(), "Lean prose.");
        assert_eq!(guide.tone_guidelines(), "Dread builds slowly.");
        assert_eq!(guide.common_tropes(), "Haunted houses.");
        assert_eq!(guide.writing_tips(), "Short sentences. Earn every scare.");
    }

    #[test]
    fn test_trope_wins_over_style_on_one_line() {
        let response = "STYLE TROPES\nChosen ones.";
        let guide = parse_style_guide(response, "fantasy").unwrap();
        assert_eq!(guide.common_tropes(), "Chosen ones.");
        assert!(guide.style_description().starts_with("Authentic fantasy"));
    }

    #[test]
    fn test_text_before_first_header_is_ignored() {
        let response = "Sure! Here is your guide.\nTONE\nWry.";
        let guide = parse_style_guide(response, "comedy").unwrap();
        assert_eq!(guide.tone_guidelines(), "Wry.");
    }

    #[test]
    fn test_title_case_markdown_headers() {
        let response = "## Style Description\nLean, clipped prose.\n\
            ## Tone Guidelines\nBleak.\n\
            ## Common Tropes\nFemme fatale.\n\
            ## Writing Techniques\nShort sentences.\n\
            **Quality Standards**\nNo wasted words.";
        let guide = parse_style_guide(response, "noir").unwrap();
        assert_eq!(guide.style_description(), "Lean, clipped prose.");
        assert_eq!(guide.tone_guidelines(), "Bleak.");
        assert_eq!(guide.common_tropes(), "Femme fatale.");
        assert_eq!(guide.writing_tips(), "Short sentences. No wasted words.");
    }

    #[test]
    fn test_lowercase_keyword_in_prose_stays_body_text() {
        let response = "Tone:\nBleak.\nkeep the tone dark and the style spare";
        let guide = parse_style_guide(response, "noir").unwrap();
        assert_eq!(
            guide.tone_guidelines(),
            "Bleak. keep the tone dark and the style spare"
        );
    }

    #[test]
    fn test_no_sections() {
        let err = parse_style_guide("Write well and often.", "romance").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NoSections);
    }
}

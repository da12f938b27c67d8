//! Genre style guides.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Structured genre guidance shared by the weaving and polishing stages.
///
/// Agents consume the guide through [`StyleGuide::formatted`], the canonical
/// single-string rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct StyleGuide {
    /// Key characteristics of the genre
    #[new(into)]
    style_description: String,
    /// Emotional tone and voice
    #[new(into)]
    tone_guidelines: String,
    /// Conventions readers expect
    #[new(into)]
    common_tropes: String,
    /// Sentence-level technique
    #[new(into)]
    writing_tips: String,
}

impl StyleGuide {
    /// Canned guide used when no generated guide is available.
    ///
    /// Genres mentioning "fantasy" get the fantasy guide; everything else gets
    /// the general-fiction guide.
    pub fn canned(genre: &str) -> Self {
        if genre.to_lowercase().contains("fantasy") {
            Self::new(
                "Wonder, magic, and epic scale",
                "Rich, descriptive world-building with evocative sensory details",
                "Clear magic system rules, heroic character arcs, good vs evil conflicts",
                "Show magic through character experience, build immersive worlds with layered details",
            )
        } else {
            Self::new(
                "Authentic and engaging",
                "Clear, accessible prose with strong character voice",
                "Follow genre expectations while maintaining reader engagement",
                "Show character through action and dialogue, use specific concrete details",
            )
        }
    }

    /// Genre-interpolated defaults used to fill sections a generated guide left out.
    pub fn genre_default(genre: &str) -> Self {
        let spaced = genre.replace('_', " ");
        Self::new(
            format!("Authentic {} writing style with rich descriptive language", spaced),
            "Maintain consistent tone appropriate to the genre and story context",
            format!("Use established {} conventions while avoiding clichés", genre),
            "Focus on sensory details, character development, and authentic voice",
        )
    }

    /// Replace empty sections with the corresponding sections of `defaults`.
    pub fn filled_from(mut self, defaults: &StyleGuide) -> Self {
        if self.style_description.trim().is_empty() {
            self.style_description = defaults.style_description.clone();
        }
        if self.tone_guidelines.trim().is_empty() {
            self.tone_guidelines = defaults.tone_guidelines.clone();
        }
        if self.common_tropes.trim().is_empty() {
            self.common_tropes = defaults.common_tropes.clone();
        }
        if self.writing_tips.trim().is_empty() {
            self.writing_tips = defaults.writing_tips.clone();
        }
        self
    }

    /// Canonical multi-line rendering.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_core::StyleGuide;
    ///
    /// let text = StyleGuide::canned("fantasy").formatted();
    /// assert!(text.starts_with("GENRE STYLE GUIDE: Wonder, magic, and epic scale"));
    /// assert!(text.ends_with("layered details"));
    /// ```
    pub fn formatted(&self) -> String {
        format!(
            "GENRE STYLE GUIDE: {}\n\nTONE GUIDELINES:\n{}\n\nCONVENTIONS AND TROPES:\n{}\n\nWRITING TECHNIQUES:\n{}",
            self.style_description, self.tone_guidelines, self.common_tropes, self.writing_tips
        )
        .trim()
        .to_string()
    }
}

impl std::fmt::Display for StyleGuide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

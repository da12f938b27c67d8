//! The seven chapter pipeline agents.
//!
//! Each agent wraps one pipeline stage: it owns its prompt templates, calls the
//! injected [`TextGenerator`](scrivener_interface::TextGenerator), parses the
//! response into a typed value, and substitutes a deterministic fallback when
//! generation or parsing fails. Agents never return errors to the orchestrator.
//!
//! Parsers are exposed as plain functions returning `Result<_, ParseError>` so
//! they can be exercised without a generator:
//!
//! ```
//! use scrivener_agents::parse_plot_points;
//!
//! let points = parse_plot_points(
//!     "1. Mara finds the drowned lighthouse\n\
//!      2. The lamp relights on its own\n\
//!      3. A ship answers the signal",
//! )
//! .unwrap();
//! assert_eq!(points.len(), 3);
//! assert_eq!(points[0].as_str(), "Mara finds the drowned lighthouse");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod characters;
mod context;
mod extraction;
mod intent;
mod lore;
mod polish;
mod roster;
mod scout;
mod style;
mod weaver;

pub use characters::{CharacterExtractor, fallback_characters, parse_characters};
pub use context::{AgentContext, DEFAULT_AGENT_TIMEOUT};
pub use extraction::{extract_json, parse_json};
pub use intent::{IntentAnalyst, fallback_brief, parse_brief};
pub use lore::{LoreMaster, fallback_lore, parse_lore};
pub use polish::{CorrectionPolish, mechanical_polish, parse_polished};
pub use roster::AgentRoster;
pub use scout::{
    MIN_PLOT_POINTS, SceneScout, fallback_plot_points, fallback_query, parse_plot_points,
    parse_query,
};
pub use style::{StyleAnalyst, parse_style_guide};
pub use weaver::{MasterWeaver, fallback_section, parse_section};

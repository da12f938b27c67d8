//! Extracted world-building metadata.

use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A character mentioned in a chapter. Keyed by name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new,
)]
pub struct CharacterRecord {
    /// Name exactly as it appears in the text
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    name: String,
    /// What the text says about them
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    description: String,
    /// Background given in the text
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    backstory: String,
    /// Stated or implied traits
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    personality: String,
    /// How they enter the story
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    first_appearance: String,
}

/// A piece of world-building lore. Keyed by category and name.
///
/// The category travels under the JSON key `type`, which is what generators
/// are asked to emit; `category` is accepted on input as well.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new,
)]
pub struct LoreRecord {
    /// Kind of lore: location, concept, time, object, organization, ...
    #[serde(rename = "type", alias = "category", default, deserialize_with = "lenient_text")]
    #[new(into)]
    category: String,
    /// Name as used in the text
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    name: String,
    /// What the text says about it
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    description: String,
    /// Why it matters to the story
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    significance: String,
    /// Specific details from the text
    #[serde(default, deserialize_with = "lenient_text")]
    #[new(into)]
    details: String,
}

/// Decode a text field from whatever a generator put there.
///
/// `null` becomes empty, arrays are joined with `", "`, other scalars are
/// stringified and objects keep their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flatten_text(&Value::deserialize(deserializer)?))
}

fn flatten_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(flatten_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

impl LoreRecord {
    /// Upsert key for this record.
    pub fn key(&self) -> (String, String) {
        (self.category.clone(), self.name.clone())
    }
}

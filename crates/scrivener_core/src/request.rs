//! Request type for text generation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One call to a text generator.
///
/// # Examples
///
/// ```
/// use scrivener_core::GenerateRequest;
///
/// let request = GenerateRequest::builder()
///     .prompt("Deconstruct this summary into plot points.")
///     .system_message(Some("You are an expert in story structure.".to_string()))
///     .max_tokens(800u32)
///     .temperature(0.6f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.max_tokens(), 800);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// User prompt
    prompt: String,
    /// Optional system instruction
    #[builder(default)]
    system_message: Option<String>,
    /// Maximum number of tokens to generate
    #[builder(default = "1000")]
    max_tokens: u32,
    /// Sampling temperature (0.0 to 1.0)
    #[builder(default = "0.7")]
    temperature: f32,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

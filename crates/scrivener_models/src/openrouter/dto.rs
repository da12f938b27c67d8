//! Wire types for the OpenAI-compatible chat completions API.

use derive_getters::Getters;
use scrivener_core::GenerateRequest;
use serde::{Deserialize, Serialize};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    /// System-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST {base}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

impl ChatCompletionRequest {
    /// Build the wire request: optional system message first, then the prompt.
    pub fn from_request(model: &str, request: &GenerateRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_message() {
            if !system.trim().is_empty() {
                messages.push(ChatMessage::system(system.clone()));
            }
        }
        messages.push(ChatMessage::user(request.prompt().clone()));

        Self {
            model: model.to_string(),
            messages,
            max_tokens: *request.max_tokens(),
            temperature: *request.temperature(),
            stream: false,
        }
    }
}

/// Response body.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

impl ChatCompletionResponse {
    /// Trimmed text of the first choice, if non-empty.
    pub fn first_text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// One completion choice.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

/// Message inside a choice; content may be null.
#[derive(Debug, Clone, Default, Deserialize, Getters)]
pub struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, Deserialize, Getters)]
pub struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_precedes_prompt() {
        let request = GenerateRequest::builder()
            .prompt("Write the scene.")
            .system_message(Some("You are a novelist.".to_string()))
            .max_tokens(500u32)
            .temperature(0.4f32)
            .build()
            .unwrap();

        let wire = ChatCompletionRequest::from_request("google/gemini-pro", &request);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["model"], "google/gemini-pro");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Write the scene.");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_no_system_message_sends_prompt_only() {
        let request = GenerateRequest::builder().prompt("Hi").build().unwrap();
        let wire = ChatCompletionRequest::from_request("m", &request);
        assert_eq!(wire.messages().len(), 1);
        assert_eq!(wire.messages()[0].role(), "user");
    }

    #[test]
    fn test_first_text_trims_and_rejects_blank() {
        let body = r#"{"choices":[{"message":{"content":"  The rain fell.\n"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text().as_deref(), Some("The rain fell."));

        let blank = r#"{"choices":[{"message":{"content":"   "}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(blank).unwrap();
        assert!(response.first_text().is_none());

        let null = r#"{"choices":[{"message":{"content":null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(null).unwrap();
        assert!(response.first_text().is_none());

        let response: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.first_text().is_none());
    }
}

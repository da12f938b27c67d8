//! OpenAI-compatible chat completions gateway.

mod client;
mod dto;

pub use client::{OpenRouterClient, RetrySettings};
pub use dto::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatUsage,
    ChoiceMessage,
};

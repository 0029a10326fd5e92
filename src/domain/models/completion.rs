use serde::{Deserialize, Serialize};

use super::ChatMessage;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One chat-completion request body, built fresh per turn and discarded
/// after the call.
///
/// Always carries at least one message; the constructor takes the first
/// message so an empty list cannot be represented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, message: ChatMessage) -> Self {
        Self {
            model: model.into(),
            messages: vec![message],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        // Ensure at least 1 token is requested
        self.max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Minimal subset of the chat-completion response we care about.
/// Only `choices[0].message.content` is ever read.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    message: ChatMessage,
}

impl CompletionResponse {
    /// Content of the first choice, if the response carried any.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.into_content())
    }
}

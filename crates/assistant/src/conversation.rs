use shared::domain::{ChatMessage, ChatRole, Language};

use crate::{prompts, Assistant};

/// Chat transcript shown to the patient, seeded with the assistant greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    language: Language,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            messages: vec![ChatMessage::new(
                ChatRole::Model,
                prompts::greeting(language),
            )],
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Switching language starts a fresh transcript in that language.
    pub fn set_language(&mut self, language: Language) {
        if language != self.language {
            *self = Self::new(language);
        }
    }

    /// Records the user's message and returns the history that preceded it,
    /// or `None` for blank input.
    pub fn push_user(&mut self, input: &str) -> Option<Vec<ChatMessage>> {
        if input.trim().is_empty() {
            return None;
        }
        let history = self.messages.clone();
        self.messages.push(ChatMessage::new(ChatRole::User, input));
        Some(history)
    }

    pub fn push_reply(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(ChatRole::Model, text));
        &self.messages[self.messages.len() - 1]
    }

    /// Full exchange against a local assistant.
    pub async fn send(&mut self, assistant: &Assistant, input: &str) -> Option<&ChatMessage> {
        let history = self.push_user(input)?;
        let reply = assistant.reply(&history, input, self.language).await;
        Some(self.push_reply(reply))
    }
}

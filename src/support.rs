//! Customer support chat backed by the generative model

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::errors::PincodeError;
use crate::errors::Result;
use crate::llm::prompts::PostalPrompts;
use crate::llm::ChatRole;
use crate::llm::ChatTurn;
use crate::llm::GenerationRequest;
use crate::llm::GenerativeModel;

pub const SUPPORT_GREETING: &str =
    "Hi! I am the PincodePro AI Assistant. How can I help you find postal information today?";
pub const SUPPORT_UNCLEAR_REPLY: &str = "I'm sorry, I couldn't process that. Please try again.";
pub const SUPPORT_BUSY_REPLY: &str = "Support is currently busy. Please try later.";

/// Ten exchanges
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Chat message as shown to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportMessage {
    pub role: &'static str,
    pub text: String,
}

/// Bounded chat history; the oldest exchange is dropped first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportConversation {
    turns: Vec<ChatTurn>,
    max_turns: usize,
}

impl Default for SupportConversation {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl SupportConversation {
    #[must_use]
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns: max_turns.max(2),
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn push_exchange(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.turns.push(ChatTurn::user(user));
        self.turns.push(ChatTurn::model(reply));
        while self.turns.len() > self.max_turns {
            self.turns.drain(0..2);
        }
    }

    /// Transcript starting with the greeting
    #[must_use]
    pub fn transcript(&self) -> Vec<SupportMessage> {
        std::iter::once(SupportMessage {
            role: "bot",
            text: SUPPORT_GREETING.to_string(),
        })
        .chain(self.turns.iter().map(|turn| SupportMessage {
            role: match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "bot",
            },
            text: turn.text.clone(),
        }))
        .collect()
    }
}

pub struct SupportAgent {
    model: Arc<dyn GenerativeModel>,
    model_name: String,
}

impl SupportAgent {
    pub fn new(model: Arc<dyn GenerativeModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// Answer `message` in the context of `conversation` and record the
    /// exchange. Model failures become a canned reply; only a blank message
    /// is an error.
    pub async fn reply(&self, conversation: &mut SupportConversation, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(PincodeError::EmptyQuery);
        }

        let mut turns = conversation.turns().to_vec();
        turns.push(ChatTurn::user(message));
        let request = GenerationRequest::conversation(&self.model_name, PostalPrompts::support_system(), turns);

        let reply = match self.model.generate(request).await {
            Ok(reply) => {
                debug!("Support reply: {} chars", reply.text.len());
                reply.text
            }
            Err(e @ PincodeError::SchemaViolation(_)) => {
                warn!("Support reply unusable: {}", e);
                SUPPORT_UNCLEAR_REPLY.to_string()
            }
            Err(e) => {
                warn!("Support chat failed: {}", e);
                SUPPORT_BUSY_REPLY.to_string()
            }
        };

        conversation.push_exchange(message, reply.clone());
        Ok(reply)
    }
}

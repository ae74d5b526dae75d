//! FAQ-backed conversation agent
//!
//! The agent answers each user message with the closest FAQ answer, or with a
//! canned fallback when nothing in the knowledge base is similar enough. Every
//! call to [`ConversationAgent::respond`] appends exactly one user turn and one
//! assistant turn to the history.

mod fallback;
pub mod matcher;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::knowledge::KnowledgeBase;
use crate::{Error, Result};

pub use fallback::{RECAP_MAX_CHARS, RECAP_TURNS, fallback_response};
pub use matcher::{DEFAULT_SIMILARITY_THRESHOLD, Match, best_match, similarity};

/// Default system prompt seeded into every conversation
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the MAS.665 homework assistant. Answer questions \
    using the knowledge base when possible. Be concise and provide actionable suggestions.";

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Lowercase role name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    /// Create a turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Conversational agent backed by a FAQ knowledge base
#[derive(Debug, Clone)]
pub struct ConversationAgent {
    knowledge_base: KnowledgeBase,
    similarity_threshold: f64,
    history: Vec<ConversationTurn>,
}

impl ConversationAgent {
    /// Create an agent from a knowledge base file with default settings
    ///
    /// # Errors
    ///
    /// Returns error if the knowledge base is missing or malformed
    pub fn new(knowledge_base_path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(knowledge_base_path).build()
    }

    /// Start building an agent from a knowledge base file
    #[must_use]
    pub fn builder(knowledge_base_path: impl Into<PathBuf>) -> ConversationAgentBuilder {
        ConversationAgentBuilder::new(knowledge_base_path.into())
    }

    /// Create an agent from an already-loaded knowledge base with default settings
    #[must_use]
    pub fn from_knowledge_base(knowledge_base: KnowledgeBase) -> Self {
        Self::with_settings(
            knowledge_base,
            DEFAULT_SIMILARITY_THRESHOLD,
            DEFAULT_SYSTEM_PROMPT.to_string(),
        )
    }

    fn with_settings(
        knowledge_base: KnowledgeBase,
        similarity_threshold: f64,
        system_prompt: String,
    ) -> Self {
        Self {
            knowledge_base,
            similarity_threshold,
            history: vec![ConversationTurn::new(Role::System, system_prompt)],
        }
    }

    /// Answer a user message and record both sides of the exchange
    pub fn respond(&mut self, message: &str) -> String {
        let response = self.reply(message);
        self.record(message, response.clone());
        response
    }

    /// Compute the answer to `message` without touching the history
    ///
    /// The result is what [`Self::respond`] would return right now.
    #[must_use]
    pub fn reply(&self, message: &str) -> String {
        if let Some(answer) = self.search_faq(message) {
            return answer.to_string();
        }

        // Recap sees the pending user turn as the latest one
        let start = self.history.len().saturating_sub(RECAP_TURNS - 1);
        let mut recent = self.history[start..].to_vec();
        recent.push(ConversationTurn::new(Role::User, message));
        fallback_response(message, self.knowledge_base.first_tip(), &recent)
    }

    /// Append a completed exchange to the history
    pub(crate) fn record(&mut self, message: &str, response: String) {
        self.history.push(ConversationTurn::new(Role::User, message));
        self.history.push(ConversationTurn::new(Role::Assistant, response));
    }

    /// Find the answer to the FAQ question most similar to `query`
    fn search_faq(&self, query: &str) -> Option<&str> {
        let found = best_match(
            query,
            self.knowledge_base.questions(),
            self.similarity_threshold,
        )?;
        let faq = &self.knowledge_base.faqs[found.index];

        tracing::debug!(
            question = %faq.question,
            score = found.score,
            "faq match"
        );

        // A blank answer is no answer
        Some(faq.answer.as_str()).filter(|a| !a.trim().is_empty())
    }

    /// Snapshot of the conversation history
    #[must_use]
    pub fn export_history(&self) -> Vec<ConversationTurn> {
        self.history.clone()
    }

    /// Borrow the conversation history
    #[must_use]
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Borrow the knowledge base
    #[must_use]
    pub const fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Minimum similarity for a FAQ match
    #[must_use]
    pub const fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }
}

/// Builder for [`ConversationAgent`]
#[derive(Debug, Clone)]
pub struct ConversationAgentBuilder {
    knowledge_base_path: PathBuf,
    similarity_threshold: f64,
    system_prompt: String,
}

impl ConversationAgentBuilder {
    fn new(knowledge_base_path: PathBuf) -> Self {
        Self {
            knowledge_base_path,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Set the minimum similarity for a FAQ match
    #[must_use]
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the system prompt seeded into the history
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Load the knowledge base and build the agent
    ///
    /// # Errors
    ///
    /// Returns error if the threshold is outside `[0, 1]` or the knowledge base
    /// cannot be loaded
    pub fn build(self) -> Result<ConversationAgent> {
        validate_threshold(self.similarity_threshold)?;
        let knowledge_base = KnowledgeBase::load(&self.knowledge_base_path)?;

        tracing::info!(
            path = %self.knowledge_base_path.display(),
            faqs = knowledge_base.faqs.len(),
            threshold = self.similarity_threshold,
            "conversation agent ready"
        );

        Ok(ConversationAgent::with_settings(
            knowledge_base,
            self.similarity_threshold,
            self.system_prompt,
        ))
    }

    /// Path the knowledge base will be loaded from
    #[must_use]
    pub fn knowledge_base_path(&self) -> &Path {
        &self.knowledge_base_path
    }
}

/// Check that a similarity threshold lies within `[0, 1]`
///
/// # Errors
///
/// Returns `Config` error for out-of-range or NaN values
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "similarity threshold must be between 0 and 1, got {threshold}"
        )))
    }
}

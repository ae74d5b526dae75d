//! Voice Agent - spoken answers from a FAQ knowledge base
//!
//! This library turns an audio question into an audio answer:
//! - Speech-to-text through a pluggable [`SpeechToText`] backend
//! - FAQ matching with a canned fallback ([`ConversationAgent`])
//! - Text-to-speech through a pluggable [`TextToSpeech`] backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │          CLI (voice-agent)  │  HTTP (/voice-chat)    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               VoiceConversation                      │
//! │      STT  ──▶  ConversationAgent  ──▶  TTS           │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 KnowledgeBase                        │
//! │            faqs  │  tips  (JSON / YAML)              │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod voice;

pub use agent::{ConversationAgent, ConversationAgentBuilder, ConversationTurn, Role};
pub use config::Config;
pub use conversation::{ResponsePayload, VoiceConversation};
pub use error::{Error, Result};
pub use knowledge::{FaqEntry, KnowledgeBase};
pub use voice::{SpeechToText, TextToSpeech};

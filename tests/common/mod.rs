//! Shared test utilities

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use voice_agent::voice::{StaticSynthesizer, StaticTranscriber};
use voice_agent::{
    ConversationAgent, Error, FaqEntry, KnowledgeBase, Result, SpeechToText, TextToSpeech,
    VoiceConversation,
};

/// Knowledge base with a single course FAQ and one tip
#[must_use]
pub fn course_knowledge_base() -> KnowledgeBase {
    KnowledgeBase {
        faqs: vec![FaqEntry {
            question: "What is MAS.665?".to_string(),
            answer: "MAS.665 is a course.".to_string(),
        }],
        tips: vec!["Ask early.".to_string()],
    }
}

/// Write the course knowledge base to a temporary JSON file
pub fn write_knowledge_base() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("failed to create temp file");
    let json = serde_json::to_string(&course_knowledge_base()).expect("failed to encode kb");
    file.write_all(json.as_bytes()).expect("failed to write kb");
    file
}

/// Conversation with fixed speech backends
#[must_use]
pub fn stub_conversation(transcript: &str) -> VoiceConversation {
    VoiceConversation::new(
        ConversationAgent::from_knowledge_base(course_knowledge_base()),
        Arc::new(StaticTranscriber::new(transcript)),
        Arc::new(StaticSynthesizer::new(b"abc".to_vec(), 22050)),
    )
}

/// Conversation whose synthesizer always fails
#[must_use]
pub fn mute_conversation(transcript: &str) -> VoiceConversation {
    VoiceConversation::new(
        ConversationAgent::from_knowledge_base(course_knowledge_base()),
        Arc::new(StaticTranscriber::new(transcript)),
        Arc::new(FailingSynthesizer),
    )
}

/// Conversation whose synthesizer never finishes
#[must_use]
pub fn stalled_conversation(transcript: &str) -> VoiceConversation {
    VoiceConversation::new(
        ConversationAgent::from_knowledge_base(course_knowledge_base()),
        Arc::new(StaticTranscriber::new(transcript)),
        Arc::new(StalledSynthesizer),
    )
}

/// Conversation whose transcriber always fails
#[must_use]
pub fn deaf_conversation() -> VoiceConversation {
    VoiceConversation::new(
        ConversationAgent::from_knowledge_base(course_knowledge_base()),
        Arc::new(FailingTranscriber),
        Arc::new(StaticSynthesizer::new(b"abc".to_vec(), 22050)),
    )
}

pub struct FailingSynthesizer;

#[async_trait]
impl TextToSpeech for FailingSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<(Vec<u8>, u32)> {
        Err(Error::Tts("synthesizer offline".to_string()))
    }
}

pub struct StalledSynthesizer;

#[async_trait]
impl TextToSpeech for StalledSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<(Vec<u8>, u32)> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(Error::Tts("synthesizer timed out".to_string()))
    }
}

pub struct FailingTranscriber;

#[async_trait]
impl SpeechToText for FailingTranscriber {
    async fn transcribe(&self, _audio: &[u8], _sample_rate: Option<u32>) -> Result<String> {
        Err(Error::Stt("transcriber offline".to_string()))
    }
}

//! Voice conversation orchestration
//!
//! One exchange runs STT, then the agent, then TTS. The exchange either
//! completes and is recorded in the session, or fails and leaves both the
//! session and the agent history as they were.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::agent::{ConversationAgent, ConversationTurn};
use crate::voice::{
    OpenAiSpeech, SpeechToText, TextToSpeech, WhisperApi, ensure_audio, read_audio_file,
};
use crate::{Config, Result};

/// Message returned by [`VoiceConversation::summarize_session`] before any exchange
pub const EMPTY_SESSION_SUMMARY: &str = "No conversation has taken place yet.";

/// Result of one completed audio exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsePayload {
    /// What the user said
    pub transcript: String,
    /// What the agent answered
    pub response_text: String,
    /// Synthesized answer (WAV bytes)
    #[serde(skip)]
    pub audio: Vec<u8>,
    /// Sample rate of `audio`
    pub sample_rate: u32,
    /// Agent history after the exchange
    pub history: Vec<ConversationTurn>,
}

/// Turns audio questions into audio answers and keeps the session record
pub struct VoiceConversation {
    session_id: Uuid,
    agent: ConversationAgent,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    responses: Vec<ResponsePayload>,
}

impl VoiceConversation {
    /// Create a new session
    pub fn new(
        agent: ConversationAgent,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "voice conversation started");
        Self {
            session_id,
            agent,
            stt,
            tts,
            responses: Vec::new(),
        }
    }

    /// Build a session with hosted speech backends as configured
    ///
    /// # Errors
    ///
    /// Returns error if the knowledge base cannot be loaded or no API key is
    /// configured for the speech backends
    pub fn from_config(config: &Config) -> Result<Self> {
        let agent = ConversationAgent::builder(&config.knowledge_base)
            .similarity_threshold(config.agent.similarity_threshold)
            .system_prompt(config.agent.system_prompt.clone())
            .build()?;

        let api_key = config.require_openai_key()?;
        let voice = &config.voice;

        let stt = WhisperApi::new(api_key.clone(), voice.stt_model.clone())?
            .with_language(voice.stt_language.clone())
            .with_base_url(voice.stt_base_url.clone());
        let tts = OpenAiSpeech::with_model(
            api_key,
            voice.tts_voice.clone(),
            voice.tts_speed,
            voice.tts_model.clone(),
        )?
        .with_base_url(voice.tts_base_url.clone());

        Ok(Self::new(agent, Arc::new(stt), Arc::new(tts)))
    }

    /// Run one exchange from encoded audio bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty audio, or whatever the STT or TTS
    /// backend fails with. On error nothing is recorded.
    pub async fn handle_audio_bytes(
        &mut self,
        audio: &[u8],
        sample_rate: Option<u32>,
    ) -> Result<ResponsePayload> {
        ensure_audio(audio)?;

        let transcript = self.stt.transcribe(audio, sample_rate).await?;
        tracing::debug!(session_id = %self.session_id, transcript = %transcript, "transcribed");

        // Turns are recorded only once speech exists
        let response_text = self.agent.reply(&transcript);

        let (speech, speech_rate) = self.tts.synthesize(&response_text).await.inspect_err(|e| {
            tracing::warn!(
                session_id = %self.session_id,
                error = %e,
                "synthesis failed, discarding exchange"
            );
        })?;

        self.agent.record(&transcript, response_text.clone());

        let payload = ResponsePayload {
            transcript,
            response_text,
            audio: speech,
            sample_rate: speech_rate,
            history: self.agent.export_history(),
        };
        self.responses.push(payload.clone());

        tracing::info!(
            session_id = %self.session_id,
            turn = self.responses.len(),
            audio_bytes = payload.audio.len(),
            "exchange complete"
        );

        Ok(payload)
    }

    /// Run one exchange from an audio file
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist, otherwise the same errors
    /// as [`Self::handle_audio_bytes`]
    pub async fn handle_audio_file(&mut self, path: &Path) -> Result<ResponsePayload> {
        let audio = read_audio_file(path).await?;
        self.handle_audio_bytes(&audio, None).await
    }

    /// Write the synthesized audio of `payload` to `path`
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns `Io` error if the directory or file cannot be written
    pub async fn save_audio_response(payload: &ResponsePayload, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &payload.audio).await?;
        tracing::debug!(path = %path.display(), bytes = payload.audio.len(), "saved audio response");
        Ok(())
    }

    /// Numbered list of every answer given so far
    #[must_use]
    pub fn summarize_session(&self) -> String {
        if self.responses.is_empty() {
            return EMPTY_SESSION_SUMMARY.to_string();
        }
        self.responses
            .iter()
            .enumerate()
            .map(|(i, payload)| format!("Turn {}: {}", i + 1, payload.response_text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Completed exchanges in order
    #[must_use]
    pub fn responses(&self) -> &[ResponsePayload] {
        &self.responses
    }

    /// The underlying agent
    #[must_use]
    pub const fn agent(&self) -> &ConversationAgent {
        &self.agent
    }

    /// Identifier used to correlate log lines for this session
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{FaqEntry, KnowledgeBase};
    use crate::voice::{StaticSynthesizer, StaticTranscriber};

    fn agent() -> ConversationAgent {
        ConversationAgent::from_knowledge_base(KnowledgeBase {
            faqs: vec![FaqEntry {
                question: "What is MAS.665?".to_string(),
                answer: "MAS.665 is a course.".to_string(),
            }],
            tips: vec!["Ask early.".to_string()],
        })
    }

    fn conversation(transcript: &str) -> VoiceConversation {
        VoiceConversation::new(
            agent(),
            Arc::new(StaticTranscriber::new(transcript)),
            Arc::new(StaticSynthesizer::new(b"abc".to_vec(), 22050)),
        )
    }

    #[tokio::test]
    async fn test_summary_before_any_exchange() {
        let convo = conversation("hello");
        assert_eq!(convo.summarize_session(), EMPTY_SESSION_SUMMARY);
        assert!(convo.responses().is_empty());
    }

    #[tokio::test]
    async fn test_summary_numbers_turns() {
        let mut convo = conversation("What is MAS.665?");
        convo.handle_audio_bytes(b"one", None).await.unwrap();
        convo.handle_audio_bytes(b"two", None).await.unwrap();

        assert_eq!(
            convo.summarize_session(),
            "Turn 1: MAS.665 is a course.\nTurn 2: MAS.665 is a course."
        );
    }

    #[tokio::test]
    async fn test_empty_audio_records_nothing() {
        let mut convo = conversation("hello");
        let err = convo.handle_audio_bytes(b"", None).await.unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));
        assert!(convo.responses().is_empty());
        assert_eq!(convo.agent().history().len(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_failure_records_no_agent_turns() {
        struct Mute;

        #[async_trait::async_trait]
        impl TextToSpeech for Mute {
            async fn synthesize(&self, _text: &str) -> Result<(Vec<u8>, u32)> {
                Err(crate::Error::Tts("muted".to_string()))
            }
        }

        let mut convo = VoiceConversation::new(
            agent(),
            Arc::new(StaticTranscriber::new("What is MAS.665?")),
            Arc::new(Mute),
        );

        let err = convo.handle_audio_bytes(b"audio", None).await.unwrap_err();
        assert!(matches!(err, crate::Error::Tts(_)));
        assert!(convo.responses().is_empty());
        assert_eq!(convo.agent().history().len(), 1);
    }

    #[test]
    fn test_payload_serialization_skips_audio() {
        let payload = ResponsePayload {
            transcript: "hi".to_string(),
            response_text: "hello".to_string(),
            audio: vec![1, 2, 3],
            sample_rate: 16000,
            history: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("audio").is_none());
        assert_eq!(json["sample_rate"], 16000);
    }
}

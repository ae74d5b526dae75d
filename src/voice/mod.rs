//! Speech capabilities
//!
//! The orchestrator only depends on the two traits below. Concrete backends
//! call OpenAI-compatible speech APIs; [`StaticTranscriber`] and
//! [`StaticSynthesizer`] are deterministic stand-ins for tests and offline runs.
//!
//! Implementations are not assumed to be reentrant. Callers sharing one
//! instance across tasks must serialize access (the HTTP API holds the whole
//! orchestrator behind a mutex).

mod stt;
mod stub;
mod tts;
pub mod wav;

use std::path::Path;

use async_trait::async_trait;

use crate::{Error, Result};

pub use stt::WhisperApi;
pub use stub::{StaticSynthesizer, StaticTranscriber};
pub use tts::{MAX_SPEED, MIN_SPEED, OpenAiSpeech, validate_speed};
pub use wav::wav_sample_rate;

/// Default base URL for OpenAI-compatible speech endpoints
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Converts recorded speech to text
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe encoded audio bytes
    ///
    /// `sample_rate` is a hint for raw formats; container formats carry their own.
    ///
    /// # Errors
    ///
    /// Returns error if the audio is unusable or the backend fails
    async fn transcribe(&self, audio: &[u8], sample_rate: Option<u32>) -> Result<String>;

    /// Transcribe an audio file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or transcription fails
    async fn transcribe_file(&self, path: &Path) -> Result<String> {
        let audio = read_audio_file(path).await?;
        self.transcribe(&audio, None).await
    }
}

/// Converts reply text to encoded speech
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize `text`, returning WAV bytes and their sample rate
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `text` is empty or whitespace-only, or a
    /// backend error if synthesis fails
    async fn synthesize(&self, text: &str) -> Result<(Vec<u8>, u32)>;
}

/// Read an audio file, mapping a missing path to `NotFound`
pub(crate) async fn read_audio_file(path: &Path) -> Result<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound(format!(
            "audio file not found: {}",
            path.display()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Reject empty or whitespace-only synthesis input
pub(crate) fn ensure_speakable(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput(
            "text to synthesize cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Reject empty audio before it reaches a backend
pub(crate) fn ensure_audio(audio: &[u8]) -> Result<()> {
    if audio.is_empty() {
        return Err(Error::InvalidInput("audio data is empty".to_string()));
    }
    Ok(())
}

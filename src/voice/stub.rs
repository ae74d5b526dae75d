//! Fixed-output speech backends

use async_trait::async_trait;

use super::{SpeechToText, TextToSpeech, ensure_audio, ensure_speakable};
use crate::Result;

/// Transcriber that returns the same transcript for any non-empty audio
#[derive(Debug, Clone)]
pub struct StaticTranscriber {
    transcript: String,
}

impl StaticTranscriber {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }
}

#[async_trait]
impl SpeechToText for StaticTranscriber {
    async fn transcribe(&self, audio: &[u8], _sample_rate: Option<u32>) -> Result<String> {
        ensure_audio(audio)?;
        Ok(self.transcript.clone())
    }
}

/// Synthesizer that returns the same audio for any speakable text
#[derive(Debug, Clone)]
pub struct StaticSynthesizer {
    audio: Vec<u8>,
    sample_rate: u32,
}

impl StaticSynthesizer {
    pub fn new(audio: impl Into<Vec<u8>>, sample_rate: u32) -> Self {
        Self {
            audio: audio.into(),
            sample_rate,
        }
    }
}

#[async_trait]
impl TextToSpeech for StaticSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<(Vec<u8>, u32)> {
        ensure_speakable(text)?;
        Ok((self.audio.clone(), self.sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_static_transcriber() {
        let stt = StaticTranscriber::new("hello");
        assert_eq!(stt.transcribe(b"any", None).await.unwrap(), "hello");
        assert_eq!(stt.transcribe(b"any", Some(8000)).await.unwrap(), "hello");
        assert!(matches!(
            stt.transcribe(b"", None).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_static_synthesizer() {
        let tts = StaticSynthesizer::new(b"abc".to_vec(), 22050);
        let (audio, rate) = tts.synthesize("hi").await.unwrap();
        assert_eq!(audio, b"abc");
        assert_eq!(rate, 22050);
    }

    #[tokio::test]
    async fn test_static_synthesizer_rejects_blank_text() {
        let tts = StaticSynthesizer::new(b"abc".to_vec(), 22050);
        assert!(matches!(
            tts.synthesize("   ").await,
            Err(Error::InvalidInput(_))
        ));
    }
}

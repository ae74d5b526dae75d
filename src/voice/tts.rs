//! Text-to-speech (TTS) over an OpenAI-compatible speech API

use async_trait::async_trait;

use super::{DEFAULT_API_BASE_URL, TextToSpeech, ensure_speakable, wav_sample_rate};
use crate::{Error, Result};

/// Slowest speech speed the API accepts
pub const MIN_SPEED: f32 = 0.25;

/// Fastest speech speed the API accepts
pub const MAX_SPEED: f32 = 4.0;

/// Check that a speech speed multiplier is within the accepted range
///
/// # Errors
///
/// Returns `Config` error for out-of-range or NaN values
pub fn validate_speed(speed: f32) -> Result<()> {
    if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "tts speed must be between {MIN_SPEED} and {MAX_SPEED}, got {speed}"
        )))
    }
}

/// Synthesizes speech as WAV audio
pub struct OpenAiSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    model: String,
    base_url: String,
}

impl OpenAiSpeech {
    /// Create a new TTS instance with the default `tts-1` model
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if the API key is missing
    pub fn new(api_key: String, voice: String, speed: f32) -> Result<Self> {
        Self::with_model(api_key, voice, speed, "tts-1".to_string())
    }

    /// Create a new TTS instance with a custom model
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if the API key is missing, or `Config` if
    /// `speed` is out of range
    pub fn with_model(api_key: String, voice: String, speed: f32, model: String) -> Result<Self> {
        validate_speed(speed)?;
        if api_key.trim().is_empty() {
            return Err(Error::ModelUnavailable(
                "OpenAI API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            speed,
            model,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        })
    }

    /// Point at a different OpenAI-compatible server
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Voice identifier
    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }

    fn endpoint(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }
}

#[async_trait]
impl TextToSpeech for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<(Vec<u8>, u32)> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
            response_format: &'a str,
        }

        ensure_speakable(text)?;

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
            response_format: "wav",
        };

        tracing::debug!(chars = text.chars().count(), voice = %self.voice, "starting synthesis");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?.to_vec();
        let sample_rate = wav_sample_rate(&audio)
            .map_err(|e| Error::Tts(format!("unexpected TTS response: {e}")))?;

        tracing::info!(audio_bytes = audio.len(), sample_rate, "synthesis complete");
        Ok((audio, sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_model_unavailable() {
        let err = OpenAiSpeech::new("  ".to_string(), "alloy".to_string(), 1.0)
            .err()
            .unwrap();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    #[test]
    fn test_speed_out_of_range_is_config_error() {
        for speed in [0.1, 10.0, f32::NAN] {
            let err = OpenAiSpeech::new("key".to_string(), "alloy".to_string(), speed)
                .err()
                .unwrap();
            assert!(matches!(err, Error::Config(_)));
        }
        assert!(OpenAiSpeech::new("key".to_string(), "alloy".to_string(), MIN_SPEED).is_ok());
        assert!(OpenAiSpeech::new("key".to_string(), "alloy".to_string(), MAX_SPEED).is_ok());
    }

    #[test]
    fn test_endpoint_uses_base_url() {
        let tts = OpenAiSpeech::new("key".to_string(), "alloy".to_string(), 1.0)
            .unwrap()
            .with_base_url("http://localhost:8880/v1");
        assert_eq!(tts.endpoint(), "http://localhost:8880/v1/audio/speech");
        assert_eq!(tts.voice(), "alloy");
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_request() {
        let tts = OpenAiSpeech::new("key".to_string(), "alloy".to_string(), 1.0).unwrap();
        let err = tts.synthesize("\n").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

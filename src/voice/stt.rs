//! Speech-to-text (STT) over an OpenAI-compatible transcription API

use async_trait::async_trait;

use super::{DEFAULT_API_BASE_URL, SpeechToText, ensure_audio};
use crate::{Error, Result};

/// Response from the transcription endpoint
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes speech with a hosted Whisper model
pub struct WhisperApi {
    client: reqwest::Client,
    api_key: String,
    model: String,
    language: Option<String>,
    base_url: String,
}

impl WhisperApi {
    /// Create a new Whisper transcriber
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` if the API key is missing
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::ModelUnavailable(
                "OpenAI API key required for Whisper".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            language: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
        })
    }

    /// Force the transcription language (ISO-639-1, e.g. "en")
    #[must_use]
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.is_empty());
        self
    }

    /// Point at a different OpenAI-compatible server
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }
}

/// Guess an upload file name and MIME type from the audio magic bytes
///
/// The transcription API picks its decoder from the file extension.
fn container_format(audio: &[u8]) -> (&'static str, &'static str) {
    match audio {
        [b'R', b'I', b'F', b'F', ..] => ("audio.wav", "audio/wav"),
        [b'O', b'g', b'g', b'S', ..] => ("audio.ogg", "audio/ogg"),
        [b'f', b'L', b'a', b'C', ..] => ("audio.flac", "audio/flac"),
        [b'I', b'D', b'3', ..] | [0xFF, 0xE0..=0xFF, ..] => ("audio.mp3", "audio/mpeg"),
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => ("audio.m4a", "audio/mp4"),
        [0x1A, 0x45, 0xDF, 0xA3, ..] => ("audio.webm", "audio/webm"),
        _ => ("audio.wav", "audio/wav"),
    }
}

#[async_trait]
impl SpeechToText for WhisperApi {
    async fn transcribe(&self, audio: &[u8], sample_rate: Option<u32>) -> Result<String> {
        ensure_audio(audio)?;
        tracing::debug!(
            audio_bytes = audio.len(),
            sample_rate = ?sample_rate,
            model = %self.model,
            "starting Whisper transcription"
        );

        let (file_name, mime) = container_format(audio);
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| Error::Stt(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        if let Some(ref language) = self.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            e
        })?;

        let transcript = result.text.trim().to_string();
        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_model_unavailable() {
        let err = WhisperApi::new(String::new(), "whisper-1".to_string())
            .err()
            .unwrap();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    #[test]
    fn test_builder_options() {
        let stt = WhisperApi::new("key".to_string(), "whisper-1".to_string())
            .unwrap()
            .with_language(Some(String::new()))
            .with_base_url("http://localhost:9000/v1/");

        assert_eq!(stt.model(), "whisper-1");
        assert!(stt.language.is_none());
        assert_eq!(stt.endpoint(), "http://localhost:9000/v1/audio/transcriptions");
    }

    #[test]
    fn test_container_format_sniffing() {
        assert_eq!(container_format(b"RIFF\0\0\0\0WAVE").0, "audio.wav");
        assert_eq!(container_format(b"ID3\x04").0, "audio.mp3");
        assert_eq!(container_format(b"\0\0\0\x20ftypM4A ").0, "audio.m4a");
        assert_eq!(container_format(b"OggS").1, "audio/ogg");
        // Unknown bytes fall back to WAV
        assert_eq!(container_format(b"xyz").0, "audio.wav");
    }

    #[tokio::test]
    async fn test_empty_audio_rejected_before_request() {
        let stt = WhisperApi::new("key".to_string(), "whisper-1".to_string()).unwrap();
        let err = stt.transcribe(b"", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

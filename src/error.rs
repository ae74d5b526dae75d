//! Error types for the voice agent

use thiserror::Error;

/// Result type alias for voice agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, answering, or speaking
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (bad settings, malformed knowledge base)
    #[error("configuration error: {0}")]
    Config(String),

    /// File or resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// An optional capability was not compiled into this build
    #[error("missing capability: {0}")]
    MissingCapability(String),

    /// A speech backend could not be initialized
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Caller supplied unusable input (empty text, empty audio)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio encoding/decoding error
    #[error("audio error: {0}")]
    Audio(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error
    #[cfg(feature = "yaml")]
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether the error was caused by the caller rather than the service
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }

    /// Whether the error means a backend or optional feature is absent
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::ModelUnavailable(_) | Self::MissingCapability(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("data/kb.json".to_string());
        assert_eq!(err.to_string(), "not found: data/kb.json");

        let err = Error::MissingCapability("yaml".to_string());
        assert_eq!(err.to_string(), "missing capability: yaml");

        let err = Error::InvalidInput("empty text".to_string());
        assert_eq!(err.to_string(), "invalid input: empty text");

        let err = Error::ModelUnavailable("no api key".to_string());
        assert_eq!(err.to_string(), "model unavailable: no api key");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::InvalidInput(String::new()).is_client_error());
        assert!(!Error::Tts(String::new()).is_client_error());
        assert!(Error::ModelUnavailable(String::new()).is_unavailable());
        assert!(Error::MissingCapability(String::new()).is_unavailable());
        assert!(!Error::Config(String::new()).is_unavailable());
    }
}

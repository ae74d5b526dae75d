//! Configuration management for the voice agent
//!
//! Precedence is env > TOML file > default.

pub mod file;

use std::path::{Path, PathBuf};

use crate::agent::{DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_SYSTEM_PROMPT, validate_threshold};
use crate::voice::{DEFAULT_API_BASE_URL, validate_speed};
use crate::{Error, Result};

use file::VoiceAgentConfigFile;

/// Default knowledge base location, relative to the working directory
pub const DEFAULT_KNOWLEDGE_BASE: &str = "data/knowledge_base.json";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Voice agent configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the FAQ knowledge base
    pub knowledge_base: PathBuf,

    /// Agent configuration
    pub agent: AgentConfig,

    /// Speech configuration
    pub voice: VoiceConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Minimum FAQ similarity (0.0 to 1.0)
    pub similarity_threshold: f64,

    /// System prompt seeded into every conversation
    pub system_prompt: String,
}

/// Speech processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// Force transcription language
    pub stt_language: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,

    /// OpenAI-compatible base URL for STT
    pub stt_base_url: String,

    /// OpenAI-compatible base URL for TTS
    pub tts_base_url: String,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

/// API keys for external services
#[derive(Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper and TTS)
    pub openai: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &self.openai.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment and config file
    ///
    /// With `config_path` the file must exist and parse; without it the
    /// standard location is used when present.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit config file is unusable or a value is out
    /// of range
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = match config_path {
            Some(path) => file::load_explicit(path)?,
            None => file::load_config_file(),
        };
        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment lookups
    ///
    /// # Errors
    ///
    /// Returns `Config` error if a value is out of range or unparseable
    pub fn resolve<F>(fc: VoiceAgentConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let knowledge_base = env("VOICE_AGENT_KNOWLEDGE_BASE")
            .map(PathBuf::from)
            .or(fc.knowledge_base)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_BASE));

        let similarity_threshold = match env("VOICE_AGENT_SIMILARITY_THRESHOLD") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|e| {
                Error::Config(format!("invalid VOICE_AGENT_SIMILARITY_THRESHOLD {raw:?}: {e}"))
            })?,
            None => fc
                .agent
                .similarity_threshold
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
        };
        validate_threshold(similarity_threshold)?;

        let agent = AgentConfig {
            similarity_threshold,
            system_prompt: fc
                .agent
                .system_prompt
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        };

        // Shared base URL override (env > per-section toml > default)
        let env_base_url = env("OPENAI_BASE_URL");

        let voice = VoiceConfig {
            stt_model: env("VOICE_AGENT_STT_MODEL")
                .or(fc.stt.model)
                .unwrap_or_else(|| "whisper-1".to_string()),
            stt_language: env("VOICE_AGENT_STT_LANGUAGE").or(fc.stt.language),
            tts_model: env("VOICE_AGENT_TTS_MODEL")
                .or(fc.tts.model)
                .unwrap_or_else(|| "tts-1".to_string()),
            tts_voice: env("VOICE_AGENT_TTS_VOICE")
                .or(fc.tts.voice)
                .unwrap_or_else(|| "alloy".to_string()),
            tts_speed: fc.tts.speed.unwrap_or(1.0),
            stt_base_url: env_base_url
                .clone()
                .or(fc.stt.base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            tts_base_url: env_base_url
                .or(fc.tts.base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        };
        validate_speed(voice.tts_speed)?;

        let port = match env("VOICE_AGENT_PORT").or_else(|| env("PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("invalid port {raw:?}: {e}")))?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };
        let server = ServerConfig { port };

        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY")
                .or(fc.api_keys.openai)
                .filter(|k| !k.trim().is_empty()),
        };

        Ok(Self {
            knowledge_base,
            agent,
            voice,
            server,
            api_keys,
        })
    }

    /// `OpenAI` API key, or `ModelUnavailable` if none is configured
    ///
    /// # Errors
    ///
    /// Returns `ModelUnavailable` when no key was provided
    pub fn require_openai_key(&self) -> Result<String> {
        self.api_keys.openai.clone().ok_or_else(|| {
            Error::ModelUnavailable(
                "OPENAI_API_KEY is not set (env or [api_keys] in config file)".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(VoiceAgentConfigFile::default(), env_from(&[])).unwrap();

        assert_eq!(config.knowledge_base, PathBuf::from(DEFAULT_KNOWLEDGE_BASE));
        assert!((config.agent.similarity_threshold - 0.55).abs() < f64::EPSILON);
        assert_eq!(config.agent.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.voice.stt_model, "whisper-1");
        assert_eq!(config.voice.tts_model, "tts-1");
        assert_eq!(config.voice.tts_voice, "alloy");
        assert_eq!(config.voice.stt_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.api_keys.openai.is_none());
        assert!(matches!(
            config.require_openai_key(),
            Err(Error::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let fc = file::parse_config_file(
            "knowledge_base = \"file.json\"\n[server]\nport = 9000\n[tts]\nvoice = \"nova\"\n",
        )
        .unwrap();
        let env = env_from(&[
            ("VOICE_AGENT_KNOWLEDGE_BASE", "env.json"),
            ("PORT", "7000"),
            ("OPENAI_API_KEY", "sk-env"),
        ]);

        let config = Config::resolve(fc, env).unwrap();
        assert_eq!(config.knowledge_base, PathBuf::from("env.json"));
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.voice.tts_voice, "nova");
        assert_eq!(config.require_openai_key().unwrap(), "sk-env");
    }

    #[test]
    fn test_base_url_override_applies_to_both() {
        let env = env_from(&[("OPENAI_BASE_URL", "http://localhost:8080/v1")]);
        let config = Config::resolve(VoiceAgentConfigFile::default(), env).unwrap();
        assert_eq!(config.voice.stt_base_url, "http://localhost:8080/v1");
        assert_eq!(config.voice.tts_base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_threshold_validation() {
        let env = env_from(&[("VOICE_AGENT_SIMILARITY_THRESHOLD", "1.5")]);
        let err = Config::resolve(VoiceAgentConfigFile::default(), env).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let env = env_from(&[("VOICE_AGENT_SIMILARITY_THRESHOLD", "high")]);
        assert!(Config::resolve(VoiceAgentConfigFile::default(), env).is_err());

        let env = env_from(&[("VOICE_AGENT_SIMILARITY_THRESHOLD", "0.8")]);
        let config = Config::resolve(VoiceAgentConfigFile::default(), env).unwrap();
        assert!((config.agent.similarity_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_speed_validation() {
        let fc = file::parse_config_file("[tts]\nspeed = 10.0\n").unwrap();
        let err = Config::resolve(fc, env_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unparseable_port_is_rejected() {
        let env = env_from(&[("PORT", "eighty")]);
        let err = Config::resolve(VoiceAgentConfigFile::default(), env).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let env = env_from(&[("VOICE_AGENT_PORT", "70000")]);
        assert!(Config::resolve(VoiceAgentConfigFile::default(), env).is_err());

        let env = env_from(&[("VOICE_AGENT_PORT", " 8081 ")]);
        let config = Config::resolve(VoiceAgentConfigFile::default(), env).unwrap();
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_blank_api_key_treated_as_missing() {
        let env = env_from(&[("OPENAI_API_KEY", "  ")]);
        let config = Config::resolve(VoiceAgentConfigFile::default(), env).unwrap();
        assert!(config.api_keys.openai.is_none());
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let keys = ApiKeys {
            openai: Some("sk-secret".to_string()),
        };
        let debug = format!("{keys:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("redacted"));
    }
}

//! TOML configuration file loading
//!
//! Supports `~/.config/voice-agent/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceAgentConfigFile {
    /// Path to the FAQ knowledge base
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,

    /// Agent behaviour
    #[serde(default)]
    pub agent: AgentFileConfig,

    /// Speech-to-text settings
    #[serde(default)]
    pub stt: SttFileConfig,

    /// Text-to-speech settings
    #[serde(default)]
    pub tts: TtsFileConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Agent configuration
#[derive(Debug, Default, Deserialize)]
pub struct AgentFileConfig {
    /// Minimum FAQ similarity (0.0 to 1.0)
    pub similarity_threshold: Option<f64>,

    /// System prompt seeded into the history
    pub system_prompt: Option<String>,
}

/// Speech-to-text configuration
#[derive(Debug, Default, Deserialize)]
pub struct SttFileConfig {
    /// Model (e.g. "whisper-1")
    pub model: Option<String>,

    /// Force transcription language (e.g. "en")
    pub language: Option<String>,

    /// OpenAI-compatible base URL
    pub base_url: Option<String>,
}

/// Text-to-speech configuration
#[derive(Debug, Default, Deserialize)]
pub struct TtsFileConfig {
    /// Model (e.g. "tts-1")
    pub model: Option<String>,

    /// Voice identifier (e.g. "alloy")
    pub voice: Option<String>,

    /// Speed multiplier
    pub speed: Option<f32>,

    /// OpenAI-compatible base URL
    pub base_url: Option<String>,
}

/// Server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// HTTP port
    pub port: Option<u16>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
}

/// Parse a config file from TOML text
///
/// # Errors
///
/// Returns `Toml` error if the text is not a valid config file
pub fn parse_config_file(content: &str) -> Result<VoiceAgentConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load a config file the user pointed at explicitly
///
/// # Errors
///
/// Returns `NotFound` if the file is missing, or a parse error
pub fn load_explicit(path: &Path) -> Result<VoiceAgentConfigFile> {
    if !path.exists() {
        return Err(crate::Error::NotFound(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let config = parse_config_file(&content)?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Load the TOML config file from the standard path
///
/// Returns `VoiceAgentConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> VoiceAgentConfigFile {
    let Some(path) = config_file_path() else {
        return VoiceAgentConfigFile::default();
    };

    if !path.exists() {
        return VoiceAgentConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VoiceAgentConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VoiceAgentConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voice-agent/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voice-agent").join("config.toml"))
}

//! FAQ knowledge base loading
//!
//! The knowledge base is a small document with two top-level keys:
//!
//! ```json
//! {
//!   "faqs": [{ "question": "What is MAS.665?", "answer": "MAS.665 is a course." }],
//!   "tips": ["Ask early."]
//! }
//! ```
//!
//! JSON is always supported. YAML (`.yaml` / `.yml`) requires the `yaml` feature.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single question/answer pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// In-memory FAQ knowledge base
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct KnowledgeBase {
    /// FAQ entries in document order
    #[serde(default)]
    pub faqs: Vec<FaqEntry>,

    /// Free-form tips in document order
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Document formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

impl KnowledgeBase {
    /// Load a knowledge base from disk
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist, `MissingCapability` if the
    /// file is YAML and YAML support was not compiled in, and `Config` if the
    /// document cannot be parsed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "knowledge base file not found: {}",
                path.display()
            )));
        }

        let format = Format::from_path(path);
        if format == Format::Yaml && !cfg!(feature = "yaml") {
            return Err(Error::MissingCapability(format!(
                "loading YAML knowledge base {} requires the `yaml` feature",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let parsed = match format {
            Format::Json => Self::from_json_str(&content),
            Format::Yaml => Self::parse_yaml(&content),
        };

        let kb = parsed.map_err(|e| {
            Error::Config(format!("invalid knowledge base {}: {e}", path.display()))
        })?;

        tracing::debug!(
            path = %path.display(),
            faqs = kb.faqs.len(),
            tips = kb.tips.len(),
            "loaded knowledge base"
        );

        Ok(kb)
    }

    /// Parse a knowledge base from JSON text
    ///
    /// # Errors
    ///
    /// Returns error if the JSON does not match the knowledge base schema
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a knowledge base from YAML text
    ///
    /// # Errors
    ///
    /// Returns error if the YAML does not match the knowledge base schema
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty YAML document deserializes to null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    #[cfg(feature = "yaml")]
    fn parse_yaml(content: &str) -> Result<Self> {
        Self::from_yaml_str(content)
    }

    #[cfg(not(feature = "yaml"))]
    fn parse_yaml(_content: &str) -> Result<Self> {
        Err(Error::MissingCapability(
            "YAML support requires the `yaml` feature".to_string(),
        ))
    }

    /// FAQ question texts in document order
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.faqs.iter().map(|faq| faq.question.as_str())
    }

    /// The first tip, if any
    #[must_use]
    pub fn first_tip(&self) -> Option<&str> {
        self.tips.first().map(String::as_str)
    }

    /// Whether the knowledge base has neither FAQs nor tips
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faqs.is_empty() && self.tips.is_empty()
    }
}

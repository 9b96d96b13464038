//! # Configuration Management
//!
//! Settings live in a TOML document whose top-level tables act as sections:
//!
//! ```toml
//! [general]
//! output_dir = "output"
//!
//! [aligner]
//! alignment_method = "lexical"
//! confidence_threshold = 0.7
//! ```
//!
//! [`Config`] exposes raw `section`/`key` lookups with fallbacks. [`Settings`]
//! is the typed view handed to each component constructor; nothing reads the
//! configuration through global state.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::{Error, Result};

/// Location used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/ontology_agent.toml";

/// Raw section/key configuration loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: PathBuf,
    sections: toml::Table,
}

impl Config {
    /// Reads and parses the configuration resource.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] when the file does not exist and
    /// [`Error::ConfigParse`] when it is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|err| Error::io_failure(path, err))?;
        let config = Self::from_toml_str(&content).map_err(|err| match err {
            Error::ConfigParse { message, .. } => Error::ConfigParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(path = %path.display(), sections = config.sections.len(), "configuration loaded");
        Ok(Self {
            path: path.to_path_buf(),
            ..config
        })
    }

    /// Parses configuration text without touching the filesystem.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParse`] when the text is not valid TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let sections = content
            .parse::<toml::Table>()
            .map_err(|err| Error::ConfigParse {
                path: PathBuf::new(),
                message: err.to_string(),
            })?;
        Ok(Self {
            path: PathBuf::new(),
            sections,
        })
    }

    /// Path the configuration was loaded from, empty for in-memory configs.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn value(&self, section: &str, key: &str) -> Option<&toml::Value> {
        self.sections
            .get(section)
            .and_then(toml::Value::as_table)
            .and_then(|table| table.get(key))
    }

    /// Returns the value rendered as text, or `fallback` when absent.
    #[must_use]
    pub fn get(&self, section: &str, key: &str, fallback: Option<&str>) -> Option<String> {
        match self.value(section, key) {
            Some(value) => Some(render(value)),
            None => fallback.map(str::to_string),
        }
    }

    /// Integer lookup.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigValue`] when the key is present but not an integer.
    pub fn get_int(&self, section: &str, key: &str, fallback: Option<i64>) -> Result<Option<i64>> {
        let Some(value) = self.value(section, key) else {
            return Ok(fallback);
        };
        match value {
            toml::Value::Integer(number) => Ok(Some(*number)),
            toml::Value::String(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(section, key, "expected an integer")),
            _ => Err(invalid(section, key, "expected an integer")),
        }
    }

    /// Floating point lookup; integers are widened.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigValue`] when the key is present but not numeric.
    pub fn get_float(
        &self,
        section: &str,
        key: &str,
        fallback: Option<f64>,
    ) -> Result<Option<f64>> {
        let Some(value) = self.value(section, key) else {
            return Ok(fallback);
        };
        match value {
            toml::Value::Float(number) => Ok(Some(*number)),
            #[allow(clippy::cast_precision_loss)]
            toml::Value::Integer(number) => Ok(Some(*number as f64)),
            toml::Value::String(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(section, key, "expected a number")),
            _ => Err(invalid(section, key, "expected a number")),
        }
    }

    /// Boolean lookup accepting `true/false`, `yes/no`, `on/off` and `1/0`
    /// when the value is written as a string.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigValue`] when the key is present but not a boolean.
    pub fn get_bool(
        &self,
        section: &str,
        key: &str,
        fallback: Option<bool>,
    ) -> Result<Option<bool>> {
        let Some(value) = self.value(section, key) else {
            return Ok(fallback);
        };
        match value {
            toml::Value::Boolean(flag) => Ok(Some(*flag)),
            toml::Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Some(true)),
                "false" | "no" | "off" | "0" => Ok(Some(false)),
                _ => Err(invalid(section, key, "expected a boolean")),
            },
            _ => Err(invalid(section, key, "expected a boolean")),
        }
    }

    /// Deserializes one section. A missing section yields `T::default()`.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParse`] when the section does not match `T`.
    pub fn deserialize_section<T>(&self, section: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.sections.get(section) else {
            return Ok(T::default());
        };
        value
            .clone()
            .try_into()
            .map_err(|err: toml::de::Error| Error::ConfigParse {
                path: self.path.clone(),
                message: format!("section `[{section}]`: {err}"),
            })
    }

    /// Returns every key of a section rendered as text. Missing sections
    /// yield an empty map.
    #[must_use]
    pub fn section(&self, section: &str) -> BTreeMap<String, String> {
        self.sections
            .get(section)
            .and_then(toml::Value::as_table)
            .map(|table| {
                table
                    .iter()
                    .map(|(key, value)| (key.clone(), render(value)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn render(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn invalid(section: &str, key: &str, message: &str) -> Error {
    Error::ConfigValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Typed application settings derived from a [`Config`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub general: GeneralSettings,
    pub creator: CreatorSettings,
    pub processor: ProcessorSettings,
    pub aligner: AlignerSettings,
    pub matcher: MatcherSettings,
    pub logger: LoggerSettings,
    pub ai: AiSettings,
}

impl Settings {
    /// Builds the typed view. Each section deserializes on its own and absent
    /// sections or keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParse`] when a section holds a value of the wrong type
    /// or an unknown enumeration variant.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut ai: AiSettings = config.deserialize_section("ai")?;
        if ai.api_key.is_none() {
            ai.api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        Ok(Self {
            general: config.deserialize_section("general")?,
            creator: config.deserialize_section("creator")?,
            processor: config.deserialize_section("processor")?,
            aligner: config.deserialize_section("aligner")?,
            matcher: config.deserialize_section("matcher")?,
            logger: config.deserialize_section("logging")?,
            ai,
        })
    }
}

/// `[general]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub root_dir: PathBuf,
    /// Directory receiving artifacts when no explicit `--output` is given.
    pub output_dir: PathBuf,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("datasets"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// `[creator]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreatorSettings {
    /// Overrides the built-in definition schema.
    pub schema_path: Option<PathBuf>,
    /// Reload the persisted artifact and compare it with the built ontology.
    pub verify_roundtrip: bool,
}

impl Default for CreatorSettings {
    fn default() -> Self {
        Self {
            schema_path: None,
            verify_roundtrip: true,
        }
    }
}

/// `[processor]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    /// When disabled, ancestor queries return declared parents only.
    pub reasoning_enabled: bool,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            reasoning_enabled: true,
        }
    }
}

/// Backends able to produce cross-ontology correspondences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMethod {
    Embedding,
    Lexical,
}

/// `[aligner]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlignerSettings {
    pub alignment_method: AlignmentMethod,
    pub confidence_threshold: f64,
}

impl Default for AlignerSettings {
    fn default() -> Self {
        Self {
            alignment_method: AlignmentMethod::Embedding,
            confidence_threshold: 0.7,
        }
    }
}

/// Candidate generation backends used by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieverBackend {
    Embedding,
    Lexical,
}

/// Candidate confirmation backends used by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeBackend {
    Llm,
    Lexical,
}

/// `[matcher]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatcherSettings {
    /// Label recorded with results; the judge model itself comes from `[ai]`.
    pub matcher_model: String,
    pub llm_confidence_threshold: f64,
    pub ir_score_threshold: f64,
    /// Number of candidates retrieved per source entity.
    pub top_k: usize,
    /// Reference alignment used for evaluation.
    pub reference_path: Option<PathBuf>,
    pub retriever: RetrieverBackend,
    pub judge: JudgeBackend,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            matcher_model: "MistralLLMBertRAG".to_string(),
            llm_confidence_threshold: 0.7,
            ir_score_threshold: 0.9,
            top_k: 5,
            reference_path: None,
            retriever: RetrieverBackend::Embedding,
            judge: JudgeBackend::Llm,
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Compact,
    Pretty,
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Any `tracing` filter directive, e.g. `info` or `ontology_agent=debug`.
    pub level: String,
    pub format: Format,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
        }
    }
}

/// `[ai]` section shared by the remote embedding and chat backends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: String,
    pub embedding_model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: Some(0.0),
            max_tokens: Some(16),
            system_prompt: None,
        }
    }
}

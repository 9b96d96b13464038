//! # Application Error Handling

use std::path::PathBuf;

use crate::{
    ai::{AiError, AiInitError},
    ontology::{BuildError, IriError, OntologyError, ReasonerError},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("cannot parse configuration `{}`: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid value for `{section}.{key}`: {message}")]
    ConfigValue {
        section: String,
        key: String,
        message: String,
    },

    #[error("schema violation at `{path}`: {constraint}")]
    SchemaViolation {
        path: String,
        constraint: String,
        /// Every violation reported by the validator, first one included.
        messages: Vec<String>,
    },

    #[error("invalid ontology schema: {0}")]
    InvalidSchema(String),

    #[error("malformed ontology definition: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("entity `{name}` not found in ontology `{ontology}`")]
    EntityNotFound { ontology: String, name: String },

    #[error(transparent)]
    Reasoner(#[from] ReasonerError),

    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Iri(#[from] IriError),

    #[error("I/O failure on `{}`: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("RDF/XML error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    AiInit(#[from] AiInitError),

    #[error("{0}")]
    Message(String),
}

impl Error {
    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Message(s.to_string())
    }

    pub(crate) fn io_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}

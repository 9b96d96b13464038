//! Command-line orchestration over OWL ontologies.
//!
//! The crate builds ontologies from JSON definition documents, answers
//! queries over persisted ontologies, aligns pairs of ontologies and matches
//! their entities through a retrieval-and-LLM pipeline. Reasoning, embedding
//! and language-model engines sit behind traits so that alternative backends
//! can be plugged in without touching the orchestration code.

pub mod ai;
pub mod align;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
mod errors;
pub mod logger;
pub mod matching;
pub mod ontology;

pub use errors::Error;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Core ontology domain primitives and contracts.
//!
//! The module defines the ontology aggregate and its value objects, the
//! definition document that drives ontology creation, RDF/XML persistence and
//! the reasoning and query facades layered on top of them.

pub mod builder;
pub mod definition;
pub mod entities;
pub mod query;
pub mod rdfxml;
pub mod reasoner;
pub mod repositories;
pub mod schema;
pub mod service;
pub mod value_objects;
pub mod vocab;

pub use builder::{build, BuildError, BuildOutcome, BuildReport, Enrichment, Skipped};
pub use definition::OntologyDefinition;
pub use entities::{
    Characteristic, Class, Datatype, Individual, Ontology, OntologyError, Property,
    PropertyAssertion, PropertyKind,
};
pub use query::{DomainsAndRanges, OntologyQuery};
pub use reasoner::{Inferences, Reasoner, ReasonerError, ReasonerHandle, StructuralReasoner};
pub use repositories::{OntologyMetrics, OntologyRepository, RdfXmlRepository, RepositoryHandle};
pub use service::{Created, OntologyService};
pub use value_objects::{Iri, IriError};

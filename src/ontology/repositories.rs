use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{
    entities::{Ontology, PropertyKind},
    rdfxml,
    value_objects::Iri,
};
use crate::Error;

/// Type alias simplifying repository trait object usage inside the services.
pub type RepositoryHandle = dyn OntologyRepository<Error = Error> + Send + Sync + 'static;

/// Size figures of an ontology, listed without loading anything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OntologyMetrics {
    /// Identifier of the ontology.
    pub iri: Iri,
    pub num_classes: usize,
    pub num_object_properties: usize,
    pub num_data_properties: usize,
    pub num_annotation_properties: usize,
    pub num_individuals: usize,
}

impl From<&Ontology> for OntologyMetrics {
    fn from(ontology: &Ontology) -> Self {
        Self {
            iri: ontology.id().clone(),
            num_classes: ontology.classes().len(),
            num_object_properties: ontology.properties_of_kind(PropertyKind::Object).count(),
            num_data_properties: ontology.properties_of_kind(PropertyKind::Data).count(),
            num_annotation_properties: ontology
                .properties_of_kind(PropertyKind::Annotation)
                .count(),
            num_individuals: ontology.individuals().len(),
        }
    }
}

impl OntologyMetrics {
    /// Metric names and values in report order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("num_classes", self.num_classes),
            ("num_object_properties", self.num_object_properties),
            ("num_data_properties", self.num_data_properties),
            ("num_annotation_properties", self.num_annotation_properties),
            ("num_individuals", self.num_individuals),
        ]
    }
}

impl fmt::Display for OntologyMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.entries() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Contract describing persistence responsibilities for ontology aggregates.
#[async_trait]
pub trait OntologyRepository {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Persists the ontology at `destination`.
    ///
    /// Implementors must never leave a partially written artifact behind.
    async fn save(&self, ontology: &Ontology, destination: &Path) -> Result<(), Self::Error>;

    /// Loads the ontology stored at `source`.
    async fn load(&self, source: &Path) -> Result<Ontology, Self::Error>;
}

/// Repository storing ontologies as RDF/XML files.
#[derive(Clone, Debug, Default)]
pub struct RdfXmlRepository;

impl RdfXmlRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn staging_path(destination: &Path) -> PathBuf {
        let name = destination
            .file_name()
            .map_or_else(|| "ontology".into(), |name| name.to_string_lossy());
        destination.with_file_name(format!(".{name}.partial"))
    }

    async fn write_staged(contents: &[u8], staging: &Path) -> crate::Result<()> {
        tokio::fs::write(staging, contents)
            .await
            .map_err(|source| Error::io_failure(staging, source))
    }
}

#[async_trait]
impl OntologyRepository for RdfXmlRepository {
    type Error = Error;

    async fn save(&self, ontology: &Ontology, destination: &Path) -> Result<(), Self::Error> {
        let contents = rdfxml::write(ontology, Vec::new())?;
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::io_failure(parent, source))?;
        }

        let staging = Self::staging_path(destination);
        if let Err(err) = Self::write_staged(&contents, &staging).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err);
        }
        if let Err(source) = tokio::fs::rename(&staging, destination).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(Error::io_failure(destination, source));
        }

        tracing::debug!(ontology = %ontology.id(), path = %destination.display(), "ontology written");
        Ok(())
    }

    async fn load(&self, source: &Path) -> Result<Ontology, Self::Error> {
        let contents = tokio::fs::read(source)
            .await
            .map_err(|err| Error::io_failure(source, err))?;
        let ontology = rdfxml::read(contents.as_slice())?;
        tracing::debug!(
            ontology = %ontology.id(),
            path = %source.display(),
            classes = ontology.classes().len(),
            "ontology loaded"
        );
        Ok(ontology)
    }
}

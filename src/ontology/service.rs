use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::{
    config::{CreatorSettings, ProcessorSettings},
    ontology::{
        builder::{self, BuildReport},
        definition::OntologyDefinition,
        entities::Ontology,
        query::OntologyQuery,
        reasoner::{Inferences, ReasonerHandle, StructuralReasoner},
        repositories::{RdfXmlRepository, RepositoryHandle},
        schema,
        value_objects::Iri,
    },
    Error, Result,
};

/// Result of [`OntologyService::create`].
#[derive(Clone, Debug)]
pub struct Created {
    pub ontology: Ontology,
    pub report: BuildReport,
    pub inferences: Inferences,
}

/// High level ontology service wiring repository and reasoner adapters together.
#[derive(Clone)]
pub struct OntologyService {
    repository: Arc<RepositoryHandle>,
    reasoner: Arc<ReasonerHandle>,
    creator: CreatorSettings,
    processor: ProcessorSettings,
}

impl OntologyService {
    /// Creates a new [`OntologyService`] from trait object handles.
    pub fn new(
        repository: Arc<RepositoryHandle>,
        reasoner: Arc<ReasonerHandle>,
        creator: CreatorSettings,
        processor: ProcessorSettings,
    ) -> Self {
        Self {
            repository,
            reasoner,
            creator,
            processor,
        }
    }

    /// Builds a service using the RDF/XML repository and the structural
    /// reasoner.
    #[must_use]
    pub fn from_settings(creator: &CreatorSettings, processor: &ProcessorSettings) -> Self {
        Self::new(
            Arc::new(RdfXmlRepository::new()),
            Arc::new(StructuralReasoner::new()),
            creator.clone(),
            processor.clone(),
        )
    }

    /// Returns a clone of the repository handle.
    pub fn repository(&self) -> Arc<RepositoryHandle> {
        Arc::clone(&self.repository)
    }

    /// Returns a clone of the reasoner handle.
    pub fn reasoner(&self) -> Arc<ReasonerHandle> {
        Arc::clone(&self.reasoner)
    }

    /// Reads, validates and builds the definition document at `definition`,
    /// then persists the ontology at `destination`.
    ///
    /// # Errors
    ///
    /// See [`OntologyService::create`].
    pub async fn create_from_path(&self, definition: &Path, destination: &Path) -> Result<Created> {
        let text = tokio::fs::read_to_string(definition)
            .await
            .map_err(|source| Error::io_failure(definition, source))?;
        self.create(&text, destination).await
    }

    /// Validates the definition text against the schema, builds the ontology,
    /// persists it at `destination` and synchronizes the reasoner.
    ///
    /// Validation and structural build failures leave no artifact behind.
    ///
    /// # Errors
    ///
    /// Fails on malformed or invalid documents, structural build errors,
    /// persistence errors, inconsistent results and, when enabled, a failed
    /// round trip check.
    pub async fn create(&self, definition: &str, destination: &Path) -> Result<Created> {
        let document = OntologyDefinition::parse_value(definition)?;
        let schema = schema::load(self.creator.schema_path.as_deref())?;
        schema::validate(&document, &schema)?;

        let definition = OntologyDefinition::from_json_str(definition)?;
        let builder::BuildOutcome { ontology, report } = builder::build(&definition)?;

        self.repository.save(&ontology, destination).await?;
        let inferences = self.reasoner.synchronize(&ontology).await?;

        if self.creator.verify_roundtrip {
            self.verify(&ontology, destination).await?;
        }

        tracing::info!(
            ontology = %ontology.id(),
            path = %destination.display(),
            skipped = report.skipped().len(),
            "Ontology created and saved successfully"
        );
        Ok(Created {
            ontology,
            report,
            inferences,
        })
    }

    async fn verify(&self, ontology: &Ontology, destination: &Path) -> Result<()> {
        let reloaded = self.repository.load(destination).await?;
        let expected: BTreeSet<&Iri> = ontology.classes().keys().collect();
        let found: BTreeSet<&Iri> = reloaded.classes().keys().collect();
        if expected != found {
            return Err(Error::Serialization(format!(
                "`{}` reloads with {} classes instead of {}",
                destination.display(),
                found.len(),
                expected.len()
            )));
        }
        Ok(())
    }

    /// Loads a persisted ontology and wraps it in a query facade.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub async fn open(&self, source: &Path) -> Result<OntologyQuery> {
        let ontology = self.repository.load(source).await?;
        Ok(OntologyQuery::new(
            ontology,
            self.reasoner(),
            self.processor.reasoning_enabled,
        ))
    }
}

//! Ontology alignment: proposes equivalent classes across two ontologies and
//! keeps the confident ones.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    ai::{self, EmbeddingModel},
    config::{AlignerSettings, AlignmentMethod, Settings},
    ontology::{Class, Ontology},
    Error, Result,
};

/// A proposed equivalence between a source and a target class.
#[derive(Clone, Debug, PartialEq)]
pub struct Correspondence {
    pub source: String,
    pub target: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Correspondence {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, confidence: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            confidence,
        }
    }
}

impl fmt::Display for Correspondence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}: {}", self.source, self.target, self.confidence)
    }
}

/// Contract implemented by alignment engines.
#[async_trait]
pub trait Aligner: Send + Sync {
    /// Proposes correspondences between the classes of both ontologies.
    async fn align(&self, source: &Ontology, target: &Ontology) -> Result<Vec<Correspondence>>;
}

/// Human readable text of a class: its label, or its local name split at
/// case changes and underscores.
#[must_use]
pub fn readable_name(class: &Class) -> String {
    if let Some(label) = class.label() {
        return label.to_string();
    }
    let mut words = String::new();
    let mut previous_lower = false;
    for ch in class.name().chars() {
        if ch == '_' || ch == '-' {
            words.push(' ');
            previous_lower = false;
            continue;
        }
        if ch.is_uppercase() && previous_lower {
            words.push(' ');
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        words.extend(ch.to_lowercase());
    }
    words
}

/// Keeps, for each source, the target with the highest score.
fn best_per_source(
    sources: &[&Class],
    targets: &[&Class],
    mut score: impl FnMut(usize, usize) -> f64,
) -> Vec<Correspondence> {
    let mut correspondences = Vec::new();
    for (i, source) in sources.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for j in 0..targets.len() {
            let value = score(i, j);
            if best.map_or(true, |(_, current)| value > current) {
                best = Some((j, value));
            }
        }
        if let Some((j, value)) = best {
            correspondences.push(Correspondence::new(source.name(), targets[j].name(), value));
        }
    }
    correspondences
}

/// Aligner comparing normalized edit distance of readable class names.
#[derive(Clone, Debug, Default)]
pub struct LexicalAligner;

#[async_trait]
impl Aligner for LexicalAligner {
    async fn align(&self, source: &Ontology, target: &Ontology) -> Result<Vec<Correspondence>> {
        let sources: Vec<&Class> = source.classes().values().collect();
        let targets: Vec<&Class> = target.classes().values().collect();
        let source_names: Vec<String> = sources.iter().map(|class| readable_name(class)).collect();
        let target_names: Vec<String> = targets.iter().map(|class| readable_name(class)).collect();
        Ok(best_per_source(&sources, &targets, |i, j| {
            strsim::normalized_levenshtein(&source_names[i], &target_names[j])
        }))
    }
}

/// Aligner comparing embeddings of readable class names by cosine similarity.
pub struct EmbeddingAligner {
    model: Arc<dyn EmbeddingModel>,
}

impl EmbeddingAligner {
    #[must_use]
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Aligner for EmbeddingAligner {
    async fn align(&self, source: &Ontology, target: &Ontology) -> Result<Vec<Correspondence>> {
        let sources: Vec<&Class> = source.classes().values().collect();
        let targets: Vec<&Class> = target.classes().values().collect();
        let source_vectors = ai::embed_each(
            self.model.as_ref(),
            sources.iter().map(|class| readable_name(class)).collect(),
        )
        .await?;
        let target_vectors = ai::embed_each(
            self.model.as_ref(),
            targets.iter().map(|class| readable_name(class)).collect(),
        )
        .await?;
        Ok(best_per_source(&sources, &targets, |i, j| {
            ai::cosine_similarity(&source_vectors[i], &target_vectors[j]).clamp(0.0, 1.0)
        }))
    }
}

/// Builds the aligner selected by `aligner.alignment_method`.
///
/// # Errors
///
/// Fails when the embedding backend cannot be configured.
pub fn build_aligner(settings: &Settings) -> Result<Arc<dyn Aligner>> {
    Ok(match settings.aligner.alignment_method {
        AlignmentMethod::Lexical => Arc::new(LexicalAligner),
        AlignmentMethod::Embedding => {
            Arc::new(EmbeddingAligner::new(ai::build_embedding_model(&settings.ai)?))
        }
    })
}

/// Correspondences that passed the confidence threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Alignment {
    pub correspondences: Vec<Correspondence>,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for correspondence in &self.correspondences {
            writeln!(f, "{correspondence}")?;
        }
        Ok(())
    }
}

impl Alignment {
    /// Writes one `source <-> target: confidence` line per correspondence.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_report(path, &self.to_string())
    }
}

/// Writes a text report, creating missing parent directories.
pub(crate) fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::io_failure(parent, source))?;
    }
    fs::write(path, contents).map_err(|source| Error::io_failure(path, source))
}

/// Delegates to an [`Aligner`] and filters its output by confidence.
pub struct AlignmentAdapter {
    aligner: Arc<dyn Aligner>,
    confidence_threshold: f64,
}

impl AlignmentAdapter {
    #[must_use]
    pub fn new(aligner: Arc<dyn Aligner>, settings: &AlignerSettings) -> Self {
        Self {
            aligner,
            confidence_threshold: settings.confidence_threshold,
        }
    }

    /// Aligns both ontologies, keeping correspondences whose confidence
    /// reaches the threshold.
    ///
    /// # Errors
    ///
    /// Propagates aligner failures.
    pub async fn align(&self, source: &Ontology, target: &Ontology) -> Result<Alignment> {
        let proposed = self.aligner.align(source, target).await?;
        let total = proposed.len();
        let correspondences: Vec<Correspondence> = proposed
            .into_iter()
            .filter(|c| c.confidence >= self.confidence_threshold)
            .collect();
        tracing::info!(
            source = %source.id(),
            target = %target.id(),
            proposed = total,
            kept = correspondences.len(),
            threshold = self.confidence_threshold,
            "ontologies aligned"
        );
        Ok(Alignment { correspondences })
    }
}

#[cfg(test)]
mod tests {
    use super::{readable_name, Aligner, AlignmentAdapter, EmbeddingAligner, LexicalAligner};
    use crate::ai::{test_support::FixedEmbeddings, AiError, EmbeddingModel};
    use crate::Error;
    use crate::config::AlignerSettings;
    use crate::ontology::{entities::thing, Class, Iri, Ontology};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn ontology(base: &str, classes: &[&str]) -> Ontology {
        let id = Iri::new(base).expect("valid iri");
        let mut ontology = Ontology::new(id.clone());
        for name in classes {
            ontology
                .add_class(Class::subclass_of(id.join(name).expect("iri"), thing()))
                .expect("class");
        }
        ontology
    }

    #[test]
    fn readable_names_split_words() {
        let class = Class::new(Iri::new("http://example.org/o#GraduateStudent").expect("iri"));
        assert_eq!(readable_name(&class), "graduate student");
        let class = Class::new(Iri::new("http://example.org/o#has_part").expect("iri"));
        assert_eq!(readable_name(&class), "has part");
    }

    #[tokio::test]
    async fn lexical_aligner_prefers_the_closest_name() {
        let source = ontology("http://example.org/a", &["Person", "Course"]);
        let target = ontology("http://example.org/b", &["Persons", "Lecture", "Courses"]);
        let proposed = LexicalAligner.align(&source, &target).await.expect("align");
        let pairs: Vec<(&str, &str)> = proposed
            .iter()
            .map(|c| (c.source.as_str(), c.target.as_str()))
            .collect();
        assert_eq!(pairs, [("Course", "Courses"), ("Person", "Persons")]);
    }

    /// Returns a single vector no matter how many inputs it receives.
    struct OneVector;

    #[async_trait::async_trait]
    impl EmbeddingModel for OneVector {
        async fn embed(&self, _inputs: Vec<String>) -> Result<Vec<Vec<f32>>, AiError> {
            Ok(vec![vec![1.0, 0.0]])
        }
    }

    #[tokio::test]
    async fn embedding_count_mismatch_is_an_error() {
        let source = ontology("http://example.org/a", &["Person", "Course"]);
        let target = ontology("http://example.org/b", &["Human"]);
        let err = EmbeddingAligner::new(Arc::new(OneVector))
            .align(&source, &target)
            .await
            .expect_err("two classes, one vector");
        assert!(matches!(err, Error::Message(_)));
    }

    #[tokio::test]
    async fn embedding_aligner_uses_cosine_similarity() {
        let model = FixedEmbeddings {
            vectors: BTreeMap::from([
                ("person".to_string(), vec![1.0, 0.0]),
                ("human".to_string(), vec![0.9, 0.1]),
                ("car".to_string(), vec![0.0, 1.0]),
            ]),
        };
        let source = ontology("http://example.org/a", &["Person"]);
        let target = ontology("http://example.org/b", &["Car", "Human"]);
        let adapter = AlignmentAdapter::new(
            Arc::new(EmbeddingAligner::new(Arc::new(model))),
            &AlignerSettings::default(),
        );
        let alignment = adapter.align(&source, &target).await.expect("align");
        assert_eq!(alignment.correspondences.len(), 1);
        assert_eq!(alignment.correspondences[0].target, "Human");
        assert!(alignment.correspondences[0].confidence > 0.99);
    }
}

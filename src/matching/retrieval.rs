use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;

use super::encoder::EncodedEntity;
use crate::{
    ai::{self, EmbeddingModel},
    Result,
};

/// A target proposed for a source entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Position of the target in the encoded target list.
    pub target: usize,
    pub score: f64,
}

/// Proposes the most promising targets for each source.
#[async_trait]
pub trait CandidateRetriever: Send + Sync {
    /// Returns, per source and in source order, at most `top_k` candidates
    /// sorted by decreasing score.
    async fn retrieve(
        &self,
        sources: &[EncodedEntity],
        targets: &[EncodedEntity],
        top_k: usize,
    ) -> Result<Vec<Vec<Candidate>>>;
}

fn top_k(scores: impl Iterator<Item = f64>, k: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = scores
        .enumerate()
        .map(|(target, score)| Candidate { target, score })
        .collect();
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(k);
    candidates
}

/// Retrieval by Jaro-Winkler similarity of entity labels.
#[derive(Clone, Debug, Default)]
pub struct LexicalRetriever;

#[async_trait]
impl CandidateRetriever for LexicalRetriever {
    async fn retrieve(
        &self,
        sources: &[EncodedEntity],
        targets: &[EncodedEntity],
        k: usize,
    ) -> Result<Vec<Vec<Candidate>>> {
        Ok(sources
            .iter()
            .map(|source| {
                top_k(
                    targets
                        .iter()
                        .map(|target| strsim::jaro_winkler(&source.label, &target.label)),
                    k,
                )
            })
            .collect())
    }
}

/// Retrieval by cosine similarity of embedded entity contexts.
pub struct EmbeddingRetriever {
    model: Arc<dyn EmbeddingModel>,
}

impl EmbeddingRetriever {
    #[must_use]
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl CandidateRetriever for EmbeddingRetriever {
    async fn retrieve(
        &self,
        sources: &[EncodedEntity],
        targets: &[EncodedEntity],
        k: usize,
    ) -> Result<Vec<Vec<Candidate>>> {
        let source_vectors =
            ai::embed_each(self.model.as_ref(), sources.iter().map(EncodedEntity::context).collect())
                .await?;
        let target_vectors =
            ai::embed_each(self.model.as_ref(), targets.iter().map(EncodedEntity::context).collect())
                .await?;
        Ok(source_vectors
            .iter()
            .map(|source| {
                top_k(
                    target_vectors
                        .iter()
                        .map(|target| ai::cosine_similarity(source, target).clamp(0.0, 1.0)),
                    k,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateRetriever, LexicalRetriever};
    use crate::matching::encoder::EncodedEntity;
    use crate::ontology::Iri;

    fn entity(label: &str) -> EncodedEntity {
        EncodedEntity {
            iri: Iri::new(format!("http://example.org/o#{label}")).expect("iri"),
            name: label.to_string(),
            label: label.to_string(),
            parents: Vec::new(),
        }
    }

    #[tokio::test]
    async fn candidates_are_ranked_and_truncated() {
        let sources = [entity("person")];
        let targets = [entity("car"), entity("person"), entity("persona")];
        let candidates = LexicalRetriever
            .retrieve(&sources, &targets, 2)
            .await
            .expect("retrieve");
        assert_eq!(candidates.len(), 1);
        let ranked: Vec<usize> = candidates[0].iter().map(|c| c.target).collect();
        assert_eq!(ranked, [1, 2]);
        assert!((candidates[0][0].score - 1.0).abs() < f64::EPSILON);
    }
}

//! Retrieval-and-matching pipeline: encode the classes of two ontologies,
//! retrieve candidate targets, let a judge score them, post-process with a
//! dual threshold and evaluate against a reference alignment.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub mod encoder;
pub mod evaluation;
pub mod judge;
pub mod postprocess;
pub mod retrieval;

pub use encoder::{encode, EncodedEntity};
pub use evaluation::{evaluate, Evaluation, ReferenceAlignment};
pub use judge::{LexicalJudge, LlmJudge, MatchJudge};
pub use postprocess::{postprocess, Prediction};
pub use retrieval::{Candidate, CandidateRetriever, EmbeddingRetriever, LexicalRetriever};

use crate::{
    ai,
    align::write_report,
    config::{JudgeBackend, MatcherSettings, RetrieverBackend, Settings},
    ontology::Ontology,
    Result,
};

/// Outcome of a matching run: retained matches and metrics in report order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchReport {
    pub matches: Vec<Prediction>,
    pub metrics: Vec<(&'static str, String)>,
}

impl MatchReport {
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find_map(|(metric, value)| (*metric == name).then_some(value.as_str()))
    }

    /// Writes one `metric: value` line per metric.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_report(path, &self.to_string())
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (metric, value) in &self.metrics {
            writeln!(f, "{metric}: {value}")?;
        }
        Ok(())
    }
}

/// Drives the pipeline stages with the configured thresholds.
pub struct MatchingAdapter {
    retriever: Arc<dyn CandidateRetriever>,
    judge: Arc<dyn MatchJudge>,
    settings: MatcherSettings,
}

impl MatchingAdapter {
    #[must_use]
    pub fn new(
        retriever: Arc<dyn CandidateRetriever>,
        judge: Arc<dyn MatchJudge>,
        settings: &MatcherSettings,
    ) -> Self {
        Self {
            retriever,
            judge,
            settings: settings.clone(),
        }
    }

    /// Builds the retriever and judge selected by `[matcher]`.
    ///
    /// # Errors
    ///
    /// Fails when a remote backend cannot be configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let retriever: Arc<dyn CandidateRetriever> = match settings.matcher.retriever {
            RetrieverBackend::Lexical => Arc::new(LexicalRetriever),
            RetrieverBackend::Embedding => Arc::new(EmbeddingRetriever::new(
                ai::build_embedding_model(&settings.ai)?,
            )),
        };
        let judge: Arc<dyn MatchJudge> = match settings.matcher.judge {
            JudgeBackend::Lexical => Arc::new(LexicalJudge),
            JudgeBackend::Llm => Arc::new(LlmJudge::new(
                ai::build_chat_model(&settings.ai)?,
                settings.matcher.matcher_model.clone(),
            )),
        };
        Ok(Self::new(retriever, judge, &settings.matcher))
    }

    /// Runs the whole pipeline from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Propagates backend failures and reference alignment read errors.
    pub async fn run(&self, source: &Ontology, target: &Ontology) -> Result<MatchReport> {
        let sources = encode(source);
        let targets = encode(target);
        let candidates = self
            .retriever
            .retrieve(&sources, &targets, self.settings.top_k)
            .await?;

        let mut predictions = Vec::new();
        let mut retrieved = 0;
        for (entity, proposals) in sources.iter().zip(&candidates) {
            retrieved += proposals.len();
            for candidate in proposals {
                if candidate.score < self.settings.ir_score_threshold {
                    continue;
                }
                let Some(other) = targets.get(candidate.target) else {
                    continue;
                };
                let confidence = self.judge.judge(entity, other).await?;
                predictions.push(Prediction {
                    source: entity.name.clone(),
                    target: other.name.clone(),
                    retrieval_score: candidate.score,
                    llm_confidence: confidence,
                });
            }
        }
        let judged = predictions.len();
        let matches = postprocess(
            predictions,
            self.settings.llm_confidence_threshold,
            self.settings.ir_score_threshold,
        );

        let mut metrics = vec![
            ("matcher", self.settings.matcher_model.clone()),
            ("source_entities", sources.len().to_string()),
            ("target_entities", targets.len().to_string()),
            ("candidates", retrieved.to_string()),
            ("judged", judged.to_string()),
            ("matches", matches.len().to_string()),
        ];
        if let Some(path) = &self.settings.reference_path {
            let reference = ReferenceAlignment::load(path)?;
            let evaluation = evaluate(&matches, &reference);
            metrics.push(("precision", format!("{:.4}", evaluation.precision)));
            metrics.push(("recall", format!("{:.4}", evaluation.recall)));
            metrics.push(("f1-score", format!("{:.4}", evaluation.f1_score)));
        }

        tracing::info!(
            source = %source.id(),
            target = %target.id(),
            matcher = self.settings.matcher_model.as_str(),
            candidates = retrieved,
            matches = matches.len(),
            "ontologies matched"
        );
        Ok(MatchReport { matches, metrics })
    }
}

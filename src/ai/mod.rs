//! Seams to remote language model providers.
//!
//! Aligners and matchers talk to [`ChatModel`] and [`EmbeddingModel`] trait
//! objects; [`infrastructure::openai`] provides the OpenAI-compatible adapter.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{config::AiSettings, Error};

pub mod infrastructure;

/// Contract implemented by providers answering free text prompts.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the provider's answer to `prompt`.
    async fn complete(&self, prompt: String) -> Result<String, AiError>;
}

/// Contract implemented by providers turning text into vectors.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Returns one embedding per input, in input order.
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, AiError>;
}

/// Factory error raised when building provider adapters from configuration.
#[derive(Debug, Error)]
pub enum AiInitError {
    /// Provided configuration was invalid.
    #[error("invalid AI provider configuration: {0}")]
    InvalidConfiguration(String),
    /// Adapter construction failed.
    #[error("failed to construct AI provider adapter: {0}")]
    Adapter(String),
}

/// Errors surfaced by provider adapters.
#[derive(Debug, Error)]
pub enum AiError {
    /// Building the provider request failed.
    #[error("failed to compose provider request: {0}")]
    Request(String),
    /// Provider returned an invalid response.
    #[error("provider returned an unexpected response")]
    EmptyResponse,
    /// Provider interaction failed.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Builds the chat adapter described by `settings`.
///
/// # Errors
///
/// Fails when the settings lack an API key or a model.
pub fn build_chat_model(settings: &AiSettings) -> Result<Arc<dyn ChatModel>, AiInitError> {
    let adapter = infrastructure::openai::OpenAiClient::try_new(settings)?;
    Ok(Arc::new(adapter))
}

/// Builds the embedding adapter described by `settings`.
///
/// # Errors
///
/// Fails when the settings lack an API key or a model.
pub fn build_embedding_model(
    settings: &AiSettings,
) -> Result<Arc<dyn EmbeddingModel>, AiInitError> {
    let adapter = infrastructure::openai::OpenAiClient::try_new(settings)?;
    Ok(Arc::new(adapter))
}

/// Embeds `inputs` and checks that the model answered with one vector per
/// input.
///
/// # Errors
///
/// Propagates provider failures and reports a count mismatch as
/// [`Error::Message`].
pub(crate) async fn embed_each(
    model: &dyn EmbeddingModel,
    inputs: Vec<String>,
) -> crate::Result<Vec<Vec<f32>>> {
    let expected = inputs.len();
    let vectors = model.embed(inputs).await?;
    if vectors.len() != expected {
        return Err(Error::Message(format!(
            "embedding model returned {} vectors for {expected} inputs",
            vectors.len()
        )));
    }
    Ok(vectors)
}

/// Cosine of the angle between two vectors; `0.0` when either is null or the
/// lengths differ.
#[must_use]
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> f64 {
    if left.len() != right.len() || left.is_empty() {
        return 0.0;
    }
    let (mut dot, mut left_norm, mut right_norm) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (l, r) in left.iter().zip(right) {
        let (l, r) = (f64::from(*l), f64::from(*r));
        dot += l * r;
        left_norm += l * l;
        right_norm += r * r;
    }
    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    dot / (left_norm.sqrt() * right_norm.sqrt())
}


#[cfg(test)]
mod tests {
    use super::{build_chat_model, cosine_similarity, embed_each, AiError, AiInitError, EmbeddingModel};
    use crate::{config::AiSettings, Error};
    use async_trait::async_trait;

    /// Answers every request with the same vectors, whatever the input count.
    struct FixedEmbeddingsOf(Vec<Vec<f32>>);

    #[async_trait]
    impl EmbeddingModel for FixedEmbeddingsOf {
        async fn embed(&self, _inputs: Vec<String>) -> Result<Vec<Vec<f32>>, AiError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn cosine_of_parallel_and_orthogonal_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn short_embedding_answers_are_rejected() {
        let model = FixedEmbeddingsOf(vec![vec![1.0, 0.0]]);
        let err = embed_each(&model, vec!["person".to_string(), "human".to_string()])
            .await
            .expect_err("one vector for two inputs");
        assert!(matches!(err, Error::Message(ref message) if message.contains("1 vectors for 2 inputs")));
    }

    #[test]
    fn adapters_require_an_api_key() {
        let settings = AiSettings {
            api_key: None,
            ..AiSettings::default()
        };
        let err = build_chat_model(&settings).err().expect("missing key");
        assert!(matches!(err, AiInitError::InvalidConfiguration(_)));
    }
}

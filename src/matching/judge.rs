use std::sync::Arc;

use async_trait::async_trait;

use super::encoder::EncodedEntity;
use crate::{ai::ChatModel, Result};

/// Scores how likely a source and a target denote the same concept.
#[async_trait]
pub trait MatchJudge: Send + Sync {
    /// Returns a confidence in `[0, 1]`.
    async fn judge(&self, source: &EncodedEntity, target: &EncodedEntity) -> Result<f64>;
}

/// Judge asking a chat model for a confidence score.
pub struct LlmJudge {
    model: Arc<dyn ChatModel>,
    matcher_model: String,
}

impl LlmJudge {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>, matcher_model: impl Into<String>) -> Self {
        Self {
            model,
            matcher_model: matcher_model.into(),
        }
    }

    fn prompt(source: &EncodedEntity, target: &EncodedEntity) -> String {
        format!(
            "Do the following two ontology concepts refer to the same real-world entity?\n\
             Source concept: {}\n\
             Target concept: {}\n\
             Answer with a single number between 0 and 1 giving your confidence that they match.",
            source.context(),
            target.context()
        )
    }
}

/// Reads a confidence out of a free text answer: the first number found, or
/// `yes`/`no`. Anything else is `None`.
#[must_use]
pub fn parse_confidence(answer: &str) -> Option<f64> {
    let bytes = answer.as_bytes();
    let start = (0..bytes.len()).find(|&i| {
        bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if let Some(start) = start {
        let number: String = answer[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(value) = number.trim_end_matches('.').parse::<f64>() {
            return Some(value.clamp(0.0, 1.0));
        }
    }
    let lowered = answer.trim().to_lowercase();
    if lowered.starts_with("yes") {
        Some(1.0)
    } else if lowered.starts_with("no") {
        Some(0.0)
    } else {
        None
    }
}

#[async_trait]
impl MatchJudge for LlmJudge {
    async fn judge(&self, source: &EncodedEntity, target: &EncodedEntity) -> Result<f64> {
        let answer = self.model.complete(Self::prompt(source, target)).await?;
        let Some(confidence) = parse_confidence(&answer) else {
            tracing::warn!(
                matcher = self.matcher_model.as_str(),
                source = source.name.as_str(),
                target = target.name.as_str(),
                answer = answer.as_str(),
                "unreadable judge answer, scoring zero"
            );
            return Ok(0.0);
        };
        Ok(confidence)
    }
}

/// Judge scoring normalized Levenshtein similarity of entity contexts.
#[derive(Clone, Debug, Default)]
pub struct LexicalJudge;

#[async_trait]
impl MatchJudge for LexicalJudge {
    async fn judge(&self, source: &EncodedEntity, target: &EncodedEntity) -> Result<f64> {
        Ok(strsim::normalized_levenshtein(&source.context(), &target.context()))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_confidence, LlmJudge, MatchJudge};
    use crate::ai::test_support::ScriptedChat;
    use crate::matching::encoder::EncodedEntity;
    use crate::ontology::Iri;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case("0.85", Some(0.85))]
    #[case("Confidence: 0.9.", Some(0.9))]
    #[case("1", Some(1.0))]
    #[case(".9", Some(0.9))]
    #[case("about .75 I think", Some(0.75))]
    #[case("7", Some(1.0))]
    #[case("Yes, they match", Some(1.0))]
    #[case("no", Some(0.0))]
    #[case("unsure", None)]
    fn confidences_are_read_from_answers(#[case] answer: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_confidence(answer), expected);
    }

    #[tokio::test]
    async fn llm_judge_prompts_with_both_contexts() {
        let chat = Arc::new(ScriptedChat {
            answers: vec![("human".to_string(), "0.95".to_string())],
            ..ScriptedChat::default()
        });
        let judge = LlmJudge::new(chat.clone(), "MistralLLMBertRAG");
        let entity = |label: &str| EncodedEntity {
            iri: Iri::new(format!("http://example.org/o#{label}")).expect("iri"),
            name: label.to_string(),
            label: label.to_string(),
            parents: Vec::new(),
        };
        let confidence = judge
            .judge(&entity("person"), &entity("human"))
            .await
            .expect("judge");
        assert!((confidence - 0.95).abs() < f64::EPSILON);
        let prompts = chat.prompts.lock().expect("prompts");
        assert!(prompts[0].contains("Source concept: person"));
    }
}

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A judged candidate pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub source: String,
    pub target: String,
    pub retrieval_score: f64,
    pub llm_confidence: f64,
}

/// Keeps predictions passing both thresholds, then the best target per
/// source: highest judge confidence, ties broken by retrieval score.
/// Output is ordered by source name.
#[must_use]
pub fn postprocess(
    predictions: Vec<Prediction>,
    llm_confidence_threshold: f64,
    ir_score_threshold: f64,
) -> Vec<Prediction> {
    let mut best: BTreeMap<String, Prediction> = BTreeMap::new();
    for prediction in predictions {
        if prediction.llm_confidence < llm_confidence_threshold
            || prediction.retrieval_score < ir_score_threshold
        {
            continue;
        }
        let replace = best.get(&prediction.source).map_or(true, |current| {
            let by_confidence = prediction
                .llm_confidence
                .partial_cmp(&current.llm_confidence)
                .unwrap_or(Ordering::Equal);
            let by_score = prediction
                .retrieval_score
                .partial_cmp(&current.retrieval_score)
                .unwrap_or(Ordering::Equal);
            by_confidence.then(by_score) == Ordering::Greater
        });
        if replace {
            best.insert(prediction.source.clone(), prediction);
        }
    }
    best.into_values().collect()
}

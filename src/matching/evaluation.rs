use std::collections::BTreeSet;
use std::path::Path;

use super::postprocess::Prediction;
use crate::{Error, Result};

/// Gold standard correspondences, as `(source, target)` name pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceAlignment {
    pairs: BTreeSet<(String, String)>,
}

impl ReferenceAlignment {
    /// Reads `source <-> target[: score]` lines. Blank lines and lines starting
    /// with `#` are ignored.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files and lines without a `<->` separator.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::io_failure(path, source))?;
        Self::parse(&text)
    }

    /// # Errors
    ///
    /// Fails on lines without a `<->` separator.
    pub fn parse(text: &str) -> Result<Self> {
        let mut pairs = BTreeSet::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((source, rest)) = line.split_once("<->") else {
                return Err(Error::Message(format!(
                    "reference alignment line {} lacks `<->`: {line}",
                    number + 1
                )));
            };
            let target = rest.split_once(':').map_or(rest, |(target, _)| target);
            pairs.insert((source.trim().to_string(), target.trim().to_string()));
        }
        Ok(Self { pairs })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.pairs
            .contains(&(source.to_string(), target.to_string()))
    }
}

/// Precision, recall and F1 of predictions against a reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[must_use]
pub fn evaluate(predictions: &[Prediction], reference: &ReferenceAlignment) -> Evaluation {
    let correct = predictions
        .iter()
        .filter(|p| reference.contains(&p.source, &p.target))
        .count() as f64;
    let ratio = |numerator: f64, denominator: usize| {
        if denominator == 0 {
            0.0
        } else {
            numerator / denominator as f64
        }
    };
    let precision = ratio(correct, predictions.len());
    let recall = ratio(correct, reference.len());
    let f1_score = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    Evaluation {
        precision,
        recall,
        f1_score,
    }
}

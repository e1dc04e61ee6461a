//! Sentiment labels and the classifier seam used by the HTTP handlers.
//!
//! The service only ever talks to a [`SentimentClassifier`] trait object, so
//! tests can substitute a fake model for the DistilBERT implementation.

mod distilbert;

pub use distilbert::DistilBertClassifier;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary sentiment as exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Positif")]
    Positive,
    #[serde(rename = "Négatif")]
    Negative,
}

impl Sentiment {
    /// Class id the model was trained to emit for positive texts.
    pub const POSITIVE_CLASS_ID: usize = 1;

    pub fn from_class_id(class_id: usize) -> Self {
        if class_id == Self::POSITIVE_CLASS_ID {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positif",
            Self::Negative => "Négatif",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A loaded, read-only text classifier.
pub trait SentimentClassifier: Send + Sync {
    /// Raw scores for `text`, one per class.
    fn logits(&self, text: &str) -> Result<Vec<f32>>;

    fn predict_class(&self, text: &str) -> Result<usize> {
        let logits = self.logits(text)?;
        argmax(&logits).ok_or_else(|| Error::model("model returned no logits"))
    }

    fn predict(&self, text: &str) -> Result<Sentiment> {
        Ok(Sentiment::from_class_id(self.predict_class(text)?))
    }
}

/// Index of the largest score; the first one wins on ties.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

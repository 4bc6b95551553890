//! Classification contract.
//!
//! The model forward pass is an external collaborator behind [`Classifier`].
//! This module owns what surrounds it: turning raw class probabilities into a
//! [`Prediction`], loading the model once, and allowing one request at a time.

mod gate;
mod lazy;
mod prediction;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use gate::{ClassifyGate, ClassifyPermit};
pub use lazy::LazyClassifier;
pub use prediction::{prediction_from_probabilities, UNKNOWN_CONFIDENCE_THRESHOLD};

/// Model output classes, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Cat,
    Dog,
    Unknown,
}

impl Label {
    /// Labels indexed by model output position.
    pub const ALL: [Label; 3] = [Label::Cat, Label::Dog, Label::Unknown];
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Label::Cat => "Cat",
            Label::Dog => "Dog",
            Label::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the winning class in percent, one decimal place.
    pub probability_percent: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The model produced fewer outputs than there are labels.
    #[error("unexpected model output: received {0} values")]
    UnexpectedOutput(usize),
    /// The image bytes could not be decoded into model input.
    #[error("unable to decode image: {0}")]
    Decode(String),
    /// Loading or running the model failed.
    #[error("model error: {0}")]
    Model(String),
}

/// Runs one forward pass over encoded image bytes.
pub trait Classifier {
    fn classify(&self, image: &[u8]) -> Result<Prediction, ClassifyError>;
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn classify(&self, image: &[u8]) -> Result<Prediction, ClassifyError> {
        (**self).classify(image)
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&self, image: &[u8]) -> Result<Prediction, ClassifyError> {
        (**self).classify(image)
    }
}

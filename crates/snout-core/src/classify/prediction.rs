//! Raw model output -> labelled prediction.

use super::{ClassifyError, Label, Prediction};

/// Below this probability a Cat/Dog winner is reported as Unknown.
pub const UNKNOWN_CONFIDENCE_THRESHOLD: f32 = 0.46;

const UNKNOWN_CLASS_INDEX: usize = 2;

/// Picks the most probable class; a Cat or Dog winner under
/// [`UNKNOWN_CONFIDENCE_THRESHOLD`] becomes Unknown. The reported
/// probability is always the winner's, rounded to one decimal percent.
pub fn prediction_from_probabilities(probabilities: &[f32]) -> Result<Prediction, ClassifyError> {
    if probabilities.len() < Label::ALL.len() {
        return Err(ClassifyError::UnexpectedOutput(probabilities.len()));
    }

    let mut max_index = 0;
    for (index, p) in probabilities.iter().enumerate().skip(1) {
        if *p > probabilities[max_index] {
            max_index = index;
        }
    }

    let max_probability = probabilities[max_index];
    let reject_as_unknown =
        max_index != UNKNOWN_CLASS_INDEX && max_probability < UNKNOWN_CONFIDENCE_THRESHOLD;
    let resolved_index = if reject_as_unknown {
        UNKNOWN_CLASS_INDEX
    } else {
        max_index
    };

    Ok(Prediction {
        label: Label::ALL.get(resolved_index).copied().unwrap_or(Label::Unknown),
        probability_percent: (f64::from(max_probability) * 1000.0).round() / 10.0,
    })
}

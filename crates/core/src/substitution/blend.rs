use serde::{Deserialize, Serialize};

use super::feedback::FeedbackCounters;
use super::scoring::ConfidenceScorer;
use crate::domain::product::Product;

/// Weight of the historical signal after `training_volume` events:
/// 0 before any training, 0.5 after the first event, 1.0 from the second on.
pub fn ramp_weight(training_volume: u32) -> f64 {
    if training_volume == 0 {
        return 0.0;
    }
    (0.5 + 0.5 * f64::from(training_volume - 1)).min(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedScore {
    pub attribute: f64,
    pub historical: f64,
    pub alpha: f64,
    pub confidence: f64,
}

/// Mixes the heuristic attribute score with confirmed-substitution feedback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blender {
    scorer: ConfidenceScorer,
}

impl Blender {
    pub fn new(scorer: ConfidenceScorer) -> Self {
        Self { scorer }
    }

    pub fn confidence(
        &self,
        source: &Product,
        candidate: &Product,
        feedback: &FeedbackCounters,
    ) -> BlendedScore {
        let attribute = self.scorer.attribute_score(source, candidate);
        let historical = feedback.historical_signal(source.id, candidate.id);
        let alpha = ramp_weight(feedback.training_volume(source.id));

        BlendedScore {
            attribute,
            historical,
            alpha,
            confidence: attribute * (1.0 - alpha) + historical * alpha,
        }
    }
}

use std::collections::BTreeMap;

use super::DEFAULT_TEMPERATURE;
use crate::domain::product::ProductId;

/// Temperature-scaled softmax over blended confidences, expressed in percent.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityNormalizer {
    temperature: f64,
}

impl ProbabilityNormalizer {
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn normalize(&self, confidences: &BTreeMap<ProductId, f64>) -> BTreeMap<ProductId, f64> {
        // Shifting by the max leaves the ratios unchanged and keeps exp() finite
        // for small temperatures.
        let peak = confidences.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: BTreeMap<ProductId, f64> = confidences
            .iter()
            .map(|(id, score)| (*id, ((score - peak) / self.temperature).exp()))
            .collect();
        let total: f64 = weights.values().sum();

        weights
            .into_iter()
            .map(|(id, weight)| {
                let probability = if total > 0.0 { weight / total * 100.0 } else { 0.0 };
                (id, probability)
            })
            .collect()
    }
}

impl Default for ProbabilityNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE)
    }
}

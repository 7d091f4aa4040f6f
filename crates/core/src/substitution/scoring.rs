//! Attribute scoring for substitute candidates

use serde::{Deserialize, Serialize};

use super::similarity::name_similarity;
use super::{BRAND_WEIGHT, DEFAULT_CROSS_FAMILY_MULTIPLIER, NAME_WEIGHT, ORIGIN_WEIGHT, PRICE_WEIGHT};
use crate::domain::product::Product;

/// Individual attribute components of a candidate score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeScores {
    /// Price proximity (0 - 40)
    pub price: f64,
    /// Exact brand match (0 or 40)
    pub brand: f64,
    /// Exact origin match (0 or 10)
    pub origin: f64,
    /// Name similarity (0 - 10)
    pub name: f64,
    /// 1.0 within the source family, the cross-family multiplier otherwise
    pub family_multiplier: f64,
}

impl AttributeScores {
    pub fn total(&self) -> f64 {
        (self.price + self.brand + self.origin + self.name) * self.family_multiplier
    }
}

/// Heuristic confidence for a (source, candidate) pair, in `[0, 100]`.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceScorer {
    cross_family_multiplier: f64,
}

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self { cross_family_multiplier: DEFAULT_CROSS_FAMILY_MULTIPLIER }
    }

    pub fn with_cross_family_multiplier(cross_family_multiplier: f64) -> Self {
        Self { cross_family_multiplier }
    }

    pub fn attribute_score(&self, source: &Product, candidate: &Product) -> f64 {
        self.components(source, candidate).total()
    }

    pub fn components(&self, source: &Product, candidate: &Product) -> AttributeScores {
        AttributeScores {
            price: price_score(source.price, candidate.price),
            brand: if source.brand == candidate.brand { BRAND_WEIGHT } else { 0.0 },
            origin: if source.origin == candidate.origin { ORIGIN_WEIGHT } else { 0.0 },
            name: name_similarity(&source.name, &candidate.name) * NAME_WEIGHT,
            family_multiplier: if source.family == candidate.family {
                1.0
            } else {
                self.cross_family_multiplier
            },
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Triangular price score peaking at parity. Zero outside the
/// `(0.25, 2)` ratio band and when the source has no observed price.
pub fn price_score(source_price: f64, candidate_price: f64) -> f64 {
    if source_price == 0.0 {
        return 0.0;
    }

    let ratio = candidate_price / source_price;
    if ratio <= 0.25 || ratio >= 2.0 {
        0.0
    } else if ratio <= 1.0 {
        PRICE_WEIGHT * (ratio - 0.25) / 0.75
    } else {
        PRICE_WEIGHT * (2.0 - ratio)
    }
}

//! Types for the substitution engine

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_CROSS_FAMILY_MULTIPLIER, DEFAULT_SEARCH_LIMIT, DEFAULT_TEMPERATURE};
use crate::domain::product::{Product, ProductId};

/// Tunables the engine is built with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Softmax temperature (default: 20)
    pub temperature: f64,
    /// Attribute multiplier for cross-family candidates (default: 0.6)
    pub cross_family_multiplier: f64,
    /// Hits returned by name search (default: 10)
    pub search_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            cross_family_multiplier: DEFAULT_CROSS_FAMILY_MULTIPLIER,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Ranked substitutes for one out-of-stock product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub product_id: ProductId,
    /// Highest confidence first, ties by ascending id
    pub substitutes: Vec<ProductId>,
    /// Blended confidence per substitute (0 - 100)
    pub confidences: BTreeMap<ProductId, f64>,
    /// Softmax probability per substitute, in percent
    pub probabilities: BTreeMap<ProductId, f64>,
    /// The source product and every substitute
    pub product_details: BTreeMap<ProductId, Product>,
}

/// One confirmed-substitution report for an out-of-stock product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingBatch {
    pub product_out_id: ProductId,
    pub zero_stock_data: Vec<ConfirmedSubstitute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedSubstitute {
    pub real_sub: ProductId,
}

impl TrainingBatch {
    pub fn new(product_out_id: ProductId, substitutes: &[ProductId]) -> Self {
        Self {
            product_out_id,
            zero_stock_data: substitutes
                .iter()
                .map(|real_sub| ConfirmedSubstitute { real_sub: *real_sub })
                .collect(),
        }
    }

    pub fn substitutes(&self) -> Vec<ProductId> {
        self.zero_stock_data.iter().map(|entry| entry.real_sub).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub loaded: bool,
    pub loaded_at: Option<DateTime<Utc>>,
    pub product_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ProductId,
    pub name: String,
}

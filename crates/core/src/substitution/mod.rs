//! Substitute recommendation engine
//!
//! Ranks replacement products for an out-of-stock item. Candidates come from
//! the taxonomy, each one gets a heuristic attribute score that is blended
//! with confirmed-substitution feedback, and the blended scores are turned
//! into a temperature-scaled probability distribution.

mod blend;
mod candidates;
mod engine;
mod feedback;
mod normalize;
mod scoring;
mod search;
mod similarity;
mod types;

pub use blend::{ramp_weight, BlendedScore, Blender};
pub use candidates::CandidateGenerator;
pub use engine::SubstitutionEngine;
pub use feedback::{FeedbackCounters, FeedbackStore};
pub use normalize::ProbabilityNormalizer;
pub use scoring::{price_score, AttributeScores, ConfidenceScorer};
pub use search::search_products;
pub use similarity::name_similarity;
pub use types::*;

/// Softmax temperature applied to blended confidences.
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// Attribute score multiplier for brand-matched candidates from another family.
pub const DEFAULT_CROSS_FAMILY_MULTIPLIER: f64 = 0.6;

/// Maximum hits returned by name search.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Upper bound of every confidence value.
pub const MAX_CONFIDENCE: f64 = 100.0;

pub const PRICE_WEIGHT: f64 = 40.0;
pub const BRAND_WEIGHT: f64 = 40.0;
pub const ORIGIN_WEIGHT: f64 = 10.0;
pub const NAME_WEIGHT: f64 = 10.0;

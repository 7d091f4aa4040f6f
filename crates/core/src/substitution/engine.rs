//! Substitution engine facade

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, info};

use super::blend::Blender;
use super::candidates::CandidateGenerator;
use super::feedback::FeedbackStore;
use super::normalize::ProbabilityNormalizer;
use super::scoring::ConfidenceScorer;
use super::search::search_products;
use super::types::*;
use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;
use crate::taxonomy::TaxonomyIndex;

/// Owns the taxonomy index and the feedback store and exposes the
/// operations the request layer needs. Share it behind an `Arc`.
#[derive(Debug)]
pub struct SubstitutionEngine {
    index: TaxonomyIndex,
    feedback: FeedbackStore,
    generator: CandidateGenerator,
    blender: Blender,
    normalizer: ProbabilityNormalizer,
    search_limit: usize,
}

impl SubstitutionEngine {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            index: TaxonomyIndex::new(),
            feedback: FeedbackStore::new(),
            generator: CandidateGenerator,
            blender: Blender::new(ConfidenceScorer::with_cross_family_multiplier(
                settings.cross_family_multiplier,
            )),
            normalizer: ProbabilityNormalizer::new(settings.temperature),
            search_limit: settings.search_limit,
        }
    }

    /// Replaces the catalog; the previous one stays authoritative on error.
    pub fn load(&self, products: Vec<Product>) -> Result<(), DomainError> {
        self.index.load(products)?;
        Ok(())
    }

    /// Empties the catalog. Feedback is kept; see [`Self::reset_feedback`].
    pub fn clear(&self) {
        self.index.clear();
    }

    pub fn reset_feedback(&self) {
        self.feedback.reset();
        info!(event_name = "feedback.reset.completed", "feedback counters reset");
    }

    pub fn lookup(&self, id: ProductId) -> Option<Product> {
        self.index.lookup(id)
    }

    pub fn all_products(&self) -> Vec<Product> {
        self.index.all_products()
    }

    pub fn predict(&self, product_id: ProductId) -> Result<Prediction, DomainError> {
        let snapshot = self.index.snapshot();
        let Some(source) = snapshot.lookup(product_id) else {
            debug!(
                event_name = "engine.predict.not_found",
                product_id = %product_id,
                "prediction requested for unknown product"
            );
            return Err(DomainError::ProductNotFound(product_id));
        };

        let candidates = self.generator.candidates(&snapshot, source);
        let mut confidences = BTreeMap::new();
        let mut product_details = BTreeMap::from([(source.id, source.clone())]);
        {
            let feedback = self.feedback.read();
            for candidate_id in &candidates {
                let Some(candidate) = snapshot.lookup(*candidate_id) else {
                    continue;
                };
                let blended = self.blender.confidence(source, candidate, &feedback);
                confidences.insert(*candidate_id, blended.confidence);
                product_details.insert(*candidate_id, candidate.clone());
            }
        }

        let probabilities = self.normalizer.normalize(&confidences);
        let mut substitutes: Vec<ProductId> = confidences.keys().copied().collect();
        substitutes.sort_by(|a, b| {
            confidences[b].partial_cmp(&confidences[a]).unwrap_or(Ordering::Equal).then(a.cmp(b))
        });

        debug!(
            event_name = "engine.predict.completed",
            product_id = %product_id,
            candidate_count = substitutes.len(),
            "prediction computed"
        );

        Ok(Prediction { product_id, substitutes, confidences, probabilities, product_details })
    }

    /// Records one confirmation per entry. Ids are not checked against the
    /// catalog, so feedback about unloaded products is kept.
    pub fn train(&self, batch: &TrainingBatch) {
        let substitutes = batch.substitutes();
        self.feedback.record_batch(batch.product_out_id, &substitutes);
        info!(
            event_name = "feedback.train.recorded",
            product_id = %batch.product_out_id,
            entries = substitutes.len(),
            "training feedback recorded"
        );
    }

    pub fn training_volume(&self, product_id: ProductId) -> u32 {
        self.feedback.training_volume(product_id)
    }

    pub fn status(&self) -> CatalogStatus {
        let snapshot = self.index.snapshot();
        CatalogStatus {
            loaded: !snapshot.is_empty(),
            loaded_at: snapshot.loaded_at(),
            product_count: snapshot.len(),
        }
    }

    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, DomainError> {
        let snapshot = self.index.snapshot();
        if snapshot.is_empty() {
            return Err(DomainError::CatalogNotLoaded);
        }
        Ok(search_products(&snapshot, query, self.search_limit))
    }

    pub fn market_count(&self) -> usize {
        self.index.snapshot().tree().markets().count()
    }
}

impl Default for SubstitutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::SubstitutionEngine;
    use crate::domain::product::fixtures::product;
    use crate::domain::product::{Product, ProductId};
    use crate::errors::{DomainError, ValidationError};
    use crate::substitution::{EngineSettings, TrainingBatch};

    fn catalog() -> Vec<Product> {
        let mut source = product(1, "UHT", "Zuzu", 100.0, "Lapte 1L");
        source.origin = "RO".to_string();
        let mut forty = product(2, "UHT", "Napolact", 150.0, "Lapte 1L");
        forty.origin = "RO".to_string();
        let mut seventy = product(3, "UHT", "Zuzu", 150.0, "Lapte 1L");
        seventy.origin = "HU".to_string();
        vec![source, forty, seventy]
    }

    fn engine() -> SubstitutionEngine {
        let engine = SubstitutionEngine::new();
        engine.load(catalog()).expect("catalog loads");
        engine
    }

    #[test]
    fn predicts_worked_example_distribution() {
        let engine = engine();
        let prediction = engine.predict(ProductId(1)).expect("known product");

        // candidate 3: price 20 + brand 40 + name 10 = 70
        assert!((prediction.confidences[&ProductId(2)] - 40.0).abs() < 1e-9);
        assert!((prediction.confidences[&ProductId(3)] - 70.0).abs() < 1e-9);
        assert_eq!(prediction.substitutes, vec![ProductId(3), ProductId(2)]);

        let total: f64 = prediction.probabilities.values().sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(prediction.probabilities[&ProductId(3)] > prediction.probabilities[&ProductId(2)]);
        assert_eq!(prediction.product_details.len(), 3);
        assert!(prediction.product_details.contains_key(&ProductId(1)));
    }

    #[test]
    fn unknown_product_is_not_found_without_state_change() {
        let engine = engine();
        assert_eq!(engine.predict(ProductId(99)), Err(DomainError::ProductNotFound(ProductId(99))));
        assert_eq!(engine.status().product_count, 3);
    }

    #[test]
    fn product_without_candidates_yields_empty_maps() {
        let engine = SubstitutionEngine::new();
        engine.load(vec![product(5, "UHT", "Zuzu", 5.0, "Lapte")]).expect("load");

        let prediction = engine.predict(ProductId(5)).expect("known product");
        assert!(prediction.substitutes.is_empty());
        assert!(prediction.confidences.is_empty());
        assert!(prediction.probabilities.is_empty());
        assert_eq!(prediction.product_details.len(), 1);
    }

    #[test]
    fn training_overrides_heuristics_after_two_events() {
        let engine = engine();
        engine.train(&TrainingBatch::new(ProductId(1), &[ProductId(2)]));

        let once = engine.predict(ProductId(1)).expect("prediction");
        assert!((once.confidences[&ProductId(2)] - 70.0).abs() < 1e-9);
        assert!((once.confidences[&ProductId(3)] - 35.0).abs() < 1e-9);

        engine.train(&TrainingBatch::new(ProductId(1), &[ProductId(2)]));
        let twice = engine.predict(ProductId(1)).expect("prediction");
        assert!((twice.confidences[&ProductId(2)] - 100.0).abs() < 1e-9);
        assert!(twice.confidences[&ProductId(3)].abs() < 1e-9);
        assert_eq!(twice.substitutes[0], ProductId(2));
    }

    #[test]
    fn training_accepts_ids_outside_the_catalog() {
        let engine = engine();
        engine.train(&TrainingBatch::new(ProductId(500), &[ProductId(501), ProductId(502)]));
        assert_eq!(engine.training_volume(ProductId(500)), 2);
    }

    #[test]
    fn clear_keeps_feedback_until_explicit_reset() {
        let engine = engine();
        engine.train(&TrainingBatch::new(ProductId(1), &[ProductId(2)]));
        engine.clear();
        engine.clear();

        assert!(!engine.status().loaded);
        assert!(engine.all_products().is_empty());
        assert_eq!(engine.training_volume(ProductId(1)), 1);

        engine.reset_feedback();
        assert_eq!(engine.training_volume(ProductId(1)), 0);
    }

    #[test]
    fn failed_reload_keeps_serving_previous_catalog() {
        let engine = engine();
        let mut broken = catalog();
        broken[2].market = String::new();

        let result = engine.load(broken);
        assert_eq!(
            result,
            Err(DomainError::Validation(ValidationError::MissingField {
                id: ProductId(3),
                field: "market".to_string(),
            }))
        );
        assert!(engine.predict(ProductId(1)).is_ok());
        assert_eq!(engine.lookup(ProductId(3)).map(|p| p.brand), Some("Zuzu".to_string()));
    }

    #[test]
    fn search_requires_a_loaded_catalog() {
        let engine = SubstitutionEngine::new();
        assert_eq!(engine.search("lapte"), Err(DomainError::CatalogNotLoaded));

        engine.load(catalog()).expect("load");
        assert_eq!(engine.search("lapte").map(|hits| hits.len()), Ok(3));
    }

    #[test]
    fn settings_change_temperature_and_search_limit() {
        let engine = SubstitutionEngine::with_settings(EngineSettings {
            temperature: 5.0,
            search_limit: 1,
            ..EngineSettings::default()
        });
        engine.load(catalog()).expect("load");

        let prediction = engine.predict(ProductId(1)).expect("prediction");
        // (70 - 40) / 5 = 6 -> e^6 / (1 + e^6)
        let expected = 6f64.exp() / (1.0 + 6f64.exp()) * 100.0;
        assert!((prediction.probabilities[&ProductId(3)] - expected).abs() < 1e-9);
        assert_eq!(engine.search("lapte").map(|hits| hits.len()), Ok(1));
    }

    #[test]
    fn concurrent_predictions_survive_reloads() {
        let engine = Arc::new(engine());
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for _ in 0..100 {
                        match engine.predict(ProductId(1)) {
                            Ok(prediction) => assert_eq!(prediction.substitutes.len(), 2),
                            Err(error) => {
                                assert_eq!(error, DomainError::ProductNotFound(ProductId(1)))
                            }
                        }
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            engine.load(catalog()).expect("reload");
            engine.clear();
        }
        for reader in readers {
            reader.join().expect("reader panicked");
        }
    }
}

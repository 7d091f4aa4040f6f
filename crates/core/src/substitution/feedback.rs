use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::MAX_CONFIDENCE;
use crate::domain::product::ProductId;

/// Confirmed substitutions and per-source training volume.
///
/// Feedback is taxonomy-agnostic: ids are recorded whether or not they are
/// part of the currently loaded catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedbackCounters {
    confirmations: HashMap<(ProductId, ProductId), u32>,
    training_events: HashMap<ProductId, u32>,
}

impl FeedbackCounters {
    pub fn record_training(&mut self, source: ProductId, confirmed: ProductId) {
        *self.confirmations.entry((source, confirmed)).or_insert(0) += 1;
        *self.training_events.entry(source).or_insert(0) += 1;
    }

    /// 100 once the pair has been confirmed at least once, 0 otherwise.
    /// The confirmation count does not change the signal.
    pub fn historical_signal(&self, source: ProductId, candidate: ProductId) -> f64 {
        if self.confirmations(source, candidate) > 0 {
            MAX_CONFIDENCE
        } else {
            0.0
        }
    }

    pub fn confirmations(&self, source: ProductId, candidate: ProductId) -> u32 {
        self.confirmations.get(&(source, candidate)).copied().unwrap_or(0)
    }

    /// Raw number of training events recorded for `source`.
    pub fn training_volume(&self, source: ProductId) -> u32 {
        self.training_events.get(&source).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.confirmations.is_empty() && self.training_events.is_empty()
    }
}

/// Process-lifetime feedback owner shared between concurrent requests.
#[derive(Debug, Default)]
pub struct FeedbackStore {
    counters: RwLock<FeedbackCounters>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_training(&self, source: ProductId, confirmed: ProductId) {
        self.write().record_training(source, confirmed);
    }

    /// Applies every confirmation of a batch under one lock, so readers see
    /// either none or all of it.
    pub fn record_batch(&self, source: ProductId, confirmed: &[ProductId]) {
        let mut counters = self.write();
        for substitute in confirmed {
            counters.record_training(source, *substitute);
        }
        debug!(
            event_name = "feedback.batch.applied",
            source_id = %source,
            entries = confirmed.len(),
            training_volume = counters.training_volume(source),
            "feedback batch applied"
        );
    }

    pub fn historical_signal(&self, source: ProductId, candidate: ProductId) -> f64 {
        self.read().historical_signal(source, candidate)
    }

    pub fn training_volume(&self, source: ProductId) -> u32 {
        self.read().training_volume(source)
    }

    /// Consistent view for the duration of one prediction.
    pub fn read(&self) -> RwLockReadGuard<'_, FeedbackCounters> {
        self.counters.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn reset(&self) {
        *self.write() = FeedbackCounters::default();
    }

    fn write(&self) -> RwLockWriteGuard<'_, FeedbackCounters> {
        self.counters.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::FeedbackStore;
    use crate::domain::product::ProductId;

    #[test]
    fn signal_is_binary_regardless_of_confirmation_count() {
        let store = FeedbackStore::new();
        assert_eq!(store.historical_signal(ProductId(1), ProductId(2)), 0.0);

        store.record_training(ProductId(1), ProductId(2));
        assert_eq!(store.historical_signal(ProductId(1), ProductId(2)), 100.0);

        for _ in 0..5 {
            store.record_training(ProductId(1), ProductId(2));
        }
        assert_eq!(store.historical_signal(ProductId(1), ProductId(2)), 100.0);
        assert_eq!(store.read().confirmations(ProductId(1), ProductId(2)), 6);
    }

    #[test]
    fn signal_is_directional() {
        let store = FeedbackStore::new();
        store.record_training(ProductId(1), ProductId(2));
        assert_eq!(store.historical_signal(ProductId(2), ProductId(1)), 0.0);
    }

    #[test]
    fn batch_entries_each_count_as_a_training_event() {
        let store = FeedbackStore::new();
        store.record_batch(ProductId(10), &[ProductId(11), ProductId(11), ProductId(12)]);

        assert_eq!(store.training_volume(ProductId(10)), 3);
        assert_eq!(store.read().confirmations(ProductId(10), ProductId(11)), 2);
        assert_eq!(store.training_volume(ProductId(11)), 0);
    }

    #[test]
    fn concurrent_batches_sum_their_increments() {
        let store = Arc::new(FeedbackStore::new());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.record_batch(ProductId(1), &[ProductId(2), ProductId(3)]);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().expect("worker panicked");
        }

        assert_eq!(store.training_volume(ProductId(1)), 800);
        assert_eq!(store.read().confirmations(ProductId(1), ProductId(2)), 400);
    }

    #[test]
    fn reset_empties_both_counters() {
        let store = FeedbackStore::new();
        store.record_training(ProductId(1), ProductId(2));
        store.reset();

        assert!(store.read().is_empty());
        assert_eq!(store.training_volume(ProductId(1)), 0);
    }
}

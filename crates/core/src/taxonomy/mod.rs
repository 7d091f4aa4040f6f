//! Taxonomy index: an immutable catalog snapshot grouped market → segment →
//! category → family, swapped wholesale on every load.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::product::{Product, ProductId};
use crate::errors::ValidationError;

/// Product ids of one family, in load order.
pub type FamilyLeaf = Vec<ProductId>;
pub type CategoryNode = BTreeMap<String, FamilyLeaf>;
pub type SegmentNode = BTreeMap<String, CategoryNode>;
pub type MarketNode = BTreeMap<String, SegmentNode>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaxonomyTree {
    markets: BTreeMap<String, MarketNode>,
}

impl TaxonomyTree {
    fn insert(&mut self, product: &Product) {
        self.markets
            .entry(product.market.clone())
            .or_default()
            .entry(product.segment.clone())
            .or_default()
            .entry(product.category.clone())
            .or_default()
            .entry(product.family.clone())
            .or_default()
            .push(product.id);
    }

    /// All families of the category that `product` belongs to.
    pub fn category_of(&self, product: &Product) -> Option<&CategoryNode> {
        self.markets.get(&product.market)?.get(&product.segment)?.get(&product.category)
    }

    pub fn family_of(&self, product: &Product) -> Option<&FamilyLeaf> {
        self.category_of(product)?.get(&product.family)
    }

    pub fn markets(&self) -> impl Iterator<Item = (&String, &MarketNode)> {
        self.markets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

/// One fully built, read-only view of the catalog.
#[derive(Clone, Debug, Default)]
pub struct TaxonomySnapshot {
    tree: TaxonomyTree,
    products: HashMap<ProductId, Product>,
    order: Vec<ProductId>,
    loaded_at: Option<DateTime<Utc>>,
}

impl TaxonomySnapshot {
    /// Validates and indexes `products`. Nothing is published on error.
    pub fn build(products: Vec<Product>) -> Result<Self, ValidationError> {
        let mut snapshot = Self {
            tree: TaxonomyTree::default(),
            products: HashMap::with_capacity(products.len()),
            order: Vec::with_capacity(products.len()),
            loaded_at: Some(Utc::now()),
        };

        for product in products {
            let product = product.trimmed();
            product.validate()?;
            if snapshot.products.contains_key(&product.id) {
                return Err(ValidationError::DuplicateId(product.id));
            }

            snapshot.tree.insert(&product);
            snapshot.order.push(product.id);
            snapshot.products.insert(product.id, product);
        }

        Ok(snapshot)
    }

    pub fn tree(&self) -> &TaxonomyTree {
        &self.tree
    }

    pub fn lookup(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Products in load order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.order.iter().filter_map(|id| self.products.get(id))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// Owner of the current snapshot. Readers clone the `Arc` and keep working
/// against it even if a load swaps a new snapshot in mid-flight.
#[derive(Debug, Default)]
pub struct TaxonomyIndex {
    current: RwLock<Arc<TaxonomySnapshot>>,
}

impl TaxonomyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<TaxonomySnapshot> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replaces the catalog. On error the previous snapshot stays visible.
    pub fn load(&self, products: Vec<Product>) -> Result<(), ValidationError> {
        let submitted = products.len();
        let snapshot = match TaxonomySnapshot::build(products) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(
                    event_name = "catalog.load.rejected",
                    submitted,
                    error = %error,
                    "catalog load rejected; previous snapshot retained"
                );
                return Err(error);
            }
        };

        let product_count = snapshot.len();
        self.swap(snapshot);
        info!(event_name = "catalog.load.completed", product_count, "catalog snapshot replaced");
        Ok(())
    }

    pub fn clear(&self) {
        self.swap(TaxonomySnapshot::default());
        debug!(event_name = "catalog.clear.completed", "catalog snapshot cleared");
    }

    pub fn lookup(&self, id: ProductId) -> Option<Product> {
        self.snapshot().lookup(id).cloned()
    }

    pub fn all_products(&self) -> Vec<Product> {
        self.snapshot().products().cloned().collect()
    }

    fn swap(&self, snapshot: TaxonomySnapshot) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(snapshot);
    }
}

use std::collections::BTreeSet;

use crate::domain::product::{Product, ProductId};
use crate::taxonomy::TaxonomySnapshot;

/// Produces eligible substitutes from the taxonomy: every other product of
/// the source family, plus same-brand products from sibling families of the
/// same category.
#[derive(Debug, Default, Clone, Copy)]
pub struct CandidateGenerator;

impl CandidateGenerator {
    pub fn candidates(&self, snapshot: &TaxonomySnapshot, source: &Product) -> BTreeSet<ProductId> {
        let mut found = BTreeSet::new();
        let Some(category) = snapshot.tree().category_of(source) else {
            return found;
        };

        for (family, members) in category {
            if *family == source.family {
                found.extend(members.iter().copied().filter(|id| *id != source.id));
                continue;
            }

            found.extend(members.iter().copied().filter(|id| {
                snapshot.lookup(*id).is_some_and(|candidate| candidate.brand == source.brand)
            }));
        }

        found
    }
}

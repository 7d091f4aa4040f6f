use super::types::SearchHit;
use crate::taxonomy::TaxonomySnapshot;

/// Case-insensitive substring search over product names. Exact matches rank
/// first, then prefix matches, then the rest; shorter names win ties.
pub fn search_products(snapshot: &TaxonomySnapshot, query: &str, limit: usize) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(u8, usize, SearchHit)> = snapshot
        .products()
        .filter_map(|product| {
            let haystack = product.name.to_lowercase();
            if !haystack.contains(&needle) {
                return None;
            }
            let tier = if haystack == needle {
                0
            } else if haystack.starts_with(&needle) {
                1
            } else {
                2
            };
            let hit = SearchHit { id: product.id, name: product.name.clone() };
            Some((tier, product.name.chars().count(), hit))
        })
        .collect();

    ranked.sort_by(|a, b| (a.0, a.1, a.2.id).cmp(&(b.0, b.1, b.2.id)));
    ranked.into_iter().take(limit).map(|(_, _, hit)| hit).collect()
}

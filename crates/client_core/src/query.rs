//! Query engine: resolves the visible product list from the cached catalog
//! and the current criteria, entirely in memory (no network involved).

use shared::domain::{Product, QueryCriteria, SortOrder};

/// Pure projection of `(catalog, criteria)` onto the ordered visible subset.
///
/// Category filtering keeps only products whose category matches the filter;
/// a non-empty trimmed search term keeps products whose name or category
/// label contains it case-insensitively. The surviving products are
/// stable-sorted by price, so equal prices keep their catalog order. The
/// input slice is never mutated and re-running with identical inputs yields
/// an identical list.
pub fn resolve_visible(catalog: &[Product], criteria: &QueryCriteria) -> Vec<Product> {
    let search = criteria.search.trim().to_lowercase();

    let mut visible: Vec<Product> = catalog
        .iter()
        .filter(|product| criteria.category.matches(product.category))
        .filter(|product| {
            search.is_empty()
                || product.name.to_lowercase().contains(&search)
                || product.category.label().to_lowercase().contains(&search)
        })
        .cloned()
        .collect();

    // slice::sort_by is stable, which is what keeps the tie-break order.
    match criteria.sort {
        SortOrder::Asc => visible.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::Desc => visible.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    visible
}

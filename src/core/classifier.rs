//! Partition fetched assets into workout categories.
//!
//! Categories follow the definition table order. Each keeps its first N
//! matches in fetch order; an asset may appear under several categories and
//! an asset matching none is simply left out.

use crate::domain::{Category, CategoryDefinition, MediaAsset};

/// Videos shown per category card
pub const DEFAULT_VIDEOS_PER_CATEGORY: usize = 3;

/// Classify with the default display cap
pub fn classify(assets: &[MediaAsset], definitions: &[CategoryDefinition]) -> Vec<Category> {
    classify_with_limit(assets, definitions, DEFAULT_VIDEOS_PER_CATEGORY)
}

/// Classify keeping at most `limit` videos per category
pub fn classify_with_limit(
    assets: &[MediaAsset],
    definitions: &[CategoryDefinition],
    limit: usize,
) -> Vec<Category> {
    definitions
        .iter()
        .map(|definition| Category {
            definition: *definition,
            videos: assets
                .iter()
                .filter(|asset| definition.matches(asset))
                .take(limit)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Every asset matching a definition, uncapped
pub fn matching_assets<'a>(
    assets: &'a [MediaAsset],
    definition: &CategoryDefinition,
) -> Vec<&'a MediaAsset> {
    assets.iter().filter(|a| definition.matches(a)).collect()
}

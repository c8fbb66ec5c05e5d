//! Workout categories.
//!
//! The category table is compiled in and never derived from remote data.
//! Categories are matched against assets by a deliberately loose predicate,
//! see [`CategoryDefinition::matches`].

use serde::Serialize;

use super::asset::MediaAsset;

/// A fixed workout category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    /// Stable id, also the substring matched against tags and folders
    pub id: &'static str,

    /// Fallback display name
    pub name: &'static str,

    /// Localization key for the display name
    pub name_key: &'static str,

    /// Localization key for the description
    pub description_key: &'static str,

    /// Icon glyph
    pub icon: &'static str,

    /// Accent color (hex)
    pub color: &'static str,
}

impl CategoryDefinition {
    /// Whether an asset belongs to this category.
    ///
    /// True when any tag, or the folder, contains the category id as a
    /// case-insensitive substring. `"family-fun"` and `"videos/familyfun"`
    /// both match `family`.
    pub fn matches(&self, asset: &MediaAsset) -> bool {
        let needle = self.id.to_lowercase();

        let has_tag = asset
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle));
        let in_folder = asset
            .folder
            .as_deref()
            .is_some_and(|folder| folder.to_lowercase().contains(&needle));

        has_tag || in_folder
    }
}

/// The five workout categories, in display order
pub const WORKOUT_CATEGORIES: [CategoryDefinition; 5] = [
    CategoryDefinition {
        id: "family",
        name: "Family",
        name_key: "categories.family.name",
        description_key: "categories.family.description",
        icon: "👨‍👩‍👧‍👦",
        color: "#ff6b35",
    },
    CategoryDefinition {
        id: "dance",
        name: "Dance",
        name_key: "categories.dance.name",
        description_key: "categories.dance.description",
        icon: "💃",
        color: "#e91e63",
    },
    CategoryDefinition {
        id: "power",
        name: "Power",
        name_key: "categories.power.name",
        description_key: "categories.power.description",
        icon: "💪",
        color: "#9c27b0",
    },
    CategoryDefinition {
        id: "yoga",
        name: "Yoga",
        name_key: "categories.yoga.name",
        description_key: "categories.yoga.description",
        icon: "🧘",
        color: "#4caf50",
    },
    CategoryDefinition {
        id: "static",
        name: "Static",
        name_key: "categories.static.name",
        description_key: "categories.static.description",
        icon: "🏃",
        color: "#2196f3",
    },
];

/// Look up a category definition by id
pub fn find_category(id: &str) -> Option<&'static CategoryDefinition> {
    WORKOUT_CATEGORIES.iter().find(|c| c.id == id)
}

/// A category together with the videos shown for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(flatten)]
    pub definition: CategoryDefinition,

    /// Matching videos, bounded by the display cap
    pub videos: Vec<MediaAsset>,
}

impl Category {
    pub fn id(&self) -> &'static str {
        self.definition.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_is_fixed() {
        let ids: Vec<_> = WORKOUT_CATEGORIES.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["family", "dance", "power", "yoga", "static"]);
    }

    #[test]
    fn test_tag_substring_match_is_case_insensitive() {
        let family = find_category("family").unwrap();
        assert!(family.matches(&MediaAsset::new("a", "").with_tag("Family-Fun")));
        assert!(family.matches(&MediaAsset::new("b", "").with_tag("familyfun")));
        assert!(!family.matches(&MediaAsset::new("c", "").with_tag("fam")));
    }

    #[test]
    fn test_folder_match() {
        let power = find_category("power").unwrap();
        let asset = MediaAsset::new("a", "").with_folder("videos/POWER-moves");
        assert!(power.matches(&asset));
    }

    #[test]
    fn test_untagged_asset_without_folder_matches_nothing() {
        let asset = MediaAsset::new("a", "");
        assert!(WORKOUT_CATEGORIES.iter().all(|c| !c.matches(&asset)));
    }

    #[test]
    fn test_unknown_category() {
        assert!(find_category("karate").is_none());
    }
}

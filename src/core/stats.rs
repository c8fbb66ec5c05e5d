//! Derive landing-page statistics.

use crate::domain::{AppStats, Category, MarketingStats, WORKOUT_CATEGORIES};

/// Build the stats block.
///
/// `total_videos` is the remote total, not the number of categorized videos.
/// The two marketing numbers are configuration, never computed.
pub fn aggregate(total_count: u64, categories: &[Category], marketing: &MarketingStats) -> AppStats {
    let category_count = if categories.is_empty() {
        WORKOUT_CATEGORIES.len()
    } else {
        categories.len()
    };

    AppStats {
        total_videos: total_count,
        active_kids: marketing.active_kids,
        categories: category_count,
        families: marketing.families,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_categories_fall_back_to_table_size() {
        let stats = aggregate(0, &[], &MarketingStats::default());
        assert_eq!(stats.total_videos, 0);
        assert_eq!(stats.categories, 5);
        assert_eq!(stats.active_kids, 50_000);
        assert_eq!(stats.families, 10_000);
    }

    #[test]
    fn test_marketing_numbers_come_from_config() {
        let marketing = MarketingStats {
            active_kids: 7,
            families: 3,
        };
        let stats = aggregate(12, &[], &marketing);
        assert_eq!(stats.active_kids, 7);
        assert_eq!(stats.families, 3);
        assert_eq!(stats.total_videos, 12);
    }
}

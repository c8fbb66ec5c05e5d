//! Landing-page statistics.

use serde::{Deserialize, Serialize};

/// Aggregate counts shown on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStats {
    /// Total videos as reported by the remote
    pub total_videos: u64,

    /// Marketing constant, not measured
    pub active_kids: u64,

    /// Number of workout categories
    pub categories: usize,

    /// Marketing constant, not measured
    pub families: u64,
}

impl Default for AppStats {
    fn default() -> Self {
        let marketing = MarketingStats::default();
        Self {
            total_videos: 0,
            active_kids: marketing.active_kids,
            categories: super::category::WORKOUT_CATEGORIES.len(),
            families: marketing.families,
        }
    }
}

/// Fixed marketing numbers baked into configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketingStats {
    #[serde(default = "default_active_kids")]
    pub active_kids: u64,

    #[serde(default = "default_families")]
    pub families: u64,
}

fn default_active_kids() -> u64 {
    50_000
}
fn default_families() -> u64 {
    10_000
}

impl Default for MarketingStats {
    fn default() -> Self {
        Self {
            active_kids: default_active_kids(),
            families: default_families(),
        }
    }
}

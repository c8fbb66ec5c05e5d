//! Domain types for the media catalog.
//!
//! - Assets: remote video records and result pages
//! - Categories: the fixed workout table and its view model
//! - Stats: landing-page counters

pub mod asset;
pub mod category;
pub mod stats;

// Re-export commonly used types
pub use asset::{AssetPage, MediaAsset};
pub use category::{find_category, Category, CategoryDefinition, WORKOUT_CATEGORIES};
pub use stats::{AppStats, MarketingStats};

//! zuzu - media catalog for the Zuzu Sports kids fitness app
//!
//! Fetches video assets from a Cloudinary account, sorts them into the five
//! workout categories, and derives the numbers shown on the landing page.
//!
//! # Data flow
//!
//! - One search request returns a flat page of assets plus a remote total
//! - The classifier partitions the page into categories by tag/folder match,
//!   keeping at most three videos per category
//! - The aggregator reports the remote total alongside fixed marketing numbers
//!
//! # Modules
//!
//! - `adapters`: Remote search client and delivery URL builders
//! - `core`: Classifier, stats, query cache, retry policy, library service
//! - `domain`: Data structures (MediaAsset, Category, AppStats)
//! - `store`: App state container with persisted preferences
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Show categories with their videos
//! zuzu categories
//!
//! # Build a playback URL
//! zuzu url kids/family-warmup --quality best
//!
//! # Switch the UI language
//! zuzu prefs language en
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod store;

// Re-export main types at crate root for convenience
pub use adapters::{AssetSource, CloudinaryClient, DeliveryUrlBuilder, FetchError, SearchParams};
pub use crate::core::{aggregate, classify, HomeView, QueryCache, VideoLibrary};
pub use domain::{AppStats, AssetPage, Category, CategoryDefinition, MediaAsset, WORKOUT_CATEGORIES};
pub use store::{AppStore, Language, PreferenceFile, Theme};

//! Core catalog logic.
//!
//! This module contains:
//! - Classifier: tag/folder partitioning into workout categories
//! - Stats: landing-page counters
//! - Cache: query-result cache with freshness windows
//! - Retry: bounded backoff policy
//! - Library: the service combining all of the above

pub mod cache;
pub mod classifier;
pub mod library;
pub mod retry;
pub mod stats;

// Re-export commonly used types
pub use cache::{CachePolicy, QueryCache, QueryKey};
pub use classifier::{classify, classify_with_limit, matching_assets, DEFAULT_VIDEOS_PER_CATEGORY};
pub use library::{HomeView, VideoLibrary};
pub use retry::{RetryPolicy, MAX_RETRIES};
pub use stats::aggregate;

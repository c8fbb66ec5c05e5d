//! Video library service.
//!
//! Ties the asset source, the query cache, the classifier and the stats
//! aggregator together. Every query goes through the cache; classification
//! and aggregation are recomputed from the cached page on each call.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::cache::{QueryCache, QueryKey};
use super::classifier::classify_with_limit;
use super::stats::aggregate;
use crate::adapters::{AssetSource, FetchError, SearchParams};
use crate::config::{CacheSettings, CatalogSettings, ResolvedConfig};
use crate::domain::{
    AppStats, AssetPage, Category, CategoryDefinition, MarketingStats, MediaAsset,
    WORKOUT_CATEGORIES,
};

/// Everything the landing page needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub categories: Vec<Category>,
    pub featured: Vec<MediaAsset>,
    pub stats: AppStats,
}

/// Cached, categorized access to remote videos
pub struct VideoLibrary {
    source: Arc<dyn AssetSource>,
    cache: QueryCache,
    definitions: Vec<CategoryDefinition>,
    catalog: CatalogSettings,
    cache_settings: CacheSettings,
    marketing: MarketingStats,
}

impl VideoLibrary {
    /// Create a library with default settings
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let cache_settings = CacheSettings::default();
        Self {
            source,
            cache: QueryCache::new(cache_settings.retry.clone()),
            definitions: WORKOUT_CATEGORIES.to_vec(),
            catalog: CatalogSettings::default(),
            cache_settings,
            marketing: MarketingStats::default(),
        }
    }

    /// Create a library using resolved configuration
    pub fn from_config(source: Arc<dyn AssetSource>, config: &ResolvedConfig) -> Self {
        Self {
            source,
            cache: QueryCache::new(config.cache.retry.clone()),
            definitions: WORKOUT_CATEGORIES.to_vec(),
            catalog: config.catalog.clone(),
            cache_settings: config.cache.clone(),
            marketing: config.stats,
        }
    }

    /// The underlying cache
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Category definitions in display order
    pub fn definitions(&self) -> &[CategoryDefinition] {
        &self.definitions
    }

    /// One page of videos for arbitrary parameters
    pub async fn videos(&self, params: SearchParams) -> Result<Arc<AssetPage>, FetchError> {
        let source = Arc::clone(&self.source);
        let request = params.clone();

        self.cache
            .fetch(QueryKey::Videos(params), self.cache_settings.videos, move || {
                let source = Arc::clone(&source);
                let request = request.clone();
                async move { source.search(&request).await }
            })
            .await
    }

    /// The default catalog page, capped at `catalog.max_results`
    pub async fn all_videos(&self) -> Result<Arc<AssetPage>, FetchError> {
        self.videos(SearchParams::default().with_max_results(self.catalog.max_results))
            .await
    }

    /// Videos carrying a tag; a blank tag yields nothing without a request
    pub async fn videos_by_tag(&self, tag: &str) -> Result<Vec<MediaAsset>, FetchError> {
        if tag.trim().is_empty() {
            debug!("Blank tag, skipping fetch");
            return Ok(Vec::new());
        }
        Ok(self.videos(SearchParams::by_tag(tag)).await?.assets.clone())
    }

    /// Videos inside a folder; a blank folder yields nothing without a request
    pub async fn videos_by_folder(&self, folder: &str) -> Result<Vec<MediaAsset>, FetchError> {
        if folder.trim().is_empty() {
            debug!("Blank folder, skipping fetch");
            return Ok(Vec::new());
        }
        Ok(self.videos(SearchParams::by_folder(folder)).await?.assets.clone())
    }

    /// The featured strip
    pub async fn featured(&self) -> Result<Vec<MediaAsset>, FetchError> {
        let source = Arc::clone(&self.source);
        let params = SearchParams::default().with_max_results(self.catalog.featured_count);

        let page = self
            .cache
            .fetch(QueryKey::Featured, self.cache_settings.featured, move || {
                let source = Arc::clone(&source);
                let params = params.clone();
                async move { source.search(&params).await }
            })
            .await?;

        Ok(page.assets.clone())
    }

    /// Categories with their capped video lists
    pub async fn workout_categories(&self) -> Result<Vec<Category>, FetchError> {
        let page = self.all_videos().await?;
        Ok(self.categorize(&page))
    }

    /// Landing-page counters
    pub async fn app_stats(&self) -> Result<AppStats, FetchError> {
        let page = self.all_videos().await?;
        let categories = self.categorize(&page);
        Ok(aggregate(page.total_count, &categories, &self.marketing))
    }

    /// Categories, featured strip and stats in one go
    pub async fn home(&self) -> Result<HomeView, FetchError> {
        let page = self.all_videos().await?;
        let categories = self.categorize(&page);
        let stats = aggregate(page.total_count, &categories, &self.marketing);
        let featured = self.featured().await?;

        info!(
            total_videos = stats.total_videos,
            featured = featured.len(),
            "Home view assembled"
        );

        Ok(HomeView {
            categories,
            featured,
            stats,
        })
    }

    fn categorize(&self, page: &AssetPage) -> Vec<Category> {
        classify_with_limit(&page.assets, &self.definitions, self.catalog.videos_per_category)
    }
}

impl std::fmt::Debug for VideoLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoLibrary")
            .field("source", &self.source.name())
            .field("catalog", &self.catalog)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        assets: Vec<MediaAsset>,
        total: u64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AssetSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn search(&self, params: &SearchParams) -> Result<AssetPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let assets = self
                .assets
                .iter()
                .take(params.max_results as usize)
                .cloned()
                .collect();
            Ok(AssetPage {
                assets,
                next_cursor: None,
                total_count: self.total,
            })
        }
    }

    fn source(n: usize, total: u64) -> Arc<StaticSource> {
        Arc::new(StaticSource {
            assets: (0..n)
                .map(|i| MediaAsset::new(format!("v{}", i), "").with_tag("family"))
                .collect(),
            total,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_categories_and_stats_share_one_fetch() {
        let src = source(10, 10);
        let library = VideoLibrary::new(src.clone());

        let categories = library.workout_categories().await.unwrap();
        let stats = library.app_stats().await.unwrap();

        assert_eq!(categories[0].videos.len(), 3);
        assert_eq!(stats.total_videos, 10);
        assert_eq!(src.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_tag_skips_fetch() {
        let src = source(3, 3);
        let library = VideoLibrary::new(src.clone());

        assert!(library.videos_by_tag("  ").await.unwrap().is_empty());
        assert!(library.videos_by_folder("").await.unwrap().is_empty());
        assert_eq!(src.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_featured_is_capped() {
        let src = source(25, 25);
        let library = VideoLibrary::new(src.clone());
        assert_eq!(library.featured().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_home_view() {
        let src = source(4, 120);
        let library = VideoLibrary::new(src.clone());
        let home = library.home().await.unwrap();

        assert_eq!(home.categories.len(), 5);
        assert_eq!(home.stats.total_videos, 120);
        assert_eq!(home.featured.len(), 4);
        // catalog page + featured strip
        assert_eq!(src.calls.load(Ordering::SeqCst), 2);
    }
}

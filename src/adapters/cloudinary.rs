//! Cloudinary Admin API adapter for searching video assets.
//!
//! One GET per search, HTTP Basic auth with the API key pair. The response
//! carries a `next_cursor` when more results exist; it is surfaced on the
//! returned page but never followed here.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use super::{AssetSource, FetchError, SearchParams};
use crate::config::CloudinaryCredentials;
use crate::domain::{AssetPage, MediaAsset};

/// Number of videos in the featured strip
pub const FEATURED_COUNT: u32 = 10;

/// Cloudinary search client
#[derive(Clone)]
pub struct CloudinaryClient {
    /// API root, e.g. https://api.cloudinary.com/v1_1/<cloud>
    base_url: String,
    api_key: String,
    api_secret: String,
    /// HTTP client
    client: reqwest::Client,
}

impl fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***HIDDEN***")
            .field("api_secret", &"***HIDDEN***")
            .finish()
    }
}

/// Raw search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<serde_json::Value>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    total_count: u64,
}

impl CloudinaryClient {
    /// Create a client for a cloud name
    pub fn new(cloud_name: &str, api_key: String, api_secret: String) -> Self {
        Self::with_base_url(
            format!("https://api.cloudinary.com/v1_1/{}", cloud_name),
            api_key,
            api_secret,
        )
    }

    /// Create a client against an explicit API root
    pub fn with_base_url(base_url: impl Into<String>, api_key: String, api_secret: String) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            api_secret,
            client: reqwest::Client::new(),
        }
    }

    /// Create from resolved credentials
    pub fn from_credentials(credentials: &CloudinaryCredentials) -> Self {
        Self::with_base_url(
            credentials.base_url(),
            credentials.api_key.clone(),
            credentials.api_secret.clone(),
        )
    }

    /// Build the search endpoint URL
    fn search_url(&self) -> String {
        format!("{}/resources/search", self.base_url)
    }

    /// Fetch one page of videos
    pub async fn get_videos(&self, params: &SearchParams) -> Result<AssetPage, FetchError> {
        let url = self.search_url();
        tracing::debug!(%url, max_results = params.max_results, "Searching assets");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&params.query_pairs())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string();
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let page = parse_search_response(&body)?;
        if page.has_more() {
            tracing::debug!(
                returned = page.assets.len(),
                total = page.total_count,
                "More results available; cursor not followed"
            );
        }

        Ok(page)
    }

    /// Videos carrying a tag
    pub async fn videos_by_tag(&self, tag: &str) -> Result<Vec<MediaAsset>, FetchError> {
        Ok(self.get_videos(&SearchParams::by_tag(tag)).await?.assets)
    }

    /// Videos inside a folder
    pub async fn videos_by_folder(&self, folder: &str) -> Result<Vec<MediaAsset>, FetchError> {
        Ok(self.get_videos(&SearchParams::by_folder(folder)).await?.assets)
    }

    /// The first few videos
    pub async fn featured_videos(&self) -> Result<Vec<MediaAsset>, FetchError> {
        let params = SearchParams::default().with_max_results(FEATURED_COUNT);
        Ok(self.get_videos(&params).await?.assets)
    }
}

#[async_trait]
impl AssetSource for CloudinaryClient {
    fn name(&self) -> &str {
        "cloudinary"
    }

    async fn search(&self, params: &SearchParams) -> Result<AssetPage, FetchError> {
        self.get_videos(params).await
    }
}

/// Decode a search response body.
///
/// Records that cannot be decoded at all (no `public_id`) are skipped with a
/// warning; every other field degrades to empty.
pub fn parse_search_response(body: &str) -> Result<AssetPage, FetchError> {
    let raw: SearchResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let mut assets = Vec::with_capacity(raw.resources.len());
    for record in raw.resources {
        match serde_json::from_value::<MediaAsset>(record) {
            Ok(asset) => assets.push(asset),
            Err(e) => tracing::warn!(error = %e, "Skipping malformed asset record"),
        }
    }

    Ok(AssetPage {
        assets,
        next_cursor: raw.next_cursor,
        total_count: raw.total_count,
    })
}

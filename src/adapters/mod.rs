//! Adapter interfaces for the remote media service.
//!
//! Adapters provide a unified interface for searching remote video assets,
//! plus pure builders for delivery URLs.

pub mod cloudinary;
pub mod delivery;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::AssetPage;

// Re-export the Cloudinary adapter
pub use cloudinary::{parse_search_response, CloudinaryClient};
pub use delivery::{DeliveryUrlBuilder, Quality, ThumbnailTransform, VideoFormat, VideoTransform};

/// Default page cap for a search
pub const DEFAULT_MAX_RESULTS: u32 = 500;

/// Errors surfaced by a fetch. None of them are retried here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The remote answered with a non-success status
    #[error("Cloudinary API error: {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not a search result
    #[error("Failed to decode search response: {0}")]
    Decode(String),
}

/// Kind of remote resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Image,
    #[default]
    Video,
    Raw,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Image => write!(f, "image"),
            ResourceType::Video => write!(f, "video"),
            ResourceType::Raw => write!(f, "raw"),
        }
    }
}

/// Delivery type of a remote resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    #[default]
    Upload,
    Private,
    Authenticated,
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryType::Upload => write!(f, "upload"),
            DeliveryType::Private => write!(f, "private"),
            DeliveryType::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Parameters of one search request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParams {
    pub resource_type: ResourceType,
    pub delivery_type: DeliveryType,
    pub max_results: u32,
    pub tags: Vec<String>,
    pub folder: Option<String>,
    /// Resume from a cursor returned by an earlier page
    pub next_cursor: Option<String>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            resource_type: ResourceType::Video,
            delivery_type: DeliveryType::Upload,
            max_results: DEFAULT_MAX_RESULTS,
            tags: Vec::new(),
            folder: None,
            next_cursor: None,
        }
    }
}

impl SearchParams {
    /// Videos carrying a tag
    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self::default().with_tag(tag)
    }

    /// Videos inside a folder
    pub fn by_folder(folder: impl Into<String>) -> Self {
        Self::default().with_folder(folder)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Query string pairs, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("resource_type", self.resource_type.to_string()),
            ("type", self.delivery_type.to_string()),
            ("max_results", self.max_results.to_string()),
        ];

        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if let Some(ref folder) = self.folder {
            pairs.push(("folder", folder.clone()));
        }
        if let Some(ref cursor) = self.next_cursor {
            pairs.push(("next_cursor", cursor.clone()));
        }

        pairs
    }
}

/// Trait for remote asset sources
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Run one search. Never follows `next_cursor` on its own.
    async fn search(&self, params: &SearchParams) -> Result<AssetPage, FetchError>;
}

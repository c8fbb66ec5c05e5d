//! Remote media assets as returned by the search API.
//!
//! Records are decoded leniently. Apart from `public_id`, a field that is
//! missing, null or of the wrong type falls back to empty for that field
//! alone, so one sloppy field never drops the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One remote video resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Opaque identifier, stable across requests
    #[serde(rename = "public_id")]
    pub id: String,

    /// Playback location
    #[serde(rename = "secure_url", default, deserialize_with = "string_or_empty")]
    pub url: String,

    /// Resource type reported by the remote (usually "video")
    #[serde(default, deserialize_with = "lenient_string")]
    pub resource_type: Option<String>,

    /// Container format (mp4, webm, ...)
    #[serde(default, deserialize_with = "lenient_string")]
    pub format: Option<String>,

    /// Free-text labels
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,

    /// Path-like folder, may encode a category
    #[serde(default, deserialize_with = "lenient_string")]
    pub folder: Option<String>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub width: Option<u32>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub height: Option<u32>,

    /// Playback length in seconds
    #[serde(rename = "duration", default, deserialize_with = "lenient_f64")]
    pub duration_seconds: Option<f64>,

    /// Upload timestamp
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MediaAsset {
    /// Create an asset with just an id and url
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            resource_type: Some("video".to_string()),
            format: None,
            tags: Vec::new(),
            folder: None,
            width: None,
            height: None,
            duration_seconds: None,
            created_at: None,
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set the folder
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Non-array values become empty; non-string elements are dropped
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetPage {
    /// Decoded assets, in the order the remote returned them
    pub assets: Vec<MediaAsset>,

    /// Cursor for the next page; reported, never followed automatically
    pub next_cursor: Option<String>,

    /// Total matches reported by the remote (may exceed `assets.len()`)
    pub total_count: u64,
}

impl AssetPage {
    /// Build a page whose total equals the number of assets
    pub fn from_assets(assets: Vec<MediaAsset>) -> Self {
        let total_count = assets.len() as u64;
        Self {
            assets,
            next_cursor: None,
            total_count,
        }
    }

    /// Whether the remote signalled more results beyond this page
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

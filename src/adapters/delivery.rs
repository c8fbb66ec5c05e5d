//! Delivery URL builders.
//!
//! Pure string composition, no network:
//! `https://res.cloudinary.com/{cloud}/{resource_type}/upload[/{t1,t2,...}]/{public_id}`

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ResourceType;

const DELIVERY_HOST: &str = "https://res.cloudinary.com";

/// Quality setting of a transformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    Auto,
    AutoLow,
    AutoGood,
    AutoBest,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Auto => write!(f, "auto"),
            Quality::AutoLow => write!(f, "auto:low"),
            Quality::AutoGood => write!(f, "auto:good"),
            Quality::AutoBest => write!(f, "auto:best"),
        }
    }
}

/// Output container of a video transformation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoFormat {
    #[default]
    Auto,
    Mp4,
    Webm,
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoFormat::Auto => write!(f, "auto"),
            VideoFormat::Mp4 => write!(f, "mp4"),
            VideoFormat::Webm => write!(f, "webm"),
        }
    }
}

/// Playback transformation (defaults 800x450, auto quality, auto format)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoTransform {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
    pub format: VideoFormat,
}

impl Default for VideoTransform {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            quality: Quality::Auto,
            format: VideoFormat::Auto,
        }
    }
}

impl VideoTransform {
    fn parameters(&self) -> Vec<String> {
        vec![
            format!("w_{}", self.width),
            format!("h_{}", self.height),
            format!("q_{}", self.quality),
            format!("f_{}", self.format),
        ]
    }
}

/// Poster-frame transformation (defaults 400x225, auto quality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailTransform {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

impl Default for ThumbnailTransform {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            quality: Quality::Auto,
        }
    }
}

impl ThumbnailTransform {
    fn parameters(&self) -> Vec<String> {
        vec![
            format!("w_{}", self.width),
            format!("h_{}", self.height),
            format!("q_{}", self.quality),
            "f_jpg".to_string(),
            "so_auto".to_string(),
        ]
    }
}

/// Builds delivery URLs for one cloud
#[derive(Debug, Clone)]
pub struct DeliveryUrlBuilder {
    cloud_name: String,
}

impl DeliveryUrlBuilder {
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
        }
    }

    /// Compose a URL from raw transformation parameters
    pub fn build(
        &self,
        public_id: &str,
        resource_type: ResourceType,
        transformations: &[String],
    ) -> String {
        let transformation = if transformations.is_empty() {
            String::new()
        } else {
            format!("/{}", transformations.join(","))
        };

        format!(
            "{}/{}/{}/upload{}/{}",
            DELIVERY_HOST, self.cloud_name, resource_type, transformation, public_id
        )
    }

    /// Optimized playback URL
    pub fn video_url(&self, public_id: &str, transform: VideoTransform) -> String {
        self.build(public_id, ResourceType::Video, &transform.parameters())
    }

    /// JPEG poster frame picked automatically from the video
    pub fn thumbnail_url(&self, public_id: &str, transform: ThumbnailTransform) -> String {
        let mut url = self.build(public_id, ResourceType::Video, &transform.parameters());
        url.push_str(".jpg");
        url
    }
}

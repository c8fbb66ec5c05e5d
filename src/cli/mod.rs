//! Command-line interface for zuzu.
//!
//! Provides commands for browsing the remote video catalog, inspecting
//! categories and stats, building delivery URLs, and managing the locally
//! persisted preferences.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{
    CloudinaryClient, DeliveryUrlBuilder, Quality, SearchParams, ThumbnailTransform,
    VideoFormat, VideoTransform, DEFAULT_MAX_RESULTS,
};
use crate::config::{self, ResolvedConfig, ENV_CLOUD_NAME};
use crate::core::VideoLibrary;
use crate::domain::{AppStats, Category, MediaAsset};
use crate::store::{AppStore, Language, PreferenceFile, Theme};

pub mod prefs;

/// zuzu - media catalog for the Zuzu Sports kids fitness app
#[derive(Parser, Debug)]
#[command(name = "zuzu")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search videos (one page, cursor is never followed automatically)
    Videos {
        /// Only videos carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only videos inside this folder
        #[arg(short, long)]
        folder: Option<String>,

        /// Page size
        #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
        max: u32,

        /// Continue from a cursor printed by an earlier page
        #[arg(long)]
        cursor: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the featured strip
    Featured {
        #[arg(long)]
        json: bool,
    },

    /// Show workout categories with their videos
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Show landing-page statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Print categories, featured videos and stats as JSON
    Home,

    /// Build an optimized playback URL
    Url {
        /// Asset public id
        public_id: String,

        #[arg(long, default_value_t = 800)]
        width: u32,

        #[arg(long, default_value_t = 450)]
        height: u32,

        #[arg(short, long, value_enum, default_value = "auto")]
        quality: QualityArg,

        #[arg(short, long, value_enum, default_value = "auto")]
        format: FormatArg,
    },

    /// Build a poster-frame thumbnail URL
    Thumbnail {
        /// Asset public id
        public_id: String,

        #[arg(long, default_value_t = 400)]
        width: u32,

        #[arg(long, default_value_t = 225)]
        height: u32,

        #[arg(short, long, value_enum, default_value = "auto")]
        quality: QualityArg,
    },

    /// Show resolved configuration (secrets redacted)
    Config,

    /// Manage persisted preferences
    Prefs {
        #[command(subcommand)]
        command: prefs::PrefsCommands,
    },
}

/// Quality for CLI (maps to Quality)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QualityArg {
    Auto,
    Low,
    Good,
    Best,
}

impl From<QualityArg> for Quality {
    fn from(q: QualityArg) -> Self {
        match q {
            QualityArg::Auto => Quality::Auto,
            QualityArg::Low => Quality::AutoLow,
            QualityArg::Good => Quality::AutoGood,
            QualityArg::Best => Quality::AutoBest,
        }
    }
}

/// Video format for CLI (maps to VideoFormat)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Auto,
    Mp4,
    Webm,
}

impl From<FormatArg> for VideoFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Auto => VideoFormat::Auto,
            FormatArg::Mp4 => VideoFormat::Mp4,
            FormatArg::Webm => VideoFormat::Webm,
        }
    }
}

/// Language for CLI (maps to Language)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    En,
    He,
}

impl From<LanguageArg> for Language {
    fn from(l: LanguageArg) -> Self {
        match l {
            LanguageArg::En => Language::En,
            LanguageArg::He => Language::He,
        }
    }
}

/// Theme for CLI (maps to Theme)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = config::config()?;

        match self.command {
            Commands::Videos {
                tag,
                folder,
                max,
                cursor,
                json,
            } => {
                let mut params = SearchParams::default().with_max_results(max);
                if let Some(tag) = tag {
                    params = params.with_tag(tag);
                }
                if let Some(folder) = folder {
                    params = params.with_folder(folder);
                }
                if let Some(cursor) = cursor {
                    params = params.with_cursor(cursor);
                }
                list_videos(config, params, json).await
            }
            Commands::Featured { json } => show_featured(config, json).await,
            Commands::Categories { json } => show_categories(config, json).await,
            Commands::Stats { json } => show_stats(config, json).await,
            Commands::Home => show_home(config).await,
            Commands::Url {
                public_id,
                width,
                height,
                quality,
                format,
            } => {
                let transform = VideoTransform {
                    width,
                    height,
                    quality: quality.into(),
                    format: format.into(),
                };
                println!("{}", delivery_builder(config)?.video_url(&public_id, transform));
                Ok(())
            }
            Commands::Thumbnail {
                public_id,
                width,
                height,
                quality,
            } => {
                let transform = ThumbnailTransform {
                    width,
                    height,
                    quality: quality.into(),
                };
                println!(
                    "{}",
                    delivery_builder(config)?.thumbnail_url(&public_id, transform)
                );
                Ok(())
            }
            Commands::Config => show_config(config),
            Commands::Prefs { command } => {
                let file = PreferenceFile::new(config.preferences_path());
                let mut store = AppStore::open(file)
                    .await
                    .context("Failed to load preferences")?;
                prefs::execute(&mut store, command).await
            }
        }
    }
}

/// Build the video library from configuration
fn build_library(config: &ResolvedConfig) -> Result<VideoLibrary> {
    config.cloudinary.validate()?;
    let client = CloudinaryClient::from_credentials(&config.cloudinary);
    Ok(VideoLibrary::from_config(Arc::new(client), config))
}

fn delivery_builder(config: &ResolvedConfig) -> Result<DeliveryUrlBuilder> {
    if config.cloudinary.cloud_name.is_empty() {
        anyhow::bail!("Missing required environment variables: {}", ENV_CLOUD_NAME);
    }
    Ok(DeliveryUrlBuilder::new(&config.cloudinary.cloud_name))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_video_table(videos: &[MediaAsset]) {
    println!("{:<40} {:<30} {:<20}", "PUBLIC ID", "TAGS", "FOLDER");
    println!("{}", "-".repeat(92));

    for video in videos {
        println!(
            "{:<40} {:<30} {:<20}",
            video.id,
            video.tags.join(","),
            video.folder.as_deref().unwrap_or("-")
        );
    }
}

/// Search and print one page
async fn list_videos(config: &ResolvedConfig, params: SearchParams, json: bool) -> Result<()> {
    let library = build_library(config)?;
    let page = library.videos(params).await?;

    if json {
        return print_json(page.as_ref());
    }

    if page.assets.is_empty() {
        println!("No videos found");
        return Ok(());
    }

    print_video_table(&page.assets);
    println!("\n{} of {} videos", page.assets.len(), page.total_count);
    if let Some(ref cursor) = page.next_cursor {
        println!("More results available: --cursor {}", cursor);
    }

    Ok(())
}

async fn show_featured(config: &ResolvedConfig, json: bool) -> Result<()> {
    let library = build_library(config)?;
    let featured = library.featured().await?;

    if json {
        return print_json(&featured);
    }
    print_video_table(&featured);
    Ok(())
}

fn print_categories(categories: &[Category]) {
    for category in categories {
        let def = &category.definition;
        println!("{} {} ({}) [{}]", def.icon, def.name, def.id, def.color);
        if category.videos.is_empty() {
            println!("    (no videos)");
        }
        for video in &category.videos {
            println!("    {}", video.id);
        }
    }
}

async fn show_categories(config: &ResolvedConfig, json: bool) -> Result<()> {
    let library = build_library(config)?;
    let categories = library.workout_categories().await?;

    if json {
        return print_json(&categories);
    }
    print_categories(&categories);
    Ok(())
}

fn print_stats(stats: &AppStats) {
    println!("Total videos: {}", stats.total_videos);
    println!("Categories:   {}", stats.categories);
    println!("Active kids:  {}", stats.active_kids);
    println!("Families:     {}", stats.families);
}

async fn show_stats(config: &ResolvedConfig, json: bool) -> Result<()> {
    let library = build_library(config)?;
    let stats = library.app_stats().await?;

    if json {
        return print_json(&stats);
    }
    print_stats(&stats);
    Ok(())
}

async fn show_home(config: &ResolvedConfig) -> Result<()> {
    let library = build_library(config)?;
    let home = library.home().await?;
    print_json(&home)
}

fn show_config(config: &ResolvedConfig) -> Result<()> {
    print_json(&config.safe_summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_videos_command() {
        let cli = Cli::try_parse_from(["zuzu", "videos", "--tag", "yoga", "--max", "20"]).unwrap();
        match cli.command {
            Commands::Videos { tag, max, json, .. } => {
                assert_eq!(tag.as_deref(), Some("yoga"));
                assert_eq!(max, 20);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_videos_default_page_size() {
        let cli = Cli::try_parse_from(["zuzu", "videos"]).unwrap();
        assert!(matches!(cli.command, Commands::Videos { max: 500, .. }));
    }

    #[test]
    fn test_parse_url_command() {
        let cli =
            Cli::try_parse_from(["zuzu", "url", "kids/intro", "--quality", "best", "--format", "webm"])
                .unwrap();
        match cli.command {
            Commands::Url {
                public_id,
                width,
                quality,
                format,
                ..
            } => {
                assert_eq!(public_id, "kids/intro");
                assert_eq!(width, 800);
                assert_eq!(Quality::from(quality), Quality::AutoBest);
                assert_eq!(VideoFormat::from(format), VideoFormat::Webm);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_prefs_command() {
        let cli = Cli::try_parse_from(["zuzu", "prefs", "language", "en"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Prefs {
                command: prefs::PrefsCommands::Language { language: LanguageArg::En }
            }
        ));
    }
}

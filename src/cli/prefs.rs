//! `zuzu prefs` subcommands.
//!
//! Each command mutates the store and then saves the persisted subset if it
//! changed.

use anyhow::{Context, Result};
use clap::Subcommand;

use super::{LanguageArg, ThemeArg};
use crate::store::AppStore;

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show persisted preferences
    Show,

    /// Set the UI language
    Language { language: LanguageArg },

    /// Switch between English and Hebrew
    ToggleLanguage,

    /// Set the color theme
    Theme { theme: ThemeArg },

    /// Switch between light and dark
    ToggleTheme,

    /// Add a video to favorites
    Favorite { video_id: String },

    /// Remove a video from favorites
    Unfavorite { video_id: String },

    /// Mark a video as completed
    Complete {
        video_id: String,

        /// Workout minutes to add
        #[arg(short, long)]
        minutes: Option<u32>,
    },

    /// Add workout minutes
    Progress { minutes: u32 },

    /// Reset all preferences to defaults
    Reset,
}

/// Apply a prefs command and persist the result
pub async fn execute(store: &mut AppStore, command: PrefsCommands) -> Result<()> {
    match command {
        PrefsCommands::Show => {}
        PrefsCommands::Language { language } => store.set_language(language.into()),
        PrefsCommands::ToggleLanguage => store.toggle_language(),
        PrefsCommands::Theme { theme } => store.set_theme(theme.into()),
        PrefsCommands::ToggleTheme => store.toggle_theme(),
        PrefsCommands::Favorite { video_id } => store.add_favorite_video(video_id),
        PrefsCommands::Unfavorite { video_id } => store.remove_favorite_video(&video_id),
        PrefsCommands::Complete { video_id, minutes } => {
            if !store.mark_video_completed(video_id.clone()) {
                eprintln!("Video {} was already completed", video_id);
            }
            if let Some(minutes) = minutes {
                store.update_progress(minutes);
            }
        }
        PrefsCommands::Progress { minutes } => store.update_progress(minutes),
        PrefsCommands::Reset => store
            .reset_preferences()
            .await
            .context("Failed to clear preferences")?,
    }

    store
        .save_if_changed()
        .await
        .context("Failed to save preferences")?;

    println!("{}", serde_json::to_string_pretty(&store.state().persisted())?);
    Ok(())
}

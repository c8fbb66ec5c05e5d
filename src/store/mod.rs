//! Application state container.
//!
//! `AppStore` is an explicit value handed to whoever needs it; there is no
//! global instance. A fixed allow-list of fields (language, theme, favorites,
//! completed videos, progress) is persisted through a [`PreferenceFile`] and
//! rehydrated by [`AppStore::open`]. Everything else lives for the process
//! only.

pub mod persist;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{AppStats, Category, MediaAsset};

pub use persist::{PersistedState, PreferenceFile, StoreError};

/// UI language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    /// Hebrew, the default audience
    #[default]
    He,
}

impl Language {
    /// Right-to-left layout
    pub fn is_rtl(self) -> bool {
        self == Language::He
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::He,
            Language::He => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::He => write!(f, "he"),
        }
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Workout counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub total_workouts: u32,
    pub total_minutes: u32,
    /// Consecutive days with at least one completed workout
    pub streak: u32,
    pub last_workout: Option<DateTime<Utc>>,
}

/// Full application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_language: Language,
    pub theme: Theme,

    pub workout_categories: Vec<Category>,
    pub featured_videos: Vec<MediaAsset>,
    pub app_stats: AppStats,

    pub is_loading: bool,
    pub error: Option<String>,
    pub selected_category: Option<String>,
    pub selected_video: Option<MediaAsset>,

    pub favorite_videos: Vec<String>,
    pub completed_videos: Vec<String>,
    pub user_progress: UserProgress,
}

impl AppState {
    pub fn is_rtl(&self) -> bool {
        self.current_language.is_rtl()
    }

    /// The allow-listed subset
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            current_language: self.current_language,
            theme: self.theme,
            favorite_videos: self.favorite_videos.clone(),
            completed_videos: self.completed_videos.clone(),
            user_progress: self.user_progress.clone(),
        }
    }

    fn rehydrate(&mut self, persisted: PersistedState) {
        self.current_language = persisted.current_language;
        self.theme = persisted.theme;
        self.favorite_videos = persisted.favorite_videos;
        self.completed_videos = persisted.completed_videos;
        self.user_progress = persisted.user_progress;
    }
}

/// State container with optional durable backing
#[derive(Debug, Default)]
pub struct AppStore {
    state: AppState,
    file: Option<PreferenceFile>,
    /// Snapshot of what is on disk
    saved: Option<PersistedState>,
}

impl AppStore {
    /// In-memory store with default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a file, rehydrating persisted fields
    pub async fn open(file: PreferenceFile) -> Result<Self, StoreError> {
        let mut state = AppState::default();
        let saved = match file.load().await {
            Ok(saved) => saved,
            Err(StoreError::Serialization(e)) => {
                warn!(
                    path = %file.path().display(),
                    error = %e,
                    "Unreadable preferences, starting from defaults"
                );
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(persisted) = saved.clone() {
            info!(path = %file.path().display(), "Rehydrated preferences");
            state.rehydrate(persisted);
        }

        Ok(Self {
            state,
            file: Some(file),
            saved,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether persisted fields differ from what was last written
    pub fn has_unsaved_changes(&self) -> bool {
        let current = self.state.persisted();
        match &self.saved {
            Some(saved) => *saved != current,
            None => current != PersistedState::default(),
        }
    }

    /// Write persisted fields if they changed. Returns whether a write happened.
    pub async fn save_if_changed(&mut self) -> Result<bool, StoreError> {
        let Some(file) = &self.file else {
            return Ok(false);
        };
        if !self.has_unsaved_changes() {
            return Ok(false);
        }

        let current = self.state.persisted();
        file.save(&current).await?;
        self.saved = Some(current);
        Ok(true)
    }

    // Language

    pub fn set_language(&mut self, language: Language) {
        self.state.current_language = language;
    }

    pub fn toggle_language(&mut self) {
        self.state.current_language = self.state.current_language.toggled();
    }

    // Theme

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
    }

    // Data

    pub fn set_workout_categories(&mut self, categories: Vec<Category>) {
        self.state.workout_categories = categories;
    }

    pub fn set_featured_videos(&mut self, videos: Vec<MediaAsset>) {
        self.state.featured_videos = videos;
    }

    pub fn set_app_stats(&mut self, stats: AppStats) {
        self.state.app_stats = stats;
    }

    // UI

    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.state.error = error;
    }

    pub fn reset_error(&mut self) {
        self.state.error = None;
    }

    pub fn set_selected_category(&mut self, category_id: Option<String>) {
        self.state.selected_category = category_id;
    }

    pub fn set_selected_video(&mut self, video: Option<MediaAsset>) {
        self.state.selected_video = video;
    }

    pub fn reset_selection(&mut self) {
        self.state.selected_category = None;
        self.state.selected_video = None;
    }

    // User

    /// Add a favorite; already-favorited ids are left alone
    pub fn add_favorite_video(&mut self, video_id: impl Into<String>) {
        let video_id = video_id.into();
        if !self.is_favorite(&video_id) {
            self.state.favorite_videos.push(video_id);
        }
    }

    pub fn remove_favorite_video(&mut self, video_id: &str) {
        self.state.favorite_videos.retain(|id| id != video_id);
    }

    pub fn is_favorite(&self, video_id: &str) -> bool {
        self.state.favorite_videos.iter().any(|id| id == video_id)
    }

    pub fn is_completed(&self, video_id: &str) -> bool {
        self.state.completed_videos.iter().any(|id| id == video_id)
    }

    /// Record a completed video now
    pub fn mark_video_completed(&mut self, video_id: impl Into<String>) -> bool {
        self.mark_video_completed_at(video_id, Utc::now())
    }

    /// Record a completed video at a given time.
    ///
    /// Only the first completion of a video counts. Returns whether anything
    /// changed.
    pub fn mark_video_completed_at(&mut self, video_id: impl Into<String>, now: DateTime<Utc>) -> bool {
        let video_id = video_id.into();
        if self.is_completed(&video_id) {
            return false;
        }

        let progress = &mut self.state.user_progress;
        let today = now.date_naive();
        progress.streak = match progress.last_workout.map(|d| d.date_naive()) {
            Some(last) if last == today => progress.streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => progress.streak.saturating_add(1),
            _ => 1,
        };
        progress.total_workouts = progress.total_workouts.saturating_add(1);
        progress.last_workout = Some(now);

        self.state.completed_videos.push(video_id);
        true
    }

    /// Add workout minutes
    pub fn update_progress(&mut self, minutes: u32) {
        let progress = &mut self.state.user_progress;
        progress.total_minutes = progress.total_minutes.saturating_add(minutes);
    }

    /// Reset persisted fields to defaults and delete the backing file
    pub async fn reset_preferences(&mut self) -> Result<(), StoreError> {
        self.state.rehydrate(PersistedState::default());
        if let Some(file) = &self.file {
            file.clear().await?;
            info!(path = %file.path().display(), "Preferences cleared");
        }
        self.saved = None;
        Ok(())
    }
}

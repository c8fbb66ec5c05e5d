//! App Store Integration Tests
//!
//! Persistence allow-list and rehydration across store instances.

use tempfile::TempDir;

use zuzu::domain::{AppStats, MediaAsset};
use zuzu::store::{AppStore, Language, PreferenceFile, Theme};

fn prefs(temp: &TempDir) -> PreferenceFile {
    PreferenceFile::new(temp.path().join("zuzu-sports-storage.json"))
}

#[tokio::test]
async fn test_rehydrates_persisted_fields() {
    let temp = TempDir::new().unwrap();

    let mut store = AppStore::open(prefs(&temp)).await.unwrap();
    store.set_language(Language::En);
    store.set_theme(Theme::Dark);
    store.add_favorite_video("kids/yoga-1");
    store.mark_video_completed("kids/family-1");
    store.update_progress(25);
    assert!(store.save_if_changed().await.unwrap());

    let reopened = AppStore::open(prefs(&temp)).await.unwrap();
    let state = reopened.state();
    assert_eq!(state.current_language, Language::En);
    assert!(!state.is_rtl());
    assert_eq!(state.theme, Theme::Dark);
    assert_eq!(state.favorite_videos, vec!["kids/yoga-1"]);
    assert_eq!(state.completed_videos, vec!["kids/family-1"]);
    assert_eq!(state.user_progress.total_minutes, 25);
    assert_eq!(state.user_progress.total_workouts, 1);
    assert_eq!(state.user_progress.streak, 1);
    assert!(state.user_progress.last_workout.is_some());
    assert!(!reopened.has_unsaved_changes());
}

#[tokio::test]
async fn test_transient_fields_are_not_written() {
    let temp = TempDir::new().unwrap();
    let file = prefs(&temp);

    let mut store = AppStore::open(file.clone()).await.unwrap();
    store.set_theme(Theme::Dark);
    store.set_loading(true);
    store.set_error(Some("Cloudinary API error: Bad Gateway".to_string()));
    store.set_selected_category(Some("yoga".to_string()));
    store.set_selected_video(Some(MediaAsset::new("kids/yoga-1", "")));
    store.set_featured_videos(vec![MediaAsset::new("kids/yoga-1", "")]);
    store.set_app_stats(AppStats {
        total_videos: 99,
        ..Default::default()
    });
    store.save_if_changed().await.unwrap();

    let raw = std::fs::read_to_string(file.path()).unwrap();
    assert!(raw.contains("\"theme\": \"dark\""));
    assert!(!raw.contains("isLoading"));
    assert!(!raw.contains("selected"));
    assert!(!raw.contains("Bad Gateway"));
    assert!(!raw.contains("featured"));

    let reopened = AppStore::open(file).await.unwrap();
    assert!(!reopened.state().is_loading);
    assert!(reopened.state().selected_category.is_none());
    assert_eq!(reopened.state().app_stats.total_videos, 0);
}

#[tokio::test]
async fn test_unchanged_store_does_not_write() {
    let temp = TempDir::new().unwrap();
    let file = prefs(&temp);

    let mut store = AppStore::open(file.clone()).await.unwrap();
    assert!(!store.save_if_changed().await.unwrap());
    assert!(!file.path().exists());

    store.toggle_theme();
    store.toggle_theme();
    assert!(!store.save_if_changed().await.unwrap());
}

#[tokio::test]
async fn test_last_write_wins() {
    let temp = TempDir::new().unwrap();

    let mut first = AppStore::open(prefs(&temp)).await.unwrap();
    let mut second = AppStore::open(prefs(&temp)).await.unwrap();

    first.set_language(Language::En);
    first.save_if_changed().await.unwrap();

    second.set_theme(Theme::Dark);
    second.save_if_changed().await.unwrap();

    let reopened = AppStore::open(prefs(&temp)).await.unwrap();
    assert_eq!(reopened.state().current_language, Language::He);
    assert_eq!(reopened.state().theme, Theme::Dark);
}

#[tokio::test]
async fn test_reset_preferences_clears_file() {
    let temp = TempDir::new().unwrap();
    let file = prefs(&temp);

    let mut store = AppStore::open(file.clone()).await.unwrap();
    store.add_favorite_video("a");
    store.save_if_changed().await.unwrap();
    assert!(file.path().exists());

    store.reset_preferences().await.unwrap();
    assert!(!file.path().exists());
    assert!(!store.has_unsaved_changes());
    assert!(!store.save_if_changed().await.unwrap());

    let reopened = AppStore::open(file).await.unwrap();
    assert!(reopened.state().favorite_videos.is_empty());
}

#[tokio::test]
async fn test_corrupt_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let file = prefs(&temp);
    std::fs::write(file.path(), "\u{0}garbage{{").unwrap();

    let mut store = AppStore::open(file.clone()).await.unwrap();
    assert_eq!(store.state().current_language, Language::He);
    assert!(store.state().favorite_videos.is_empty());

    store.set_theme(Theme::Dark);
    assert!(store.save_if_changed().await.unwrap());

    let reopened = AppStore::open(file).await.unwrap();
    assert_eq!(reopened.state().theme, Theme::Dark);
}

#[tokio::test]
async fn test_in_memory_store_never_writes() {
    let mut store = AppStore::new();
    store.set_theme(Theme::Dark);
    assert!(store.has_unsaved_changes());
    assert!(!store.save_if_changed().await.unwrap());
}

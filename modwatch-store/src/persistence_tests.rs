//! State file round-trip and edge case tests.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use modwatch_core::{StateRepository, WatchState};

use crate::error::StoreError;
use crate::persistence::{load_json, save_json};
use crate::state_store::StateStore;

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("state.json");

    save_json(&nested_path, &serde_json::json!({"key": "value"}))
        .await
        .unwrap();

    assert!(nested_path.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_created_directory_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("modwatch");

    save_json(&dir.join("state.json"), &WatchState::default())
        .await
        .unwrap();

    let mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o700);
}

#[tokio::test]
async fn test_load_nonexistent_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let loaded: Option<WatchState> = load_json(&temp_dir.path().join("missing.json"))
        .await
        .unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_save_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");

    save_json(&path, &WatchState::default()).await.unwrap();

    let names: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["state.json".to_string()]);
}

// ============================================================================
// StateStore Tests
// ============================================================================

#[tokio::test]
async fn test_missing_state_file_yields_default() {
    let temp_dir = TempDir::new().unwrap();
    let store = StateStore::new(temp_dir.path().join("state.json"));

    let state = store.load().await.unwrap();
    assert_eq!(state, WatchState::default());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_state_roundtrip_through_repository() {
    let temp_dir = TempDir::new().unwrap();
    let store = StateStore::new(temp_dir.path().join("state.json"));

    let mut state = WatchState::new();
    state.set_baseline(128, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    StateRepository::save(&store, &state).await.unwrap();

    let loaded = StateRepository::load(&store).await.unwrap();
    assert_eq!(loaded, state);
}

#[tokio::test]
async fn test_state_file_format() {
    let temp_dir = TempDir::new().unwrap();
    let store = StateStore::new(temp_dir.path().join("state.json"));

    let state = WatchState {
        last_count: Some(42),
        last_checked: Some(1_700_000_000),
    };
    store.save(&state).await.unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"last_count": 42, "last_checked": 1_700_000_000})
    );
}

#[tokio::test]
async fn test_reads_file_without_last_checked() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    std::fs::write(&path, r#"{"last_count": 9}"#).unwrap();

    let state = StateStore::new(&path).load().await.unwrap();
    assert_eq!(state.last_count, Some(9));
    assert_eq!(state.last_checked, None);
}

#[tokio::test]
async fn test_corrupt_state_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = StateStore::new(&path).load().await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
    assert!(err.to_string().contains("state.json"));

    // The bad file is left for the operator to inspect.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
}

#[tokio::test]
async fn test_save_overwrites_previous_state() {
    let temp_dir = TempDir::new().unwrap();
    let store = StateStore::new(temp_dir.path().join("state.json"));

    store
        .save(&WatchState {
            last_count: Some(10),
            last_checked: Some(1),
        })
        .await
        .unwrap();
    store
        .save(&WatchState {
            last_count: Some(13),
            last_checked: Some(2),
        })
        .await
        .unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.last_count, Some(13));
    assert_eq!(loaded.last_checked, Some(2));
}

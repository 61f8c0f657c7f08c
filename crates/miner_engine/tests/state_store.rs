use std::fs;

use miner_core::PublicationState;
use miner_engine::{StateError, StateStore, DEFAULT_STATE_FILENAME};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

mod common;

#[test]
fn missing_file_yields_fresh_state_with_fallback_cursor() {
    common::init_logging();
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().to_path_buf(), DEFAULT_STATE_FILENAME, 547);

    let state = store.load().unwrap();
    assert!(state.published_docs.is_empty());
    assert_eq!(state.next_story_num, 547);
    assert!(!store.path().exists());
}

#[test]
fn saved_state_loads_back() {
    common::init_logging();
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().to_path_buf(), DEFAULT_STATE_FILENAME, 1);

    let mut state = PublicationState::default();
    state.mark_published("2024-00001").unwrap();
    state.mark_published("2024-00002").unwrap();
    store.save(&state).unwrap();

    assert_eq!(store.load().unwrap(), state);
}

#[test]
fn file_uses_the_documented_json_shape() {
    common::init_logging();
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().to_path_buf(), "state.json", 1);

    let mut state = PublicationState::starting_at(40);
    state.mark_published("2024-00001").unwrap();
    let path = store.save(&state).unwrap();

    let text = fs::read_to_string(path).unwrap();
    assert_eq!(
        text,
        "{\n  \"published_docs\": [\n    \"2024-00001\"\n  ],\n  \"next_story_num\": 41\n}\n"
    );
}

#[test]
fn corrupt_file_is_an_error_not_a_reset() {
    common::init_logging();
    let temp = TempDir::new().unwrap();
    let store = StateStore::new(temp.path().to_path_buf(), DEFAULT_STATE_FILENAME, 1);
    fs::write(store.path(), "{\"published_docs\": [").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, StateError::Corrupt { .. }));
}

//! Integration tests for SessionStore with change events
//!
//! These tests verify that the SessionStore correctly:
//! - Emits change events on edits
//! - Supports multiple subscribers
//! - Handles concurrent edits from multiple threads
//! - Persists every committed edit and nothing else

use rtn_settings::models::{
    Attribute, AttributeOverride, CategoryOverrideSet, ProfileName, RankCategory,
    ResolutionConfig, TitleCase,
};
use rtn_settings::services::ConfigCodec;
use rtn_settings::state::{MemoryBlobStore, SessionStore};
use rtn_settings::{AppConfig, ConfigChange};
use std::sync::Arc;
use std::thread;
use tokio::time::{Duration, timeout};

fn new_session() -> (SessionStore<MemoryBlobStore>, MemoryBlobStore) {
    let store = MemoryBlobStore::new();
    let session = SessionStore::load(store.clone()).unwrap();
    (session, store)
}

#[tokio::test]
async fn test_change_events_emitted() {
    let (session, _store) = new_session();
    let mut rx = session.subscribe();

    session.set_core_settings(true, ProfileName::Anime).unwrap();

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert_eq!(
        event,
        ConfigChange::ProfileChanged {
            profile: ProfileName::Anime
        }
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let (session, _store) = new_session();
    let mut rx1 = session.subscribe();
    let mut rx2 = session.subscribe();

    session.add_title().unwrap();

    let event1 = timeout(Duration::from_millis(100), rx1.recv())
        .await
        .expect("Timeout on rx1")
        .expect("rx1 closed");

    let event2 = timeout(Duration::from_millis(100), rx2.recv())
        .await
        .expect("Timeout on rx2")
        .expect("rx2 closed");

    assert_eq!(event1, ConfigChange::TitlesChanged { count: 2 });
    assert_eq!(event2, event1);
}

#[tokio::test]
async fn test_events_arrive_in_edit_order() {
    let (session, _store) = new_session();
    let mut rx = session.subscribe();

    session.set_filters("", "CAM", "").unwrap();
    session.set_resolutions(ResolutionConfig {
        r2160p: true,
        ..ResolutionConfig::default()
    })
    .unwrap();
    session.set_languages("en", "", "").unwrap();

    let mut received = Vec::new();
    for _ in 0..3 {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout")
            .expect("Channel closed");
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            ConfigChange::FiltersChanged,
            ConfigChange::ResolutionsChanged,
            ConfigChange::LanguagesChanged,
        ]
    );
}

#[tokio::test]
async fn test_failed_edit_emits_nothing() {
    let (session, store) = new_session();
    let before = store.contents();
    let mut rx = session.subscribe();

    assert!(session.remove_title(0).is_err());
    assert!(session.import_settings("[]").is_err());

    let result = timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(result.is_err(), "No event expected after a refused edit");
    assert_eq!(store.contents(), before);
}

#[test]
fn test_every_commit_is_persisted() {
    let (session, store) = new_session();

    let mut video = CategoryOverrideSet::defaults_for(RankCategory::Quality);
    video.insert(
        Attribute::Webdl,
        AttributeOverride {
            fetch: false,
            rank: 0,
            use_custom_rank: false,
        },
    );
    session.set_category_ranks(RankCategory::Quality, video).unwrap();
    session
        .update_title(0, TitleCase::new("Movie.2021.2160p.WEB-DL", "Movie"))
        .unwrap();

    let persisted = ConfigCodec::decode(&store.contents().unwrap()).unwrap();
    assert_eq!(persisted, session.config());
    assert!(
        !persisted
            .settings_model
            .custom_ranks
            .lookup(Attribute::Webdl)
            .unwrap()
            .fetch
    );
    assert_eq!(persisted.titles[0].raw_title, "Movie.2021.2160p.WEB-DL");
}

#[test]
fn test_concurrent_edits() {
    let (session, store) = new_session();
    let session = Arc::new(session);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                session.add_title().unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(session.config().titles.len(), 9);
    let persisted = ConfigCodec::decode(&store.contents().unwrap()).unwrap();
    assert_eq!(persisted.titles.len(), 9);
}

#[test]
fn test_clones_share_state() {
    let (session, _store) = new_session();
    let other = session.clone();

    other.set_core_settings(false, ProfileName::Web).unwrap();

    let config = session.config();
    assert!(!config.remove_trash);
    assert_eq!(config.settings_model.profile, ProfileName::Web);
}

#[test]
fn test_reset_restores_defaults() {
    let (session, _store) = new_session();
    session.set_filters("2160p", "CAM", "/HDR/").unwrap();
    session.add_title().unwrap();

    assert_eq!(session.reset().unwrap(), vec![ConfigChange::ConfigReplaced]);
    assert_eq!(session.config(), AppConfig::generated());
}

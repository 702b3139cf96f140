//! Fetch and persistence failures, manual fetch and operator reset.

use super::harness::{
    edit, feed_config, record, JsonBodySource, RecordingDirectory, Script, TestHarness,
};
use crate::{AnnouncerError, ChangeAnnouncer, ChangeKind, Destination, Watermark};
use change_feed_client::{FetchError, FetchErrorKind};
use std::sync::Arc;
use watermark_store::{MemoryWatermarkStore, WatermarkStore};

fn unavailable() -> FetchError {
    FetchError::Status {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

#[tokio::test]
async fn transport_failure_leaves_everything_untouched() {
    let h = TestHarness::new(1000);
    h.source.push(Script::Fail(unavailable()));

    let err = h.announcer.run_cycle().await.unwrap_err();

    match err {
        AnnouncerError::Fetch(fetch) => assert_eq!(fetch.kind(), FetchErrorKind::Transport),
        other => panic!("expected fetch error, got {other:?}"),
    }
    assert!(h.directory.delivered().is_empty());
    assert_eq!(h.announcer.watermark(), Watermark::new(1000));
    assert_eq!(h.store.save_count(), 0);
}

#[tokio::test]
async fn parse_failure_leaves_everything_untouched() {
    let h = TestHarness::new(1000);
    h.source.push(Script::Fail(FetchError::Parse(
        "missing query.recentchanges".to_string(),
    )));

    let err = h.announcer.run_cycle().await.unwrap_err();

    assert!(matches!(err, AnnouncerError::Fetch(ref fetch) if fetch.is_parse()));
    assert!(h.directory.delivered().is_empty());
    assert_eq!(h.announcer.watermark(), Watermark::new(1000));
}

#[tokio::test]
async fn next_cycle_after_a_failure_catches_up() {
    let h = TestHarness::new(1000);
    h.source.push(Script::Fail(unavailable()));
    h.source.respond(vec![edit(1003, "B"), edit(1001, "A")]);

    assert!(h.announcer.run_cycle().await.is_err());
    let report = h.announcer.run_cycle().await.unwrap();

    assert_eq!(report.announced, 2);
    assert_eq!(h.announcer.watermark(), Watermark::new(1003));
}

#[tokio::test]
async fn repeated_batch_is_announced_once() {
    let h = TestHarness::new(0);
    let batch = vec![edit(12, "B"), edit(11, "A")];
    h.source.respond(batch.clone());
    h.source.respond(batch);

    let first = h.announcer.run_cycle().await.unwrap();
    let second = h.announcer.run_cycle().await.unwrap();

    assert_eq!(first.announced, 2);
    assert_eq!(second.announced, 0);
    assert_eq!(h.directory.lines_for("#wiki").len(), 2);
    // Nothing new, nothing to save.
    assert_eq!(h.store.save_count(), 1);
}

#[tokio::test]
async fn failed_save_keeps_in_memory_watermark_and_retries() {
    let h = TestHarness::new(1000);
    h.store.set_failing(true);
    h.source.respond(vec![edit(1005, "A")]);

    let report = h.announcer.run_cycle().await.unwrap();

    assert_eq!(report.announced, 1);
    assert!(!report.persisted);
    assert_eq!(h.announcer.watermark(), Watermark::new(1005));
    assert_eq!(h.announcer.persisted_watermark(), Watermark::new(1000));
    assert_eq!(h.store.load(), Watermark::new(1000));

    // Same batch again: no duplicate announcement, and the save is retried.
    h.store.set_failing(false);
    let report = h.announcer.run_cycle().await.unwrap();

    assert_eq!(report.announced, 0);
    assert!(report.persisted);
    assert_eq!(h.directory.lines_for("#wiki").len(), 1);
    assert_eq!(h.store.load(), Watermark::new(1005));
    assert_eq!(h.announcer.persisted_watermark(), Watermark::new(1005));
}

#[tokio::test]
async fn manual_fetch_does_not_advance_the_watermark() {
    let h = TestHarness::new(1000);
    h.source.respond(vec![
        record(1005, ChangeKind::Edit, "alice", "Home Page", ""),
        record(1002, ChangeKind::Created, "bob", "Draft", "wip"),
    ]);

    let lines = h.announcer.trigger_manual_fetch().await.unwrap();

    assert_eq!(
        lines,
        vec![
            "User bob created http://wiki.example/wiki/Draft - wip".to_string(),
            "User alice modified http://wiki.example/wiki/Home_Page".to_string(),
        ]
    );
    assert_eq!(h.announcer.watermark(), Watermark::new(1000));
    assert_eq!(h.store.save_count(), 0);
    assert!(h.directory.delivered().is_empty());

    // The scheduled path still announces the same changes.
    let report = h.announcer.run_cycle().await.unwrap();
    assert_eq!(report.announced, 2);
}

#[tokio::test]
async fn manual_fetch_surfaces_fetch_errors() {
    let h = TestHarness::new(0);
    h.source.push(Script::Fail(unavailable()));

    let err = h.announcer.trigger_manual_fetch().await.unwrap_err();

    assert!(err
        .to_string()
        .starts_with("Failed to fetch recent changes: Change feed returned HTTP 503"));
}

#[tokio::test]
async fn reset_forgets_announced_changes() {
    let h = TestHarness::new(0);
    h.source.respond(vec![edit(1005, "A")]);
    h.announcer.run_cycle().await.unwrap();
    assert_eq!(h.store.load(), Watermark::new(1005));

    h.announcer.reset_watermark().unwrap();

    assert_eq!(h.announcer.watermark(), Watermark::ZERO);
    assert_eq!(h.announcer.persisted_watermark(), Watermark::ZERO);
    assert_eq!(h.store.load(), Watermark::ZERO);

    let report = h.announcer.run_cycle().await.unwrap();
    assert_eq!(report.announced, 1);
    assert_eq!(h.directory.lines_for("#wiki").len(), 2);
}

#[tokio::test]
async fn failed_reset_keeps_the_watermark() {
    let h = TestHarness::new(1000);
    h.store.set_failing(true);

    let err = h.announcer.reset_watermark().unwrap_err();

    assert!(matches!(err, AnnouncerError::Persistence(_)));
    assert_eq!(h.announcer.watermark(), Watermark::new(1000));
}

#[test]
fn invalid_feed_config_is_rejected() {
    let mut feed = feed_config();
    feed.page_url_template = "http://wiki.example/wiki/".to_string();
    let h = TestHarness::new(0);

    let result = ChangeAnnouncer::new(
        feed,
        h.source.clone(),
        h.directory.clone(),
        Arc::new(MemoryWatermarkStore::new()),
    );

    assert!(matches!(result, Err(AnnouncerError::Config(_))));
}

#[tokio::test]
async fn revision_deleted_user_does_not_stall_the_feed() {
    let body = r#"{"query": {"recentchanges": [
        {"type": "edit", "title": "Secret", "userhidden": "", "timestamp": "1970-01-01T00:16:41Z"},
        {"type": "edit", "title": "Open", "user": "alice", "timestamp": "1970-01-01T00:16:50Z"}
    ]}}"#;
    let directory = Arc::new(RecordingDirectory::new(vec![Destination::new("#wiki", true)]));
    let announcer = ChangeAnnouncer::new(
        feed_config(),
        Arc::new(JsonBodySource::new(body)),
        directory.clone(),
        Arc::new(MemoryWatermarkStore::with_value(Watermark::new(1000))),
    )
    .unwrap();

    for _ in 0..3 {
        announcer.run_cycle().await.unwrap();
    }

    assert_eq!(
        directory.lines_for("#wiki"),
        vec![
            "User (username removed) modified http://wiki.example/wiki/Secret".to_string(),
            "User alice modified http://wiki.example/wiki/Open".to_string(),
        ]
    );
    assert_eq!(announcer.watermark(), Watermark::new(1010));
}

//! Playback session tests
//!
//! Timer behavior runs on a paused clock, so reload delays are exact and
//! the tests never sleep for real.

mod common;

use blipty_core::PlaybackStatus;
use blipty_playback::{
    PlaybackError, ReloadCause, RetryConfig, SessionConfig, SessionHandle, SessionStatus,
};
use common::*;
use std::time::Duration;
use tokio::time::Instant;

// ===== Initialization =====

#[tokio::test]
async fn test_initialize_missing_sink() {
    let mut harness = Harness::with(SessionConfig::default(), "other-sink", true);

    let err = harness.session.initialize().unwrap_err();

    assert!(matches!(err, PlaybackError::SinkNotFound(ref id) if id == "video-player"));
    assert!(err.is_initialization_error());
    assert!(!harness.session.is_initialized());
}

#[tokio::test]
async fn test_initialize_without_live_support() {
    let mut harness = Harness::with(SessionConfig::default(), "video-player", false);

    let err = harness.session.initialize().unwrap_err();

    assert!(matches!(err, PlaybackError::LivePlaybackUnsupported));
    assert!(!harness.session.is_initialized());
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let mut harness = Harness::new();

    harness.session.initialize().unwrap();
    harness.session.initialize().unwrap();

    assert_eq!(harness.journal.count("host.locate"), 1);
    assert_eq!(harness.journal.count("renderer.configure"), 1);
}

// ===== Loading =====

#[tokio::test]
async fn test_load_requires_initialize() {
    let mut harness = Harness::new();

    let err = harness.session.load(STREAM_URL).await.unwrap_err();

    assert!(matches!(err, PlaybackError::NotInitialized));
    assert_eq!(harness.factory.created(), 0);
}

#[tokio::test]
async fn test_load_attaches_plays_and_updates_store() {
    let harness = Harness::playing().await;

    assert_eq!(
        harness.journal.entries(),
        vec![
            "host.locate",
            "renderer.configure",
            "transport1.attach video-player_html5_api",
            "transport1.load",
            "transport1.play",
        ]
    );
    assert_eq!(harness.player.calls(), vec![format!("play_video {STREAM_URL}")]);
    assert_eq!(harness.store.state().state, PlaybackStatus::Playing);
    assert_eq!(harness.session.generation(), 1);
    assert_eq!(harness.session.current_url(), Some(STREAM_URL));

    let config = harness.factory.config(1);
    assert_eq!(config.url, STREAM_URL);
    assert!(config.is_live);
    assert!(!config.enable_stash_buffer);
    assert_eq!(config.stash_initial_size, 8 * 1024 * 1024);
}

#[tokio::test]
async fn test_buffer_size_follows_device_memory() {
    let config = SessionConfig {
        device_memory_gb: Some(16.0),
        ..SessionConfig::default()
    };
    let mut harness = Harness::with(config, "video-player", true);
    harness.session.initialize().unwrap();
    harness.session.load(STREAM_URL).await.unwrap();

    assert_eq!(harness.factory.config(1).stash_initial_size, 32 * 1024 * 1024);
}

#[tokio::test]
async fn test_load_tears_down_previous_transport() {
    let mut harness = Harness::playing().await;

    harness.session.load("http://provider.test/live/2.ts").await.unwrap();

    let entries = harness.journal.entries();
    let teardown = [
        "transport1.pause",
        "transport1.unload",
        "transport1.detach",
        "transport1.destroy",
    ];
    let positions: Vec<usize> = teardown
        .iter()
        .map(|step| entries.iter().position(|e| e == step).unwrap())
        .collect();
    let attach_second = entries
        .iter()
        .position(|e| e.starts_with("transport2.attach"))
        .unwrap();

    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(positions[3] < attach_second);
    assert_eq!(harness.session.generation(), 2);
}

#[tokio::test]
async fn test_events_from_replaced_transport_are_dropped() {
    let mut harness = Harness::playing().await;
    let old_events = harness.factory.sender(1);

    harness.session.load(STREAM_URL).await.unwrap();

    assert!(old_events.send(transport_error()).is_err());
    assert_eq!(harness.session.pending_reload(), None);
    assert_eq!(harness.session.retry_attempts(), 0);
}

// ===== Stall recovery =====

#[tokio::test(start_paused = true)]
async fn test_stall_then_recovery_cancels_reload() {
    let mut harness = Harness::playing().await;
    let events = harness.factory.sender(1);

    events.send(stalled()).unwrap();
    events.send(stalled()).unwrap();
    events.send(flowing()).unwrap();

    assert!(harness.session.step().await.unwrap());
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Stall));

    assert!(harness.session.step().await.unwrap());
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Stall));

    assert!(harness.session.step().await.unwrap());
    assert_eq!(harness.session.pending_reload(), None);
    assert_eq!(harness.session.retry_attempts(), 0);

    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(harness.factory.created(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stall_reloads_after_delay() {
    let mut harness = Harness::playing().await;
    harness.factory.sender(1).send(stalled()).unwrap();

    harness.session.step().await.unwrap();
    let armed_at = Instant::now();

    harness.session.step().await.unwrap();

    let waited = armed_at.elapsed();
    assert!(waited >= Duration::from_millis(1000) && waited < Duration::from_millis(1010));
    assert_eq!(harness.factory.created(), 2);
    assert_eq!(harness.session.generation(), 2);
    assert_eq!(harness.session.pending_reload(), None);
    assert_eq!(harness.store.state().state, PlaybackStatus::Playing);
}

// ===== Error recovery =====

#[tokio::test(start_paused = true)]
async fn test_errors_retry_with_backoff_then_give_up() {
    let mut harness = Harness::playing().await;
    let start = Instant::now();

    for attempt in 1..=3u32 {
        harness
            .factory
            .sender(attempt as usize)
            .send(transport_error())
            .unwrap();

        harness.session.step().await.unwrap();
        assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));
        assert_eq!(harness.session.retry_attempts(), attempt);

        harness.session.step().await.unwrap();
        assert_eq!(harness.factory.created(), attempt as usize + 1);
    }

    // 2s + 4s + 8s
    let waited = start.elapsed();
    assert!(waited >= Duration::from_secs(14) && waited < Duration::from_millis(14_050));

    harness.factory.sender(4).send(transport_error()).unwrap();
    let err = harness.session.step().await.unwrap_err();

    assert!(matches!(err, PlaybackError::RetriesExhausted { attempts: 3 }));
    assert_eq!(harness.store.state().state, PlaybackStatus::Error);
    assert_eq!(harness.journal.count("transport4.destroy"), 1);
    assert_eq!(harness.journal.count("renderer.dispose"), 1);
    assert!(!harness.session.is_initialized());
    assert!(harness.session.next_activity().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_error_supersedes_pending_stall() {
    let mut harness = Harness::playing().await;
    let events = harness.factory.sender(1);

    events.send(stalled()).unwrap();
    harness.session.step().await.unwrap();
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Stall));

    events.send(transport_error()).unwrap();
    harness.session.step().await.unwrap();
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));
    assert_eq!(harness.session.retry_attempts(), 1);

    // A stall never replaces the error reload
    events.send(stalled()).unwrap();
    harness.session.step().await.unwrap();
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));

    // Recovery keeps the error reload but clears the counter
    events.send(flowing()).unwrap();
    harness.session.step().await.unwrap();
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));
    assert_eq!(harness.session.retry_attempts(), 0);

    harness.session.step().await.unwrap();
    assert_eq!(harness.factory.created(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_errors_schedule_one_reload() {
    let mut harness = Harness::playing().await;
    let events = harness.factory.sender(1);

    events.send(transport_error()).unwrap();
    events.send(transport_error()).unwrap();
    harness.session.step().await.unwrap();
    harness.session.step().await.unwrap();

    assert_eq!(harness.session.retry_attempts(), 1);
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));
}

#[tokio::test(start_paused = true)]
async fn test_failed_reload_counts_as_error() {
    let mut harness = Harness::playing().await;
    harness.factory.fail_next_loads(1);
    harness.factory.sender(1).send(stalled()).unwrap();

    harness.session.step().await.unwrap();
    harness.session.step().await.unwrap();

    assert_eq!(harness.factory.created(), 2);
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));
    assert_eq!(harness.session.retry_attempts(), 1);

    harness.session.step().await.unwrap();
    assert_eq!(harness.factory.created(), 3);
    assert_eq!(harness.store.state().state, PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_user_load_starts_fresh_retry_budget() {
    let mut harness = Harness::playing().await;
    harness.factory.sender(1).send(transport_error()).unwrap();
    harness.session.step().await.unwrap();
    assert_eq!(harness.session.retry_attempts(), 1);

    harness
        .session
        .load("http://provider.test/live/2.ts")
        .await
        .unwrap();

    assert_eq!(harness.session.retry_attempts(), 0);
    assert_eq!(harness.session.pending_reload(), None);
}

#[tokio::test(start_paused = true)]
async fn test_new_stream_after_giving_up_gets_full_retries() {
    let mut harness = Harness::playing().await;
    for n in 1..=3usize {
        harness.factory.sender(n).send(transport_error()).unwrap();
        harness.session.step().await.unwrap();
        harness.session.step().await.unwrap();
    }
    harness.factory.sender(4).send(transport_error()).unwrap();
    assert!(harness.session.step().await.is_err());
    assert_eq!(harness.session.retry_attempts(), 0);

    harness.session.initialize().unwrap();
    harness
        .session
        .load("http://provider.test/live/2.ts")
        .await
        .unwrap();
    harness.factory.sender(5).send(transport_error()).unwrap();

    harness.session.step().await.unwrap();
    assert_eq!(harness.session.retry_attempts(), 1);
    assert_eq!(harness.session.pending_reload(), Some(ReloadCause::Error));
}

// ===== Destroy =====

#[tokio::test(start_paused = true)]
async fn test_destroy_is_idempotent_and_resets_store() {
    let mut harness = Harness::playing().await;
    harness.store.set_volume(0.3).await.unwrap();
    harness.factory.sender(1).send(stalled()).unwrap();
    harness.session.step().await.unwrap();

    harness.session.destroy();
    harness.session.destroy();

    assert_eq!(harness.session.pending_reload(), None);
    assert_eq!(harness.journal.count("transport1.destroy"), 1);
    assert_eq!(harness.journal.count("renderer.pause"), 1);
    assert_eq!(harness.journal.count("renderer.reset"), 1);
    assert_eq!(harness.journal.count("renderer.dispose"), 1);
    assert_eq!(harness.store.state(), blipty_core::PlayerState::default());
    assert!(harness.session.next_activity().await.is_none());
}

// ===== Session task =====

#[tokio::test(start_paused = true)]
async fn test_session_handle_drives_reloads() {
    let harness = Harness::new();
    let factory = harness.factory.clone();
    let journal = harness.journal.clone();
    let store = harness.store.clone();

    let handle = SessionHandle::spawn(harness.session).unwrap();
    handle.load(STREAM_URL).await.unwrap();
    assert_eq!(store.state().state, PlaybackStatus::Playing);

    factory.sender(1).send(stalled()).unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(factory.created(), 2);

    handle.destroy().await;
    assert_eq!(journal.count("renderer.dispose"), 1);
    assert_eq!(store.state(), blipty_core::PlayerState::default());
}

#[tokio::test]
async fn test_session_handle_requires_sink() {
    let harness = Harness::with(SessionConfig::default(), "other-sink", true);

    let result = SessionHandle::spawn(harness.session);

    assert!(matches!(result, Err(PlaybackError::SinkNotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn test_session_handle_reports_exhausted_retries() {
    let config = SessionConfig {
        retry: RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        },
        ..SessionConfig::default()
    };
    let harness = Harness::with(config, "video-player", true);
    let factory = harness.factory.clone();
    let store = harness.store.clone();

    let handle = SessionHandle::spawn(harness.session).unwrap();
    assert_eq!(handle.status(), SessionStatus::Idle);
    let mut status = handle.watch_status();

    handle.load(STREAM_URL).await.unwrap();
    assert_eq!(handle.status(), SessionStatus::Playing);

    factory.sender(1).send(transport_error()).unwrap();
    tokio::time::timeout(
        Duration::from_secs(1),
        status.wait_for(|s| matches!(s, SessionStatus::Failed { .. })),
    )
    .await
    .expect("failure not reported")
    .unwrap();
    assert_eq!(handle.status(), SessionStatus::Failed { attempts: 0 });
    assert_eq!(store.state().state, PlaybackStatus::Error);

    handle.load(STREAM_URL).await.unwrap();
    assert_eq!(handle.status(), SessionStatus::Playing);

    let closed = handle.watch_status();
    handle.destroy().await;
    assert_eq!(*closed.borrow(), SessionStatus::Closed);
}

//! Observable player state
//!
//! [`PlayerStore`] mirrors the backend player: commands are sent to the
//! [`PlayerBackend`] first and the local state changes only once the
//! backend accepted them. Push-events from the backend update the same
//! state.
//!
//! Every mutation carries a sequence ticket. Commands take theirs before
//! the backend call, push-events when they are received. Each [`Field`]
//! remembers the ticket of its last write, and a mutation only writes the
//! fields it has a newer ticket for. A slow command can never overwrite a
//! newer event or command on the same field, while writes to other fields
//! never hide it.

use crate::{PlaybackError, Result};
use blipty_core::{
    PlaybackStatus, PlayerBackend, PlayerEvent, PlayerState, StreamInfo, StreamQuality,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Independently sequenced parts of the player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Status,
    /// Position, duration and liveness
    Timeline,
    Volume,
    Quality,
    StreamInfo,
}

impl Field {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        self as usize
    }
}

/// Fields a mutation holds the newest ticket for
#[derive(Debug, Clone, Copy)]
struct Fresh(u8);

impl Fresh {
    fn has(self, field: Field) -> bool {
        self.0 & (1 << field.index()) != 0
    }
}

#[derive(Debug, Default)]
struct Cached {
    stream_info: Option<StreamInfo>,
    current_quality: Option<StreamQuality>,
    buffering_percent: Option<i32>,
    next_ticket: u64,
    applied: [u64; Field::COUNT],
}

/// Player state shared by the UI, the playback session and the event listener
pub struct PlayerStore {
    backend: Arc<dyn PlayerBackend>,
    state: watch::Sender<PlayerState>,
    cached: Mutex<Cached>,
    listening: Arc<AtomicBool>,
}

impl PlayerStore {
    pub fn new(backend: Arc<dyn PlayerBackend>) -> Self {
        let (state, _) = watch::channel(PlayerState::default());
        Self {
            backend,
            state,
            cached: Mutex::new(Cached::default()),
            listening: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PlayerState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.state.subscribe()
    }

    // ===== Commands =====

    pub async fn play(&self, url: &str) -> Result<()> {
        let ticket = self.ticket();
        self.backend
            .play_video(url)
            .await
            .map_err(|e| log_backend_failure("play_video", e))?;
        self.apply(ticket, &[Field::Status], |_, _, state| {
            state.state = PlaybackStatus::Playing;
        });
        Ok(())
    }

    pub async fn pause(&self) -> Result<()> {
        let ticket = self.ticket();
        self.backend
            .pause_video()
            .await
            .map_err(|e| log_backend_failure("pause_video", e))?;
        self.apply(ticket, &[Field::Status], |_, _, state| {
            state.state = PlaybackStatus::Paused;
        });
        Ok(())
    }

    pub async fn resume(&self) -> Result<()> {
        let ticket = self.ticket();
        self.backend
            .resume_video()
            .await
            .map_err(|e| log_backend_failure("resume_video", e))?;
        self.apply(ticket, &[Field::Status], |_, _, state| {
            state.state = PlaybackStatus::Playing;
        });
        Ok(())
    }

    /// Stop playback and rewind; volume is kept
    pub async fn stop(&self) -> Result<()> {
        let ticket = self.ticket();
        self.backend
            .stop_video()
            .await
            .map_err(|e| log_backend_failure("stop_video", e))?;
        self.apply(ticket, &[Field::Status, Field::Timeline], |fresh, _, state| {
            if fresh.has(Field::Status) {
                state.state = PlaybackStatus::Stopped;
            }
            if fresh.has(Field::Timeline) {
                state.position = 0.0;
            }
        });
        Ok(())
    }

    /// Set volume, clamped to `0.0..=1.0`
    pub async fn set_volume(&self, volume: f64) -> Result<()> {
        if volume.is_nan() {
            return Err(PlaybackError::InvalidInput(
                "volume must be a number".to_string(),
            ));
        }
        let volume = volume.clamp(0.0, 1.0);

        let ticket = self.ticket();
        self.backend
            .set_volume(volume)
            .await
            .map_err(|e| log_backend_failure("set_volume", e))?;
        self.apply(ticket, &[Field::Volume], |_, _, state| state.volume = volume);
        Ok(())
    }

    /// Seek within a stream of known duration
    ///
    /// Live streams and streams without a duration ignore the request
    /// without contacting the backend.
    pub async fn seek(&self, position: f64) -> Result<()> {
        let Some(duration) = self.seekable_duration() else {
            debug!(position, "Ignoring seek on live stream");
            return Ok(());
        };
        if !position.is_finite() {
            return Err(PlaybackError::InvalidInput(
                "seek position must be finite".to_string(),
            ));
        }
        let position = position.clamp(0.0, duration);

        let ticket = self.ticket();
        self.backend
            .seek(position)
            .await
            .map_err(|e| log_backend_failure("seek", e))?;
        self.apply(ticket, &[Field::Timeline], |_, _, state| {
            state.position = position;
        });
        Ok(())
    }

    pub async fn set_quality(&self, quality: StreamQuality) -> Result<()> {
        let ticket = self.ticket();
        self.backend
            .set_quality(&quality)
            .await
            .map_err(|e| log_backend_failure("set_quality", e))?;
        self.apply(ticket, &[Field::Quality], |_, cached, _| {
            cached.current_quality = Some(quality);
        });
        Ok(())
    }

    /// Refresh stream info from the backend and copy duration and position
    pub async fn update_stream_info(&self) -> Result<StreamInfo> {
        let ticket = self.ticket();
        let info = self
            .backend
            .get_stream_info()
            .await
            .map_err(|e| log_backend_failure("get_stream_info", e))?;

        let cached_info = info.clone();
        self.apply(
            ticket,
            &[Field::Timeline, Field::StreamInfo],
            move |fresh, cached, state| {
                if fresh.has(Field::Timeline) {
                    state.duration = cached_info.duration;
                    state.position = cached_info.position;
                    state.is_live = cached_info.is_live();
                }
                if fresh.has(Field::StreamInfo) {
                    cached.stream_info = Some(cached_info);
                }
            },
        );
        Ok(info)
    }

    // ===== Accessors =====

    pub fn current_quality(&self) -> Option<StreamQuality> {
        self.cached().current_quality
    }

    /// Qualities offered by the current stream, empty before stream info is known
    pub fn available_qualities(&self) -> Vec<StreamQuality> {
        self.cached()
            .stream_info
            .as_ref()
            .map(|info| info.qualities.clone())
            .unwrap_or_default()
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.cached().stream_info.clone()
    }

    /// Last buffering progress reported by the backend
    pub fn buffering_percent(&self) -> Option<i32> {
        self.cached().buffering_percent
    }

    // ===== Local transitions =====

    /// Restore defaults and forget cached stream info and quality
    ///
    /// Commands still in flight are dropped when they resolve.
    pub fn reset(&self) {
        let mut cached = self.cached();
        cached.next_ticket += 1;
        cached.applied = [cached.next_ticket; Field::COUNT];
        cached.stream_info = None;
        cached.current_quality = None;
        cached.buffering_percent = None;
        self.state.send_replace(PlayerState::default());
    }

    /// Enter the error state after a terminal playback failure
    pub fn mark_failed(&self) {
        let ticket = self.ticket();
        self.apply(ticket, &[Field::Status], |_, _, state| {
            state.state = PlaybackStatus::Error;
        });
    }

    // ===== Push-events =====

    /// Apply a backend push-event, stamped with a ticket on receipt
    pub fn apply_event(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::StateChanged { state } => {
                let Some(status) = PlaybackStatus::from_str(&state) else {
                    warn!(state = %state, "Ignoring unknown player state");
                    return;
                };
                let ticket = self.ticket();
                self.apply(ticket, &[Field::Status], |_, _, s| s.state = status);
            }
            PlayerEvent::BufferingProgress { percent } => {
                self.cached().buffering_percent = Some(percent.clamp(0, 100));
            }
            PlayerEvent::QualityChanged { quality } => {
                let ticket = self.ticket();
                self.apply(ticket, &[Field::Quality], |_, cached, _| {
                    cached.current_quality = Some(quality);
                });
            }
            PlayerEvent::Error { error } => {
                error!(code = error.code, message = %error.message, "Player reported an error");
                let ticket = self.ticket();
                self.apply(ticket, &[Field::Status], |_, _, s| {
                    s.state = PlaybackStatus::Error;
                });
            }
            PlayerEvent::EndOfStream => {
                let ticket = self.ticket();
                self.apply(ticket, &[Field::Status], |_, _, s| {
                    s.state = PlaybackStatus::Stopped;
                });
            }
        }
    }

    /// Start applying the backend's push-events
    ///
    /// Only one subscription may exist at a time. Dropping or releasing the
    /// returned handle stops the listener.
    pub fn listen(self: &Arc<Self>) -> Result<EventSubscription> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(PlaybackError::AlreadyListening);
        }

        let mut events = self.backend.events();
        let store = Arc::clone(self);

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => store.apply_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Player event listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Player event stream closed");
                        break;
                    }
                }
            }
        });

        debug!("Listening to player events");

        Ok(EventSubscription {
            task,
            listening: Arc::clone(&self.listening),
        })
    }

    // ===== Internals =====

    fn cached(&self) -> MutexGuard<'_, Cached> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ticket(&self) -> u64 {
        let mut cached = self.cached();
        cached.next_ticket += 1;
        cached.next_ticket
    }

    /// Run `mutate` for the `fields` that `ticket` is newer on
    ///
    /// `mutate` must only write the fields marked fresh. Nothing runs when
    /// every field already saw a newer write.
    fn apply(
        &self,
        ticket: u64,
        fields: &[Field],
        mutate: impl FnOnce(Fresh, &mut Cached, &mut PlayerState),
    ) {
        let mut cached = self.cached();
        let mut fresh = 0u8;
        for &field in fields {
            let applied = &mut cached.applied[field.index()];
            if ticket > *applied {
                *applied = ticket;
                fresh |= 1 << field.index();
            }
        }

        if fresh == 0 {
            debug!(ticket, ?fields, "Dropping stale player state update");
            return;
        }

        self.state
            .send_modify(|state| mutate(Fresh(fresh), &mut *cached, state));
    }

    fn seekable_duration(&self) -> Option<f64> {
        let state = self.state.borrow();
        match state.duration {
            Some(duration) if !state.is_live && duration > 0.0 => Some(duration),
            _ => None,
        }
    }
}

fn log_backend_failure(command: &str, err: blipty_core::BliptyError) -> PlaybackError {
    error!(command, error = %err, "Player command failed");
    PlaybackError::Backend(err)
}

/// Handle to the push-event listener started by [`PlayerStore::listen`]
pub struct EventSubscription {
    task: JoinHandle<()>,
    listening: Arc<AtomicBool>,
}

impl EventSubscription {
    /// Stop listening and wait for the listener task to finish
    pub async fn release(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.task.abort();
        self.listening.store(false, Ordering::SeqCst);
    }
}

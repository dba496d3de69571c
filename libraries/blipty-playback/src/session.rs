//! Playback session
//!
//! A [`PlaybackSession`] binds a live transport to one video sink and keeps
//! it playing. Transport errors are retried with exponential backoff; a
//! stalled download (zero speed) schedules a reload that is cancelled as
//! soon as data flows again.
//!
//! Both recovery paths share one pending-reload slot, so a session never has
//! more than one reload scheduled. An error replaces a pending stall reload;
//! a stall never replaces a pending error reload.
//!
//! Each load, user-requested or a reload, bumps the session generation and
//! opens a fresh event channel. Events still queued from a torn-down
//! transport are dropped with its channel. A user `load` also starts a fresh
//! retry budget; reloads keep counting against the current one.

use crate::buffer::calculate_buffer_size;
use crate::retry::{RetryConfig, RetryStrategy};
use crate::store::PlayerStore;
use crate::transport::{
    RenderHost, Renderer, RendererOptions, Transport, TransportConfig, TransportEvent,
    TransportFactory,
};
use crate::{PlaybackError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

/// Session settings
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Identifier of the video sink to render into
    pub video_sink_id: String,
    pub retry: RetryConfig,
    /// Device memory in GB, when the platform reports it
    pub device_memory_gb: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            video_sink_id: "video-player".to_string(),
            retry: RetryConfig::default(),
            device_memory_gb: None,
        }
    }
}

/// What armed the pending reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadCause {
    Error,
    Stall,
}

#[derive(Debug, Clone, Copy)]
struct PendingReload {
    cause: ReloadCause,
    deadline: Instant,
}

/// Something the session has to react to
#[derive(Debug)]
pub enum Activity {
    Event(TransportEvent),
    ReloadDue,
    /// The current transport dropped its event sender
    EventsClosed,
}

pub struct PlaybackSession {
    config: SessionConfig,
    host: Arc<dyn RenderHost>,
    factory: Arc<dyn TransportFactory>,
    store: Arc<PlayerStore>,
    retry: RetryStrategy,
    renderer: Option<Box<dyn Renderer>>,
    transport: Option<Box<dyn Transport>>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
    url: Option<String>,
    pending: Option<PendingReload>,
    generation: u64,
}

impl PlaybackSession {
    pub fn new(
        config: SessionConfig,
        host: Arc<dyn RenderHost>,
        factory: Arc<dyn TransportFactory>,
        store: Arc<PlayerStore>,
    ) -> Self {
        let retry = RetryStrategy::new(config.retry);
        Self {
            config,
            host,
            factory,
            store,
            retry,
            renderer: None,
            transport: None,
            events: None,
            url: None,
            pending: None,
            generation: 0,
        }
    }

    /// Locate the video sink and configure its renderer for live playback
    ///
    /// Calling it again after success is a no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.renderer.is_some() {
            return Ok(());
        }

        let sink_id = &self.config.video_sink_id;
        let mut renderer = self
            .host
            .locate(sink_id)
            .ok_or_else(|| PlaybackError::SinkNotFound(sink_id.clone()))?;

        if !self.factory.live_playback_supported() {
            return Err(PlaybackError::LivePlaybackUnsupported);
        }

        renderer.configure(&RendererOptions::live());
        self.renderer = Some(renderer);

        info!(sink = %sink_id, "Playback session initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.renderer.is_some()
    }

    /// Replace the current transport with one playing `url`
    ///
    /// Starts a fresh retry budget.
    pub async fn load(&mut self, url: &str) -> Result<()> {
        if self.renderer.is_none() {
            return Err(PlaybackError::NotInitialized);
        }

        self.retry.reset();
        self.start(url).await
    }

    async fn start(&mut self, url: &str) -> Result<()> {
        if self.renderer.is_none() {
            return Err(PlaybackError::NotInitialized);
        }

        self.pending = None;
        self.teardown_transport();

        self.generation += 1;
        self.url = Some(url.to_string());

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let config = TransportConfig::live(url, calculate_buffer_size(self.config.device_memory_gb));

        debug!(
            url,
            generation = self.generation,
            stash_initial_size = config.stash_initial_size,
            "Creating stream transport"
        );

        let mut transport = self.factory.create(config, events_tx);
        if let Some(renderer) = &self.renderer {
            transport.attach_media_element(renderer.media_element());
        }
        self.events = Some(events_rx);
        let transport = self.transport.insert(transport);

        transport.load().await?;
        transport.play().await?;
        self.store.play(url).await?;

        info!(url, generation = self.generation, "Stream playing");
        Ok(())
    }

    /// Wait for the next transport event or the pending reload deadline
    ///
    /// Cancel safe. Returns `None` when there is nothing to wait for.
    pub async fn next_activity(&mut self) -> Option<Activity> {
        let deadline = self.pending.map(|pending| pending.deadline);
        if self.events.is_none() && deadline.is_none() {
            return None;
        }

        tokio::select! {
            event = recv_event(self.events.as_mut()) => Some(match event {
                Some(event) => Activity::Event(event),
                None => Activity::EventsClosed,
            }),
            () = reload_due(deadline) => Some(Activity::ReloadDue),
        }
    }

    /// React to one activity
    ///
    /// Fails with [`PlaybackError::RetriesExhausted`] once the session has
    /// given up; the session is destroyed at that point.
    pub async fn handle(&mut self, activity: Activity) -> Result<()> {
        match activity {
            Activity::Event(TransportEvent::Error { kind, detail }) => {
                self.on_transport_error(&kind, &detail)
            }
            Activity::Event(TransportEvent::Statistics(stats)) => {
                if stats.is_stalled() {
                    self.on_stall();
                } else {
                    self.on_recovered();
                }
                Ok(())
            }
            Activity::ReloadDue => self.fire_reload().await,
            Activity::EventsClosed => {
                debug!(generation = self.generation, "Transport event channel closed");
                self.events = None;
                Ok(())
            }
        }
    }

    /// Wait for and handle one activity; `false` when the session is idle
    pub async fn step(&mut self) -> Result<bool> {
        match self.next_activity().await {
            Some(activity) => {
                self.handle(activity).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Cancel any pending reload, release transport and renderer, reset the
    /// store and the retry budget
    ///
    /// Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.pending = None;
        self.retry.reset();
        self.teardown_transport();

        if let Some(mut renderer) = self.renderer.take() {
            renderer.pause();
            renderer.reset();
            renderer.dispose();
        }

        self.url = None;
        self.store.reset();
        debug!("Playback session destroyed");
    }

    pub fn pending_reload(&self) -> Option<ReloadCause> {
        self.pending.map(|pending| pending.cause)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry.attempts()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn on_transport_error(&mut self, kind: &str, detail: &str) -> Result<()> {
        if self.pending_reload() == Some(ReloadCause::Error) {
            debug!(kind, detail, "Reload already scheduled, ignoring transport error");
            return Ok(());
        }

        if self.retry.should_retry() {
            self.retry.increment();
            let delay = self.retry.delay();
            warn!(
                kind,
                detail,
                attempt = self.retry.attempts(),
                delay_ms = delay.as_millis() as u64,
                "Transport error, scheduling reload"
            );
            self.pending = Some(PendingReload {
                cause: ReloadCause::Error,
                deadline: Instant::now() + delay,
            });
            return Ok(());
        }

        let attempts = self.retry.attempts();
        error!(kind, detail, attempts, "Stream failed after multiple attempts");
        self.destroy();
        self.store.mark_failed();
        Err(PlaybackError::RetriesExhausted { attempts })
    }

    fn on_stall(&mut self) {
        if self.pending.is_some() {
            return;
        }

        let delay = self.retry.delay();
        debug!(delay_ms = delay.as_millis() as u64, "Stream stalled, arming reload");
        self.pending = Some(PendingReload {
            cause: ReloadCause::Stall,
            deadline: Instant::now() + delay,
        });
    }

    fn on_recovered(&mut self) {
        if self.pending_reload() == Some(ReloadCause::Stall) {
            debug!("Stream recovered, cancelling reload");
            self.pending = None;
        }
        self.retry.reset();
    }

    async fn fire_reload(&mut self) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let Some(url) = self.url.clone() else {
            return Ok(());
        };

        info!(url = %url, cause = ?pending.cause, "Reloading stream");

        match self.start(&url).await {
            Ok(()) => Ok(()),
            Err(PlaybackError::NotInitialized) => Err(PlaybackError::NotInitialized),
            Err(e) => self.on_transport_error("reload", &e.to_string()),
        }
    }

    fn teardown_transport(&mut self) {
        self.events = None;
        if let Some(mut transport) = self.transport.take() {
            transport.pause();
            transport.unload();
            transport.detach_media_element();
            transport.destroy();
        }
    }
}

async fn recv_event(
    events: Option<&mut mpsc::UnboundedReceiver<TransportEvent>>,
) -> Option<TransportEvent> {
    match events {
        Some(events) => events.recv().await,
        None => std::future::pending().await,
    }
}

async fn reload_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

enum SessionCommand {
    Load {
        url: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Destroy {
        reply: oneshot::Sender<()>,
    },
}

/// Where a session running behind a [`SessionHandle`] stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Initialized, nothing playing yet
    Idle,
    Playing,
    /// Retries ran out and the session was destroyed; the next load starts over
    Failed { attempts: u32 },
    /// The session task has ended
    Closed,
}

/// A session running on its own task
///
/// The task owns the session; callers talk to it through this handle.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    status: watch::Receiver<SessionStatus>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Initialize `session` and move it onto a new task
    pub fn spawn(mut session: PlaybackSession) -> Result<Self> {
        session.initialize()?;

        let (commands, mut rx) = mpsc::channel(16);
        let (status_tx, status) = watch::channel(SessionStatus::Idle);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    command = rx.recv() => match command {
                        Some(SessionCommand::Load { url, reply }) => {
                            if !session.is_initialized() {
                                if let Err(e) = session.initialize() {
                                    let _ = reply.send(Err(e));
                                    continue;
                                }
                            }
                            let result = session.load(&url).await;
                            if result.is_ok() {
                                status_tx.send_replace(SessionStatus::Playing);
                            }
                            let _ = reply.send(result);
                        }
                        Some(SessionCommand::Destroy { reply }) => {
                            session.destroy();
                            let _ = reply.send(());
                            break;
                        }
                        None => {
                            session.destroy();
                            break;
                        }
                    },
                    Some(activity) = session.next_activity() => {
                        match session.handle(activity).await {
                            Ok(()) => {}
                            Err(PlaybackError::RetriesExhausted { attempts }) => {
                                error!(attempts, "Playback session gave up");
                                status_tx.send_replace(SessionStatus::Failed { attempts });
                            }
                            Err(e) => error!(error = %e, "Playback session stopped"),
                        }
                    }
                }
            }
            status_tx.send_replace(SessionStatus::Closed);
            debug!("Playback session task finished");
        });

        Ok(Self {
            commands,
            status,
            task,
        })
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Receiver notified whenever the session status changes
    pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
        self.status.clone()
    }

    pub async fn load(&self, url: impl Into<String>) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand::Load {
                url: url.into(),
                reply,
            })
            .await
            .map_err(|_| PlaybackError::SessionClosed)?;
        response.await.map_err(|_| PlaybackError::SessionClosed)?
    }

    /// Destroy the session and wait for its task to end
    pub async fn destroy(self) {
        let (reply, response) = oneshot::channel();
        if self
            .commands
            .send(SessionCommand::Destroy { reply })
            .await
            .is_ok()
        {
            let _ = response.await;
        }
        let _ = self.task.await;
    }
}

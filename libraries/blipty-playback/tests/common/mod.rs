//! Fakes for the player backend, transport and renderer
//!
//! Every fake writes to a shared journal so tests can assert on call order.

#![allow(dead_code)]

use async_trait::async_trait;
use blipty_core::{BliptyError, PlayerBackend, PlayerEvent, StreamInfo, StreamQuality};
use blipty_playback::{
    MediaElement, PlaybackError, PlaybackSession, PlayerStore, RenderHost, Renderer,
    RendererOptions, SessionConfig, Transport, TransportConfig, TransportEvent, TransportFactory,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, Notify};

pub const STREAM_URL: &str = "http://provider.test:8080/live/alice/secret/101.ts";

#[derive(Default)]
pub struct Journal(Mutex<Vec<String>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

// ===== Player backend =====

pub struct FakePlayer {
    calls: Mutex<Vec<String>>,
    events: broadcast::Sender<PlayerEvent>,
    stream_info: Mutex<StreamInfo>,
    fail_command: Mutex<Option<&'static str>>,
    play_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakePlayer {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            events,
            stream_info: Mutex::new(StreamInfo::default()),
            fail_command: Mutex::new(None),
            play_gate: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_stream_info(&self, info: StreamInfo) {
        *self.stream_info.lock().unwrap() = info;
    }

    /// Make the named command fail until cleared
    pub fn fail(&self, command: &'static str) {
        *self.fail_command.lock().unwrap() = Some(command);
    }

    /// Block `play_video` until the returned notify fires
    pub fn hold_play(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.play_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, command: &'static str, call: String) -> blipty_core::Result<()> {
        self.calls.lock().unwrap().push(call);
        if *self.fail_command.lock().unwrap() == Some(command) {
            return Err(BliptyError::backend(command, "rejected by fake"));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerBackend for FakePlayer {
    async fn play_video(&self, url: &str) -> blipty_core::Result<()> {
        self.record("play_video", format!("play_video {url}"))?;
        let gate = self.play_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(())
    }

    async fn pause_video(&self) -> blipty_core::Result<()> {
        self.record("pause_video", "pause_video".to_string())
    }

    async fn resume_video(&self) -> blipty_core::Result<()> {
        self.record("resume_video", "resume_video".to_string())
    }

    async fn stop_video(&self) -> blipty_core::Result<()> {
        self.record("stop_video", "stop_video".to_string())
    }

    async fn set_volume(&self, volume: f64) -> blipty_core::Result<()> {
        self.record("set_volume", format!("set_volume {volume}"))
    }

    async fn seek(&self, position: f64) -> blipty_core::Result<()> {
        self.record("seek", format!("seek {position}"))
    }

    async fn get_stream_info(&self) -> blipty_core::Result<StreamInfo> {
        self.record("get_stream_info", "get_stream_info".to_string())?;
        Ok(self.stream_info.lock().unwrap().clone())
    }

    async fn set_quality(&self, quality: &StreamQuality) -> blipty_core::Result<()> {
        self.record(
            "set_quality",
            format!("set_quality {}x{}", quality.width, quality.height),
        )
    }

    fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

// ===== Transport =====

pub struct FakeTransport {
    id: usize,
    journal: Arc<Journal>,
    fail_load: bool,
    _events: mpsc::UnboundedSender<TransportEvent>,
}

impl FakeTransport {
    fn log(&self, what: &str) {
        self.journal.push(format!("transport{}.{what}", self.id));
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn attach_media_element(&mut self, element: MediaElement) {
        self.log(&format!("attach {}", element.0));
    }

    async fn load(&mut self) -> blipty_playback::Result<()> {
        self.log("load");
        if self.fail_load {
            return Err(PlaybackError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    async fn play(&mut self) -> blipty_playback::Result<()> {
        self.log("play");
        Ok(())
    }

    fn pause(&mut self) {
        self.log("pause");
    }

    fn unload(&mut self) {
        self.log("unload");
    }

    fn detach_media_element(&mut self) {
        self.log("detach");
    }

    fn destroy(&mut self) {
        self.log("destroy");
    }
}

pub struct FakeFactory {
    journal: Arc<Journal>,
    supported: bool,
    failing_loads: AtomicUsize,
    senders: Mutex<Vec<mpsc::UnboundedSender<TransportEvent>>>,
    configs: Mutex<Vec<TransportConfig>>,
}

impl FakeFactory {
    pub fn new(journal: Arc<Journal>, supported: bool) -> Arc<Self> {
        Arc::new(Self {
            journal,
            supported,
            failing_loads: AtomicUsize::new(0),
            senders: Mutex::new(Vec::new()),
            configs: Mutex::new(Vec::new()),
        })
    }

    /// Number of transports created so far
    pub fn created(&self) -> usize {
        self.senders.lock().unwrap().len()
    }

    /// Event sender of the n-th transport, counting from 1
    pub fn sender(&self, n: usize) -> mpsc::UnboundedSender<TransportEvent> {
        self.senders.lock().unwrap()[n - 1].clone()
    }

    pub fn config(&self, n: usize) -> TransportConfig {
        self.configs.lock().unwrap()[n - 1].clone()
    }

    /// Make the next `n` transports fail to load
    pub fn fail_next_loads(&self, n: usize) {
        self.failing_loads.store(n, Ordering::SeqCst);
    }
}

impl TransportFactory for FakeFactory {
    fn live_playback_supported(&self) -> bool {
        self.supported
    }

    fn create(
        &self,
        config: TransportConfig,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Box<dyn Transport> {
        let mut senders = self.senders.lock().unwrap();
        senders.push(events.clone());
        self.configs.lock().unwrap().push(config);

        let fail_load = self
            .failing_loads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        Box::new(FakeTransport {
            id: senders.len(),
            journal: Arc::clone(&self.journal),
            fail_load,
            _events: events,
        })
    }
}

// ===== Renderer =====

pub struct FakeRenderer {
    journal: Arc<Journal>,
}

impl Renderer for FakeRenderer {
    fn configure(&mut self, options: &RendererOptions) {
        assert!(options.live_ui && options.live_tracker && options.autoplay);
        self.journal.push("renderer.configure");
    }

    fn media_element(&self) -> MediaElement {
        MediaElement("video-player_html5_api".to_string())
    }

    fn pause(&mut self) {
        self.journal.push("renderer.pause");
    }

    fn reset(&mut self) {
        self.journal.push("renderer.reset");
    }

    fn dispose(&mut self) {
        self.journal.push("renderer.dispose");
    }
}

pub struct FakeHost {
    journal: Arc<Journal>,
    sink_id: String,
}

impl RenderHost for FakeHost {
    fn locate(&self, sink_id: &str) -> Option<Box<dyn Renderer>> {
        self.journal.push("host.locate");
        (sink_id == self.sink_id).then(|| {
            Box::new(FakeRenderer {
                journal: Arc::clone(&self.journal),
            }) as Box<dyn Renderer>
        })
    }
}

// ===== Harness =====

pub struct Harness {
    pub journal: Arc<Journal>,
    pub factory: Arc<FakeFactory>,
    pub player: Arc<FakePlayer>,
    pub store: Arc<PlayerStore>,
    pub session: PlaybackSession,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(SessionConfig::default(), "video-player", true)
    }

    pub fn with(config: SessionConfig, existing_sink: &str, supported: bool) -> Self {
        let journal = Arc::new(Journal::default());
        let factory = FakeFactory::new(Arc::clone(&journal), supported);
        let host = Arc::new(FakeHost {
            journal: Arc::clone(&journal),
            sink_id: existing_sink.to_string(),
        });
        let player = FakePlayer::new();
        let store = Arc::new(PlayerStore::new(player.clone()));
        let session = PlaybackSession::new(config, host, factory.clone(), Arc::clone(&store));

        Self {
            journal,
            factory,
            player,
            store,
            session,
        }
    }

    /// Initialize and load the default stream
    pub async fn playing() -> Self {
        let mut harness = Self::new();
        harness.session.initialize().unwrap();
        harness.session.load(STREAM_URL).await.unwrap();
        harness
    }
}

pub fn stalled() -> TransportEvent {
    TransportEvent::Statistics(blipty_playback::TransportStatistics { speed: 0.0 })
}

pub fn flowing() -> TransportEvent {
    TransportEvent::Statistics(blipty_playback::TransportStatistics { speed: 512.0 })
}

pub fn transport_error() -> TransportEvent {
    TransportEvent::Error {
        kind: "NetworkError".to_string(),
        detail: "HttpStatusCodeInvalid".to_string(),
    }
}

//! Transport state machine for one text.
//!
//! The controller owns the utterance descriptor, the selected voice and the
//! pitch/rate/volume parameters, and is the only thing that talks to the
//! [`SpeechGateway`]:
//!
//! ```text
//!   Idle ──play (speak)──▶ Speaking ──pause──▶ Paused
//!    ▲                      │    ▲               │
//!    │                      │    └─play (resume)─┘
//!    └──stop / teardown / natural end────────────┘
//! ```
//!
//! Engine callbacks never touch controller state directly. They post a
//! [`GatewaySignal`] into the controller's channel, and the owner feeds each
//! signal back through [`NarrationController::handle_signal`] on the same
//! event loop that handles user intents.

use std::sync::Arc;

use tokio::sync::mpsc;

use narrate_core::{
    NarrationSettings, PlaybackParams, PlaybackState, SpeechGateway, Utterance, VoiceProfile,
};

// ── Signals from the engine ────────────────────────────────────────

/// Notifications posted by engine callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewaySignal {
    /// The engine's voice list changed. Tagged with the initialization it was
    /// registered for.
    VoicesChanged { generation: u64 },

    /// A submitted utterance finished on its own. Tagged with its submission.
    UtteranceEnded { submission: u64 },
}

// ── Events emitted by the controller ───────────────────────────────

/// Events emitted by the controller to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationEvent {
    /// Transport state changed.
    StateChanged(PlaybackState),

    /// The selected voice changed. `None` means the engine default.
    VoiceSelected(Option<String>),

    /// Pitch, rate or volume changed.
    ParamsChanged(PlaybackParams),

    /// A new text was loaded.
    TextLoaded { words: usize },

    /// The text was abandoned and any narration cancelled.
    TornDown,
}

/// Read-only view of the controller, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSnapshot {
    pub state: PlaybackState,
    pub voice: Option<String>,
    pub params: PlaybackParams,
    pub loaded: bool,
}

impl Default for NarrationSnapshot {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            voice: None,
            params: PlaybackParams::default(),
            loaded: false,
        }
    }
}

// ── Controller ─────────────────────────────────────────────────────

/// Coordinates transport state for one text against a speech engine.
///
/// Operations never fail from the caller's point of view. When the engine
/// rejects a command the failure is logged and the state is left unchanged.
pub struct NarrationController {
    gateway: Arc<dyn SpeechGateway>,

    state: PlaybackState,

    /// Present between `initialize` and `teardown`.
    utterance: Option<Utterance>,

    /// Selected voice, held by name only.
    voice: Option<String>,

    params: PlaybackParams,

    /// Bumped on every `initialize`; stale voice notifications are dropped.
    generation: u64,

    /// Bumped on every `speak` and every cancel; stale end notifications are
    /// dropped.
    submission: u64,

    signal_tx: mpsc::UnboundedSender<GatewaySignal>,
    signal_rx: mpsc::UnboundedReceiver<GatewaySignal>,
    event_tx: mpsc::UnboundedSender<NarrationEvent>,
}

impl NarrationController {
    /// Create a controller bound to `gateway`.
    ///
    /// Returns the controller and a receiver for [`NarrationEvent`]s.
    pub fn new(
        gateway: Arc<dyn SpeechGateway>,
    ) -> (Self, mpsc::UnboundedReceiver<NarrationEvent>) {
        Self::with_settings(gateway, &NarrationSettings::default())
    }

    /// Create a controller seeded with initial settings.
    ///
    /// A preferred voice is only kept once the engine lists it; until then
    /// the first listed voice wins.
    pub fn with_settings(
        gateway: Arc<dyn SpeechGateway>,
        settings: &NarrationSettings,
    ) -> (Self, mpsc::UnboundedReceiver<NarrationEvent>) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let controller = Self {
            gateway,
            state: PlaybackState::Idle,
            utterance: None,
            voice: settings.voice.clone(),
            params: settings.params(),
            generation: 0,
            submission: 0,
            signal_tx,
            signal_rx,
            event_tx,
        };

        (controller, event_rx)
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Name of the selected voice, if any.
    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub const fn params(&self) -> PlaybackParams {
        self.params
    }

    /// Whether a text is loaded.
    pub const fn is_loaded(&self) -> bool {
        self.utterance.is_some()
    }

    /// The loaded utterance, with the snapshot applied by the last fresh play.
    pub const fn utterance(&self) -> Option<&Utterance> {
        self.utterance.as_ref()
    }

    pub fn snapshot(&self) -> NarrationSnapshot {
        NarrationSnapshot {
            state: self.state,
            voice: self.voice.clone(),
            params: self.params,
            loaded: self.is_loaded(),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Load `text` as a new utterance.
    ///
    /// A previously loaded text is torn down first, so at most one utterance
    /// is ever active. Nothing is spoken until [`play`](Self::play).
    pub fn initialize(&mut self, text: impl Into<Arc<str>>) {
        if self.utterance.is_some() {
            self.teardown();
        }

        self.generation += 1;
        let utterance = Utterance::new(text);
        let words = utterance.word_count();
        self.utterance = Some(utterance);

        tracing::debug!(generation = self.generation, words, "Narration text loaded");
        self.emit(NarrationEvent::TextLoaded { words });

        let voices = self.gateway.voices();
        if voices.is_empty() {
            self.watch_voices();
        } else {
            self.adopt_voice(&voices);
        }
    }

    /// Abandon the loaded text and cancel any narration on the engine.
    ///
    /// The cancel is issued unconditionally. Afterwards transport commands
    /// are ignored until the next [`initialize`](Self::initialize).
    pub fn teardown(&mut self) {
        self.cancel_on_gateway("teardown");
        self.utterance = None;
        self.set_state(PlaybackState::Idle);
        self.emit(NarrationEvent::TornDown);
    }

    // ── Transport ──────────────────────────────────────────────────

    /// Resume when paused, otherwise submit the utterance afresh with the
    /// current voice and parameters.
    pub fn play(&mut self) {
        if self.utterance.is_none() {
            tracing::warn!("Play requested with no text loaded");
            return;
        }

        match self.state {
            PlaybackState::Paused => match self.gateway.resume() {
                Ok(()) => self.set_state(PlaybackState::Speaking),
                Err(e) => tracing::warn!(error = %e, "Speech engine failed to resume"),
            },
            PlaybackState::Speaking => {
                tracing::debug!("Play requested while already speaking");
            }
            PlaybackState::Idle => self.speak_fresh(),
        }
    }

    /// Hold the narration. Only meaningful while speaking.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Speaking {
            tracing::debug!(state = %self.state, "Pause ignored outside of speaking");
            return;
        }

        match self.gateway.pause() {
            Ok(()) => self.set_state(PlaybackState::Paused),
            Err(e) => tracing::warn!(error = %e, "Speech engine failed to pause"),
        }
    }

    /// Cancel narration and return to idle. The text stays loaded.
    pub fn stop(&mut self) {
        self.cancel_on_gateway("stop");
        if let Some(utterance) = self.utterance.as_mut() {
            utterance.reset();
        }
        self.set_state(PlaybackState::Idle);
    }

    // ── Parameters ─────────────────────────────────────────────────

    /// Select a voice by name. Applies from the next fresh play.
    ///
    /// Names the engine does not currently list are ignored.
    pub fn set_voice(&mut self, name: &str) {
        let voices = self.gateway.voices();
        if VoiceProfile::find(&voices, name).is_none() {
            tracing::warn!(voice = name, available = voices.len(), "Unknown voice, keeping selection");
            return;
        }
        self.select_voice(Some(name.to_string()));
    }

    /// Store a pitch multiplier, clamped to 0.5-2.0.
    pub fn set_pitch(&mut self, pitch: f32) {
        self.params.set_pitch(pitch);
        self.emit(NarrationEvent::ParamsChanged(self.params));
    }

    /// Store a rate multiplier, clamped to 0.5-2.0.
    pub fn set_rate(&mut self, rate: f32) {
        self.params.set_rate(rate);
        self.emit(NarrationEvent::ParamsChanged(self.params));
    }

    /// Store a volume, clamped to 0.0-1.0.
    pub fn set_volume(&mut self, volume: f32) {
        self.params.set_volume(volume);
        self.emit(NarrationEvent::ParamsChanged(self.params));
    }

    // ── Engine signals ─────────────────────────────────────────────

    /// Wait for the next engine signal.
    ///
    /// Cancel-safe, so it can sit in a `select!` next to the intent channel.
    pub async fn next_signal(&mut self) -> Option<GatewaySignal> {
        self.signal_rx.recv().await
    }

    /// Apply every signal that is already queued. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.handle_signal(signal);
            handled += 1;
        }
        handled
    }

    /// Apply one engine signal.
    pub fn handle_signal(&mut self, signal: GatewaySignal) {
        match signal {
            GatewaySignal::VoicesChanged { generation } => {
                if generation != self.generation || self.utterance.is_none() {
                    tracing::debug!(generation, current = self.generation, "Stale voice notification");
                    return;
                }
                let voices = self.gateway.voices();
                if voices.is_empty() {
                    self.watch_voices();
                } else {
                    self.adopt_voice(&voices);
                }
            }
            GatewaySignal::UtteranceEnded { submission } => {
                if submission != self.submission || self.state == PlaybackState::Idle {
                    tracing::debug!(submission, current = self.submission, "Stale end notification");
                    return;
                }
                tracing::debug!(submission, "Narration finished");
                if let Some(utterance) = self.utterance.as_mut() {
                    utterance.reset();
                }
                self.set_state(PlaybackState::Idle);
            }
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn speak_fresh(&mut self) {
        let voice = self.voice.as_deref().and_then(|name| {
            let voices = self.gateway.voices();
            VoiceProfile::find(&voices, name).cloned()
        });

        let Some(utterance) = self.utterance.as_mut() else {
            return;
        };
        utterance.apply(voice, self.params);

        self.submission += 1;
        let submission = self.submission;
        let signal_tx = self.signal_tx.clone();
        let on_end = Box::new(move || {
            let _ = signal_tx.send(GatewaySignal::UtteranceEnded { submission });
        });

        match self.gateway.speak(utterance, on_end) {
            Ok(()) => {
                tracing::info!(
                    submission,
                    voice = self.voice.as_deref().unwrap_or("default"),
                    pitch = self.params.pitch(),
                    rate = self.params.rate(),
                    volume = self.params.volume(),
                    "Narration started"
                );
                self.set_state(PlaybackState::Speaking);
            }
            Err(e) => tracing::warn!(error = %e, "Speech engine rejected utterance"),
        }
    }

    fn cancel_on_gateway(&mut self, reason: &'static str) {
        // Any end notification still in flight belongs to the old submission.
        self.submission += 1;
        if let Err(e) = self.gateway.cancel() {
            tracing::warn!(error = %e, reason, "Speech engine failed to cancel");
        }
    }

    /// Register a one-time voice-list notification for this generation.
    fn watch_voices(&self) {
        let generation = self.generation;
        let signal_tx = self.signal_tx.clone();
        tracing::debug!(generation, "Voice list empty, waiting for engine");
        self.gateway.on_voices_changed(Box::new(move || {
            let _ = signal_tx.send(GatewaySignal::VoicesChanged { generation });
        }));
    }

    /// Keep the selected voice if the engine lists it, else take the first.
    fn adopt_voice(&mut self, voices: &[VoiceProfile]) {
        if let Some(name) = self.voice.as_deref() {
            if VoiceProfile::find(voices, name).is_some() {
                return;
            }
        }
        if let Some(first) = voices.first() {
            self.select_voice(Some(first.name.clone()));
        }
    }

    fn select_voice(&mut self, voice: Option<String>) {
        if self.voice != voice {
            tracing::debug!(old = ?self.voice, new = ?voice, "Voice selected");
            self.voice = voice;
            self.emit(NarrationEvent::VoiceSelected(self.voice.clone()));
        }
    }

    fn set_state(&mut self, new_state: PlaybackState) {
        if self.state != new_state {
            tracing::debug!(old = %self.state, new = %new_state, "Narration state transition");
            self.state = new_state;
            self.emit(NarrationEvent::StateChanged(new_state));
        }
    }

    /// Best-effort: a dropped receiver only means nobody is rendering.
    fn emit(&self, event: NarrationEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Narration event receiver dropped");
        }
    }
}

impl Drop for NarrationController {
    fn drop(&mut self) {
        if self.utterance.is_some() {
            self.teardown();
        }
    }
}

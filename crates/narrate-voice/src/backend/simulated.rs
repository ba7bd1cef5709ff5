//! Simulated speech engine that narrates on a timer instead of a sound card.
//!
//! Useful wherever no OS speech service is present (CI, containers) and as
//! the engine behind tests. It behaves like a browser-style engine:
//!
//! - the voice list can start empty and be populated after a delay, firing
//!   every registered voices-changed callback once;
//! - an utterance "speaks" for a duration estimated from its word count and
//!   rate, then invokes its end callback;
//! - pause freezes the remaining duration, resume restarts the clock;
//! - cancel drops the utterance without invoking its end callback.
//!
//! Every command received is recorded and can be inspected with
//! [`SimulatedGateway::commands`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use narrate_core::{
    PlaybackParams, SpeechError, SpeechGateway, Utterance, UtteranceEndCallback, VoiceProfile,
    VoicesChangedCallback,
};

/// Average English narration speed at rate 1.0.
pub const DEFAULT_WORDS_PER_MINUTE: f32 = 180.0;

/// A command as the engine received it.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCommand {
    Speak {
        text: String,
        voice: Option<String>,
        params: PlaybackParams,
    },
    Pause,
    Resume,
    Cancel,
}

/// Configuration for [`SimulatedGateway`].
#[derive(Debug, Clone)]
pub struct SimulatedGatewayConfig {
    /// Voices the engine will report.
    pub voices: Vec<VoiceProfile>,

    /// How long the voice list stays empty after construction.
    pub voices_delay: Duration,

    /// Narration speed at rate 1.0.
    pub words_per_minute: f32,
}

impl Default for SimulatedGatewayConfig {
    fn default() -> Self {
        Self {
            voices: default_voices(),
            voices_delay: Duration::ZERO,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// Voices reported by a default-configured simulated engine.
pub fn default_voices() -> Vec<VoiceProfile> {
    vec![
        VoiceProfile::named("Aria").with_language("en-US"),
        VoiceProfile::named("Brian").with_language("en-GB"),
        VoiceProfile::named("Chloe").with_language("en-AU"),
    ]
}

struct Active {
    id: u64,
    remaining: Duration,
    /// `Some` while the clock is running, `None` while paused.
    started: Option<Instant>,
    on_end: Option<UtteranceEndCallback>,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Inner {
    voices: Vec<VoiceProfile>,
    watchers: Vec<VoicesChangedCallback>,
    active: Option<Active>,
    next_id: u64,
    log: Vec<GatewayCommand>,
}

/// In-process speech engine driven by Tokio timers.
///
/// Cloning shares the same engine.
#[derive(Clone)]
pub struct SimulatedGateway {
    inner: Arc<Mutex<Inner>>,
    words_per_minute: f32,
}

impl SimulatedGateway {
    /// Create an engine.
    ///
    /// With a non-zero `voices_delay` the voice list is populated by a task
    /// on the current Tokio runtime. Outside a runtime the voices are
    /// available immediately.
    pub fn new(config: SimulatedGatewayConfig) -> Self {
        let gateway = Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            words_per_minute: config.words_per_minute.max(1.0),
        };

        if config.voices_delay.is_zero() {
            lock(&gateway.inner).voices = config.voices;
            return gateway;
        }

        match Handle::try_current() {
            Ok(handle) => {
                let engine = gateway.clone();
                let delay = config.voices_delay;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    tracing::debug!(delay_ms = delay.as_millis(), "Simulated voices loaded");
                    engine.set_voices(config.voices);
                });
            }
            Err(_) => {
                tracing::warn!("No Tokio runtime, loading simulated voices immediately");
                lock(&gateway.inner).voices = config.voices;
            }
        }

        gateway
    }

    /// Replace the voice list and fire every pending voices-changed callback.
    pub fn set_voices(&self, voices: Vec<VoiceProfile>) {
        let watchers = {
            let mut inner = lock(&self.inner);
            inner.voices = voices;
            std::mem::take(&mut inner.watchers)
        };
        for watcher in watchers {
            watcher();
        }
    }

    /// Every command received so far, oldest first.
    pub fn commands(&self) -> Vec<GatewayCommand> {
        lock(&self.inner).log.clone()
    }

    /// Whether an utterance is narrating right now.
    pub fn is_speaking(&self) -> bool {
        lock(&self.inner)
            .active
            .as_ref()
            .is_some_and(|a| a.started.is_some())
    }

    /// Whether an utterance is held by a pause.
    pub fn is_paused(&self) -> bool {
        lock(&self.inner)
            .active
            .as_ref()
            .is_some_and(|a| a.started.is_none())
    }

    /// Number of voices-changed callbacks waiting to fire.
    pub fn pending_watchers(&self) -> usize {
        lock(&self.inner).watchers.len()
    }

    /// How long `utterance` takes to narrate at its applied rate.
    pub fn estimate(&self, utterance: &Utterance) -> Duration {
        #[allow(clippy::cast_precision_loss)]
        let words = utterance.word_count() as f32;
        let per_minute = self.words_per_minute * utterance.params().rate();
        Duration::from_secs_f32(words * 60.0 / per_minute)
    }

    fn spawn_timer(&self, handle: &Handle, id: u64, after: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(after).await;
            let on_end = {
                let mut inner = lock(&inner);
                let current = inner
                    .active
                    .as_ref()
                    .is_some_and(|a| a.id == id && a.started.is_some());
                if current {
                    inner.active.take().and_then(|a| a.on_end)
                } else {
                    None
                }
            };
            if let Some(on_end) = on_end {
                tracing::trace!(id, "Simulated utterance finished");
                on_end();
            }
        })
    }
}

impl SpeechGateway for SimulatedGateway {
    fn speak(
        &self,
        utterance: &Utterance,
        on_end: UtteranceEndCallback,
    ) -> Result<(), SpeechError> {
        let handle = Handle::try_current().map_err(|_| {
            SpeechError::Unavailable("simulated engine needs a Tokio runtime".to_string())
        })?;
        let duration = self.estimate(utterance);

        let id = {
            let mut inner = lock(&self.inner);
            inner.log.push(GatewayCommand::Speak {
                text: utterance.text().to_string(),
                voice: utterance.voice().map(|v| v.name.clone()),
                params: utterance.params(),
            });
            if let Some(timer) = inner.active.take().and_then(|a| a.timer) {
                timer.abort();
            }
            inner.next_id += 1;
            let id = inner.next_id;
            inner.active = Some(Active {
                id,
                remaining: duration,
                started: Some(Instant::now()),
                on_end: Some(on_end),
                timer: None,
            });
            id
        };

        let timer = self.spawn_timer(&handle, id, duration);
        let mut inner = lock(&self.inner);
        match inner.active.as_mut() {
            Some(active) if active.id == id => active.timer = Some(timer),
            _ => timer.abort(),
        }

        tracing::debug!(id, duration_ms = duration.as_millis(), "Simulated utterance started");
        Ok(())
    }

    fn pause(&self) -> Result<(), SpeechError> {
        let mut inner = lock(&self.inner);
        inner.log.push(GatewayCommand::Pause);
        let active = inner.active.as_mut().ok_or(SpeechError::NoActiveUtterance)?;
        if let Some(started) = active.started.take() {
            active.remaining = active.remaining.saturating_sub(started.elapsed());
            if let Some(timer) = active.timer.take() {
                timer.abort();
            }
        }
        Ok(())
    }

    fn resume(&self) -> Result<(), SpeechError> {
        let handle = Handle::try_current().map_err(|_| {
            SpeechError::Unavailable("simulated engine needs a Tokio runtime".to_string())
        })?;

        let (id, remaining) = {
            let mut inner = lock(&self.inner);
            inner.log.push(GatewayCommand::Resume);
            let active = inner.active.as_mut().ok_or(SpeechError::NoActiveUtterance)?;
            if active.started.is_some() {
                return Ok(());
            }
            active.started = Some(Instant::now());
            (active.id, active.remaining)
        };

        let timer = self.spawn_timer(&handle, id, remaining);
        let mut inner = lock(&self.inner);
        match inner.active.as_mut() {
            Some(active) if active.id == id => active.timer = Some(timer),
            _ => timer.abort(),
        }
        Ok(())
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        let mut inner = lock(&self.inner);
        inner.log.push(GatewayCommand::Cancel);
        if let Some(active) = inner.active.take() {
            if let Some(timer) = active.timer {
                timer.abort();
            }
            tracing::trace!(id = active.id, "Simulated utterance cancelled");
        }
        Ok(())
    }

    fn voices(&self) -> Vec<VoiceProfile> {
        lock(&self.inner).voices.clone()
    }

    fn on_voices_changed(&self, callback: VoicesChangedCallback) {
        lock(&self.inner).watchers.push(callback);
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Platform speech engine via the [`tts`] crate.
//!
//! Speaks through the operating system's speech service (speech-dispatcher
//! on Linux, SAPI/WinRT on Windows, AVFoundation on macOS). The controller's
//! multipliers are mapped onto each engine's native ranges.
//!
//! The OS services have no portable pause. Pause stops output and keeps the
//! utterance; resume speaks it again from the beginning.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tts::{Features, Tts, UtteranceId};

use narrate_core::{
    SpeechError, SpeechGateway, Utterance, UtteranceEndCallback, VoiceProfile,
    VoicesChangedCallback,
};

struct Playback<Id = UtteranceId> {
    /// Engine id of the utterance currently producing sound.
    current: Option<Id>,
    /// End reported for an id before `speak` returned it to us.
    early_end: Option<Id>,
    /// Kept so resume can re-submit it.
    held: Option<Utterance>,
    on_end: Option<UtteranceEndCallback>,
    paused: bool,
}

impl<Id> Default for Playback<Id> {
    fn default() -> Self {
        Self {
            current: None,
            early_end: None,
            held: None,
            on_end: None,
            paused: false,
        }
    }
}

impl<Id: PartialEq> Playback<Id> {
    /// Prepare for a new submission whose id is not known yet.
    fn begin(&mut self) {
        self.current = None;
        self.early_end = None;
        self.paused = false;
    }

    /// The engine reported that `id` finished. Returns the callback to run.
    fn finished(&mut self, id: Id) -> Option<UtteranceEndCallback> {
        if self.paused || self.held.is_none() {
            return None;
        }
        match &self.current {
            Some(current) if *current == id => {}
            Some(_) => return None,
            // Submission still in flight: settle it once the id is known.
            None => {
                self.early_end = Some(id);
                return None;
            }
        }
        self.current = None;
        self.held = None;
        self.on_end.take()
    }

    /// `speak` returned `id`. Returns the callback if it already finished.
    fn submitted(&mut self, id: Option<Id>) -> Option<UtteranceEndCallback> {
        let early = self.early_end.take();
        match id {
            Some(id) if early.as_ref() == Some(&id) && !self.paused => {
                self.held = None;
                self.on_end.take()
            }
            id => {
                self.current = id;
                None
            }
        }
    }
}

/// Speech gateway backed by the OS speech service.
pub struct PlatformGateway {
    tts: Mutex<Tts>,
    features: Features,
    playback: Arc<Mutex<Playback>>,
}

impl PlatformGateway {
    /// Connect to the default OS speech service.
    pub fn new() -> Result<Self, SpeechError> {
        let tts = Tts::default().map_err(|e| SpeechError::Unavailable(e.to_string()))?;
        let features = tts.supported_features();
        let playback = Arc::new(Mutex::new(Playback::<UtteranceId>::default()));

        if features.utterance_callbacks {
            let state = Arc::clone(&playback);
            tts.on_utterance_end(Some(Box::new(move |id| {
                let on_end = lock(&state).finished(id);
                if let Some(on_end) = on_end {
                    on_end();
                }
            })))
            .map_err(|e| SpeechError::Engine(e.to_string()))?;
        } else {
            tracing::warn!("Speech engine reports no end-of-utterance callbacks");
        }

        tracing::info!(
            rate = features.rate,
            pitch = features.pitch,
            volume = features.volume,
            voices = features.voice,
            "Platform speech engine ready"
        );

        Ok(Self {
            tts: Mutex::new(tts),
            features,
            playback,
        })
    }

    fn apply(&self, tts: &mut Tts, utterance: &Utterance) -> Result<(), SpeechError> {
        let params = utterance.params();

        if let (true, Some(profile)) = (self.features.voice, utterance.voice()) {
            let voices = tts.voices().map_err(engine_error)?;
            match voices.iter().find(|v| v.name() == profile.name) {
                Some(voice) => tts.set_voice(voice).map_err(engine_error)?,
                None => tracing::warn!(voice = %profile.name, "Voice no longer offered by engine"),
            }
        }

        if self.features.rate {
            let rate = scale(params.rate(), tts.normal_rate(), tts.min_rate(), tts.max_rate());
            tts.set_rate(rate).map_err(engine_error)?;
        }
        if self.features.pitch {
            let pitch = scale(params.pitch(), tts.normal_pitch(), tts.min_pitch(), tts.max_pitch());
            tts.set_pitch(pitch).map_err(engine_error)?;
        }
        if self.features.volume {
            let volume = params
                .volume()
                .mul_add(tts.max_volume() - tts.min_volume(), tts.min_volume());
            tts.set_volume(volume).map_err(engine_error)?;
        }
        Ok(())
    }

    fn submit(&self, utterance: &Utterance) -> Result<Option<UtteranceId>, SpeechError> {
        let mut tts = lock(&self.tts);
        self.apply(&mut tts, utterance)?;
        tts.speak(utterance.text(), true).map_err(engine_error)
    }

    /// Record the engine id of the submission just made.
    fn settle(&self, id: Option<UtteranceId>) {
        let on_end = lock(&self.playback).submitted(id);
        if let Some(on_end) = on_end {
            tracing::trace!("Utterance finished before its submission returned");
            on_end();
        }
    }

    fn silence(&self) -> Result<(), SpeechError> {
        if !self.features.stop {
            return Err(SpeechError::Unsupported("stop"));
        }
        lock(&self.tts).stop().map_err(engine_error)?;
        Ok(())
    }
}

impl SpeechGateway for PlatformGateway {
    fn speak(
        &self,
        utterance: &Utterance,
        on_end: UtteranceEndCallback,
    ) -> Result<(), SpeechError> {
        {
            let mut playback = lock(&self.playback);
            playback.begin();
            playback.held = Some(utterance.clone());
            playback.on_end = Some(on_end);
        }
        let id = self.submit(utterance)?;
        self.settle(id);
        Ok(())
    }

    fn pause(&self) -> Result<(), SpeechError> {
        {
            let mut playback = lock(&self.playback);
            if playback.held.is_none() {
                return Err(SpeechError::NoActiveUtterance);
            }
            playback.paused = true;
            playback.current = None;
        }
        self.silence()
    }

    fn resume(&self) -> Result<(), SpeechError> {
        let held = {
            let mut playback = lock(&self.playback);
            if !playback.paused {
                return Ok(());
            }
            let held = playback.held.clone().ok_or(SpeechError::NoActiveUtterance)?;
            playback.begin();
            held
        };
        tracing::debug!("Resuming from the start of the utterance");
        let id = self.submit(&held)?;
        self.settle(id);
        Ok(())
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        *lock(&self.playback) = Playback::default();
        match self.silence() {
            Err(SpeechError::Unsupported(_)) => Ok(()),
            other => other,
        }
    }

    fn voices(&self) -> Vec<VoiceProfile> {
        if !self.features.voice {
            return Vec::new();
        }
        match lock(&self.tts).voices() {
            Ok(voices) => voices
                .into_iter()
                .map(|v| VoiceProfile {
                    id: v.id(),
                    name: v.name(),
                    language: Some(v.language().to_string()),
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list platform voices");
                Vec::new()
            }
        }
    }

    fn on_voices_changed(&self, callback: VoicesChangedCallback) {
        // The OS list is synchronous: it is either ready now or never.
        if self.voices().is_empty() {
            tracing::debug!("Platform engine lists no voices, using its default");
        } else {
            callback();
        }
    }
}

/// Map a multiplier around 1.0 onto an engine's native range.
fn scale(multiplier: f32, normal: f32, min: f32, max: f32) -> f32 {
    (normal * multiplier).clamp(min, max)
}

fn engine_error(e: tts::Error) -> SpeechError {
    SpeechError::Engine(e.to_string())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Shared test doubles for narration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use narrate_core::{
    SpeechError, SpeechGateway, Utterance, UtteranceEndCallback, VoiceProfile,
    VoicesChangedCallback,
};
use narrate_voice::{GatewayCommand, NarrationController, NarrationEvent};
use tokio::sync::mpsc::UnboundedReceiver;

/// Gateway that records commands and lets the test fire engine callbacks.
#[derive(Default)]
pub struct RecordingGateway {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    voices: Vec<VoiceProfile>,
    watchers: Vec<VoicesChangedCallback>,
    on_end: Option<UtteranceEndCallback>,
    commands: Vec<GatewayCommand>,
}

impl RecordingGateway {
    pub fn with_voices(names: &[&str]) -> Arc<Self> {
        let gateway = Self::default();
        gateway.state.lock().unwrap().voices =
            names.iter().map(|n| VoiceProfile::named(*n)).collect();
        Arc::new(gateway)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Populate the voice list and fire pending voices-changed callbacks.
    pub fn publish_voices(&self, names: &[&str]) {
        let watchers = {
            let mut state = self.state.lock().unwrap();
            state.voices = names.iter().map(|n| VoiceProfile::named(*n)).collect();
            std::mem::take(&mut state.watchers)
        };
        for watcher in watchers {
            watcher();
        }
    }

    /// Fire the end callback of the last spoken utterance, as a natural finish.
    pub fn finish(&self) -> bool {
        let on_end = self.state.lock().unwrap().on_end.take();
        on_end.map(|cb| cb()).is_some()
    }

    pub fn commands(&self) -> Vec<GatewayCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn count(&self, pred: fn(&GatewayCommand) -> bool) -> usize {
        self.commands().iter().filter(|c| pred(c)).count()
    }

    pub fn speaks(&self) -> usize {
        self.count(|c| matches!(c, GatewayCommand::Speak { .. }))
    }

    pub fn cancels(&self) -> usize {
        self.count(|c| matches!(c, GatewayCommand::Cancel))
    }

    pub fn watchers(&self) -> usize {
        self.state.lock().unwrap().watchers.len()
    }

    fn record(&self, command: GatewayCommand) {
        self.state.lock().unwrap().commands.push(command);
    }
}

impl SpeechGateway for RecordingGateway {
    fn speak(
        &self,
        utterance: &Utterance,
        on_end: UtteranceEndCallback,
    ) -> Result<(), SpeechError> {
        self.record(GatewayCommand::Speak {
            text: utterance.text().to_string(),
            voice: utterance.voice().map(|v| v.name.clone()),
            params: utterance.params(),
        });
        self.state.lock().unwrap().on_end = Some(on_end);
        Ok(())
    }

    fn pause(&self) -> Result<(), SpeechError> {
        self.record(GatewayCommand::Pause);
        Ok(())
    }

    fn resume(&self) -> Result<(), SpeechError> {
        self.record(GatewayCommand::Resume);
        Ok(())
    }

    fn cancel(&self) -> Result<(), SpeechError> {
        self.record(GatewayCommand::Cancel);
        Ok(())
    }

    fn voices(&self) -> Vec<VoiceProfile> {
        self.state.lock().unwrap().voices.clone()
    }

    fn on_voices_changed(&self, callback: VoicesChangedCallback) {
        self.state.lock().unwrap().watchers.push(callback);
    }
}

/// Controller wired to `gateway`, with its event receiver.
pub fn controller(
    gateway: &Arc<RecordingGateway>,
) -> (NarrationController, UnboundedReceiver<NarrationEvent>) {
    NarrationController::new(Arc::clone(gateway) as Arc<dyn SpeechGateway>)
}

/// Drain all pending events from the event receiver and return them.
pub fn drain_events(rx: &mut UnboundedReceiver<NarrationEvent>) -> Vec<NarrationEvent> {
    let mut events = Vec::new();
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    events
}

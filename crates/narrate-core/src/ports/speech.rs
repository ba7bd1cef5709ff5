//! Speech engine port: the capability surface a narration engine exposes.
//!
//! An engine narrates at most one utterance at a time. It accepts a fresh
//! submission, pauses, resumes or cancels the active one, and enumerates its
//! voices. Voice lists may be populated asynchronously; callers that find the
//! list empty register a one-time notification for when it changes.

use thiserror::Error;

use crate::domain::{Utterance, VoiceProfile};

/// Invoked once when the submitted utterance finishes on its own.
///
/// Engines must not invoke it for an utterance that was cancelled.
pub type UtteranceEndCallback = Box<dyn FnOnce() + Send + 'static>;

/// Invoked once, the next time the engine's voice list changes.
pub type VoicesChangedCallback = Box<dyn FnOnce() + Send + 'static>;

/// Errors reported by a speech engine.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No speech engine is available on this platform.
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine does not implement this operation.
    #[error("Speech engine does not support {0}")]
    Unsupported(&'static str),

    /// The command needs an active utterance and there is none.
    #[error("No active utterance")]
    NoActiveUtterance,

    /// The engine rejected the command.
    #[error("Speech engine error: {0}")]
    Engine(String),
}

/// Backend-agnostic speech engine.
///
/// Implementations must be `Send + Sync`: callbacks fire from engine threads
/// or timer tasks while the owner keeps issuing commands.
pub trait SpeechGateway: Send + Sync {
    /// Submit `utterance` as a fresh narration, replacing any active one.
    fn speak(
        &self,
        utterance: &Utterance,
        on_end: UtteranceEndCallback,
    ) -> Result<(), SpeechError>;

    /// Hold the active utterance at its current position.
    fn pause(&self) -> Result<(), SpeechError>;

    /// Continue a paused utterance from where it was held.
    fn resume(&self) -> Result<(), SpeechError>;

    /// Abandon the active utterance, if any. Never fails on an idle engine.
    fn cancel(&self) -> Result<(), SpeechError>;

    /// Current voice list, in engine order. May be empty until populated.
    fn voices(&self) -> Vec<VoiceProfile>;

    /// Register a one-time notification for the next voice-list change.
    fn on_voices_changed(&self, callback: VoicesChangedCallback);
}

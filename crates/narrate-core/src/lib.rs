//! Core domain types and ports for text narration.
//!
//! This crate owns the vocabulary shared by every adapter: voice profiles,
//! playback parameters, the utterance descriptor, and the
//! [`SpeechGateway`](ports::SpeechGateway) port that speech engines implement.
//! It has no dependency on any concrete engine.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    PITCH, ParamSpec, PlaybackParams, PlaybackState, RATE, Utterance, VOLUME, VoiceProfile,
};
pub use ports::{SpeechError, SpeechGateway, UtteranceEndCallback, VoicesChangedCallback};
pub use settings::{NarrationSettings, SettingsError, validate_settings};


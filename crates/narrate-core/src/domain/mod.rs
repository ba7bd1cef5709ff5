//! Core domain types.
//!
//! These types represent the pure narration model, independent of any
//! speech engine.
//!
//! # Structure
//!
//! - `voice` - Voice profiles as enumerated by an engine
//! - `playback` - Transport state and the pitch/rate/volume parameters
//! - `utterance` - The text payload plus its applied playback snapshot

mod playback;
mod utterance;
mod voice;

pub use playback::{PITCH, ParamSpec, PlaybackParams, PlaybackState, RATE, VOLUME};
pub use utterance::Utterance;
pub use voice::VoiceProfile;

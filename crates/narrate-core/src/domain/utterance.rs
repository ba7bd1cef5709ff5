//! The utterance descriptor.

use std::sync::Arc;

use super::playback::PlaybackParams;
use super::voice::VoiceProfile;

/// One narration request: a fixed text plus the parameters applied when
/// playback starts.
///
/// The text never changes for the lifetime of a descriptor; a new text means
/// a new descriptor. The voice and parameters are overwritten on every fresh
/// submission with whatever the controller holds at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    text: Arc<str>,
    voice: Option<VoiceProfile>,
    params: PlaybackParams,
}

impl Utterance {
    /// Descriptor bound to `text`, with engine-default voice and parameters.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            params: PlaybackParams::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Voice to narrate with. `None` lets the engine pick its default.
    pub const fn voice(&self) -> Option<&VoiceProfile> {
        self.voice.as_ref()
    }

    pub const fn params(&self) -> PlaybackParams {
        self.params
    }

    /// Overwrite the playback snapshot ahead of a fresh submission.
    pub fn apply(&mut self, voice: Option<VoiceProfile>, params: PlaybackParams) {
        self.voice = voice;
        self.params = params;
    }

    /// Drop the applied snapshot, keeping the text.
    pub fn reset(&mut self) {
        self.voice = None;
        self.params = PlaybackParams::default();
    }

    /// Number of whitespace-separated words, used for duration estimates.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

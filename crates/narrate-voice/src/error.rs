//! Narration error types.

use narrate_core::SpeechError;

/// Errors surfaced by the session handle and engine constructors.
///
/// Controller operations never return these: a failed engine command is
/// logged and leaves the transport state where it was.
#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    /// The narration session has shut down.
    #[error("Narration session is closed")]
    SessionClosed,

    /// The speech engine could not be set up.
    #[error(transparent)]
    Speech(#[from] SpeechError),
}

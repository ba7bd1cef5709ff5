//! CLI-specific error types and mappings.
//!
//! Maps engine, settings and session errors onto exit codes and
//! user-facing messages.

use narrate_core::{SettingsError, SpeechError};
use narrate_voice::NarrationError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or setting out of its accepted domain.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The speech engine is missing or refused to start.
    #[error("Speech engine error: {0}")]
    Engine(String),

    /// The narration session stopped unexpectedly.
    #[error("Session error: {0}")]
    Session(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Session(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Engine(_) => 69,   // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<SpeechError> for CliError {
    fn from(err: SpeechError) -> Self {
        Self::Engine(err.to_string())
    }
}

impl From<NarrationError> for CliError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::SessionClosed => Self::Session(err.to_string()),
            NarrationError::Speech(speech) => speech.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
        assert_eq!(CliError::Engine("x".into()).exit_code(), 69);
    }

    #[test]
    fn test_settings_error_is_usage_error() {
        let err: CliError = SettingsError::EmptyVoice.into();
        assert!(matches!(err, CliError::Arguments(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_narration_error_mapping() {
        let closed: CliError = NarrationError::SessionClosed.into();
        assert!(matches!(closed, CliError::Session(_)));

        let engine: CliError =
            NarrationError::Speech(SpeechError::Unavailable("no service".into())).into();
        assert_eq!(engine.to_string(), "Speech engine error: Speech engine unavailable: no service");
    }
}

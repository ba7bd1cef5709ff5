//! Narration settings and validation.
//!
//! These are the user-facing defaults a control surface starts from. They
//! are pure domain types; adapters decide where the values come from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PITCH, ParamSpec, PlaybackParams, RATE, VOLUME};

/// Initial narration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationSettings {
    /// Preferred voice name. Falls back to the engine's first voice.
    pub voice: Option<String>,

    /// Pitch multiplier (0.5-2.0).
    pub pitch: f32,

    /// Rate multiplier (0.5-2.0).
    pub rate: f32,

    /// Volume (0.0-1.0).
    pub volume: f32,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            voice: None,
            pitch: PITCH.default,
            rate: RATE.default,
            volume: VOLUME.default,
        }
    }
}

impl NarrationSettings {
    /// Parameters to seed a controller with. Out-of-range values are clamped.
    pub fn params(&self) -> PlaybackParams {
        for (name, spec, value) in self.fields() {
            if !spec.contains(value) {
                tracing::warn!(
                    setting = name,
                    value,
                    min = spec.min,
                    max = spec.max,
                    "Setting out of range, clamping"
                );
            }
        }
        PlaybackParams::new(self.pitch, self.rate, self.volume)
    }

    const fn fields(&self) -> [(&'static str, ParamSpec, f32); 3] {
        [
            ("pitch", PITCH, self.pitch),
            ("rate", RATE, self.rate),
            ("volume", VOLUME, self.volume),
        ]
    }
}

/// Errors from settings validation.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Voice name must not be empty")]
    EmptyVoice,
}

/// Validate settings strictly, rejecting anything a slider could not produce.
pub fn validate_settings(settings: &NarrationSettings) -> Result<(), SettingsError> {
    if settings.voice.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return Err(SettingsError::EmptyVoice);
    }
    for (name, spec, value) in settings.fields() {
        if !spec.contains(value) {
            return Err(SettingsError::OutOfRange {
                name,
                value,
                min: spec.min,
                max: spec.max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_settings(&NarrationSettings::default()), Ok(()));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let settings = NarrationSettings {
            rate: 3.0,
            ..NarrationSettings::default()
        };
        let err = validate_settings(&settings).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { name: "rate", .. }));
    }

    #[test]
    fn nan_is_rejected() {
        let settings = NarrationSettings {
            volume: f32::NAN,
            ..NarrationSettings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn blank_voice_is_rejected() {
        let settings = NarrationSettings {
            voice: Some("  ".to_string()),
            ..NarrationSettings::default()
        };
        assert_eq!(validate_settings(&settings), Err(SettingsError::EmptyVoice));
    }

    #[test]
    fn params_clamp_out_of_range() {
        let settings = NarrationSettings {
            pitch: 0.1,
            ..NarrationSettings::default()
        };
        assert_eq!(settings.params(), PlaybackParams::new(0.5, 1.0, 1.0));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings: NarrationSettings = serde_json::from_str(r#"{"rate":1.5}"#).unwrap();
        assert_eq!(settings.params(), PlaybackParams::new(1.0, 1.5, 1.0));
        assert!(settings.voice.is_none());
    }
}

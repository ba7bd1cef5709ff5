//! Playback state and narration parameters.

use serde::{Deserialize, Serialize};

// ── Transport state ────────────────────────────────────────────────

/// Transport state of a narration.
///
/// ```text
///   Idle ──play──▶ Speaking ──pause──▶ Paused
///    ▲                │  ▲               │
///    │               stop └────play──────┘
///    └────stop────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing submitted, or the last submission finished or was cancelled.
    #[default]
    Idle,

    /// An utterance is being narrated.
    Speaking,

    /// The active utterance is held at its current position.
    Paused,
}

impl PlaybackState {
    /// Short lowercase label, used in logs and the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Speaking => "speaking",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Parameter domains ──────────────────────────────────────────────

/// Domain of one numeric playback parameter, as exposed by its slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Slider granularity.
    pub step: f32,
    /// Value used before the user touches the control.
    pub default: f32,
}

/// Pitch multiplier domain (1.0 = engine default pitch).
pub const PITCH: ParamSpec = ParamSpec {
    min: 0.5,
    max: 2.0,
    step: 0.1,
    default: 1.0,
};

/// Speaking rate multiplier domain (1.0 = engine default rate).
pub const RATE: ParamSpec = ParamSpec {
    min: 0.5,
    max: 2.0,
    step: 0.1,
    default: 1.0,
};

/// Output volume domain (0.0 = silent, 1.0 = full).
pub const VOLUME: ParamSpec = ParamSpec {
    min: 0.0,
    max: 1.0,
    step: 0.1,
    default: 1.0,
};

impl ParamSpec {
    /// Clamp `value` into `[min, max]`. NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Round `value` to the nearest slider step, then clamp.
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        let steps = ((clamped - self.min) / self.step).round();
        // Re-derive from an integer step count so repeated snapping is stable.
        let snapped = steps.mul_add(self.step, self.min);
        self.clamp((snapped * 1000.0).round() / 1000.0)
    }

    /// Whether `value` lies inside the domain.
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// ── Parameter set ──────────────────────────────────────────────────

/// Pitch, rate and volume applied to an utterance when playback starts.
///
/// Setters clamp to the parameter's domain, so a stored value is always
/// valid for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackParams {
    pitch: f32,
    rate: f32,
    volume: f32,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            pitch: PITCH.default,
            rate: RATE.default,
            volume: VOLUME.default,
        }
    }
}

impl PlaybackParams {
    /// Build a parameter set, clamping each value.
    pub fn new(pitch: f32, rate: f32, volume: f32) -> Self {
        Self {
            pitch: PITCH.clamp(pitch),
            rate: RATE.clamp(rate),
            volume: VOLUME.clamp(volume),
        }
    }

    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    pub const fn rate(&self) -> f32 {
        self.rate
    }

    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Store a pitch multiplier, clamped to [`PITCH`]. Returns the stored value.
    pub fn set_pitch(&mut self, pitch: f32) -> f32 {
        self.pitch = PITCH.clamp(pitch);
        self.pitch
    }

    /// Store a rate multiplier, clamped to [`RATE`]. Returns the stored value.
    pub fn set_rate(&mut self, rate: f32) -> f32 {
        self.rate = RATE.clamp(rate);
        self.rate
    }

    /// Store a volume, clamped to [`VOLUME`]. Returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = VOLUME.clamp(volume);
        self.volume
    }
}

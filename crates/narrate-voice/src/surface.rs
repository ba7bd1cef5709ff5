//! View model for the narration controls.
//!
//! The surface holds no state of its own. [`render`] builds a [`SurfaceView`]
//! from a controller snapshot plus the engine's voice list, which is queried
//! again on every render so late-arriving voices show up. [`dispatch`] maps
//! each user [`Intent`] onto exactly one controller operation.

use narrate_core::{PITCH, ParamSpec, PlaybackState, RATE, SpeechGateway, VOLUME};

use crate::controller::{NarrationController, NarrationSnapshot};

/// A user action on the controls.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Play / Resume button.
    Play,
    /// Pause button.
    Pause,
    /// Stop button.
    Stop,
    /// Voice selector, by voice name.
    SelectVoice(String),
    /// Pitch slider.
    SetPitch(f32),
    /// Rate ("Speed") slider.
    SetRate(f32),
    /// Volume slider.
    SetVolume(f32),
}

/// One entry of the voice selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    pub name: String,
    pub language: Option<String>,
    pub selected: bool,
}

/// One range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub label: &'static str,
    pub value: f32,
    pub spec: ParamSpec,
}

/// One transport button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub intent: &'static str,
}

/// Everything a front end needs to draw the controls.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceView {
    pub state: PlaybackState,
    pub loaded: bool,
    pub voices: Vec<VoiceOption>,
    pub sliders: [Slider; 3],
    pub buttons: [Button; 3],
}

impl SurfaceView {
    /// Name of the voice marked as selected, if it is in the list.
    pub fn selected_voice(&self) -> Option<&str> {
        self.voices
            .iter()
            .find(|v| v.selected)
            .map(|v| v.name.as_str())
    }

    /// Label of the primary transport button.
    pub fn primary_label(&self) -> &'static str {
        self.buttons[0].label
    }
}

/// Build the view for `snapshot`, re-reading the voice list from `gateway`.
pub fn render(snapshot: &NarrationSnapshot, gateway: &dyn SpeechGateway) -> SurfaceView {
    let selected = snapshot.voice.as_deref();
    let voices = gateway
        .voices()
        .into_iter()
        .map(|v| VoiceOption {
            selected: Some(v.name.as_str()) == selected,
            name: v.name,
            language: v.language,
        })
        .collect();

    let primary = if snapshot.state == PlaybackState::Paused {
        "Resume"
    } else {
        "Play"
    };

    SurfaceView {
        state: snapshot.state,
        loaded: snapshot.loaded,
        voices,
        sliders: [
            Slider {
                label: "Pitch",
                value: snapshot.params.pitch(),
                spec: PITCH,
            },
            Slider {
                label: "Speed",
                value: snapshot.params.rate(),
                spec: RATE,
            },
            Slider {
                label: "Volume",
                value: snapshot.params.volume(),
                spec: VOLUME,
            },
        ],
        buttons: [
            Button {
                label: primary,
                intent: "play",
            },
            Button {
                label: "Pause",
                intent: "pause",
            },
            Button {
                label: "Stop",
                intent: "stop",
            },
        ],
    }
}

/// Forward `intent` to the controller. Slider values snap to their step.
pub fn dispatch(controller: &mut NarrationController, intent: Intent) {
    tracing::trace!(?intent, "Dispatching intent");
    match intent {
        Intent::Play => controller.play(),
        Intent::Pause => controller.pause(),
        Intent::Stop => controller.stop(),
        Intent::SelectVoice(name) => controller.set_voice(&name),
        Intent::SetPitch(value) => controller.set_pitch(PITCH.snap(value)),
        Intent::SetRate(value) => controller.set_rate(RATE.snap(value)),
        Intent::SetVolume(value) => controller.set_volume(VOLUME.snap(value)),
    }
}

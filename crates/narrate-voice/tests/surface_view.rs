//! Tests for rendering the control surface and dispatching intents.

mod common;

use narrate_core::{PlaybackState, SpeechGateway};
use narrate_voice::surface::{dispatch, render};
use narrate_voice::{Intent, NarrationSnapshot};

use common::{RecordingGateway, controller};

#[test]
fn idle_surface_offers_play() {
    let gateway = RecordingGateway::with_voices(&["Voice-A", "Voice-B"]);
    let view = render(&NarrationSnapshot::default(), gateway.as_ref());

    assert_eq!(view.primary_label(), "Play");
    let labels: Vec<_> = view.buttons.iter().map(|b| b.label).collect();
    assert_eq!(labels, ["Play", "Pause", "Stop"]);
    let sliders: Vec<_> = view.sliders.iter().map(|s| s.label).collect();
    assert_eq!(sliders, ["Pitch", "Speed", "Volume"]);
    assert!(!view.loaded);
}

#[test]
fn paused_surface_offers_resume() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);
    controller.initialize("Hello world");
    controller.play();
    controller.pause();

    let view = render(&controller.snapshot(), gateway.as_ref());
    assert_eq!(view.state, PlaybackState::Paused);
    assert_eq!(view.primary_label(), "Resume");

    controller.play();
    let view = render(&controller.snapshot(), gateway.as_ref());
    assert_eq!(view.primary_label(), "Play");
}

#[test]
fn voice_list_is_read_again_on_every_render() {
    let gateway = RecordingGateway::empty();
    let (mut controller, _rx) = controller(&gateway);
    controller.initialize("Hello world");

    let before = render(&controller.snapshot(), gateway.as_ref());
    assert!(before.voices.is_empty());
    assert!(before.selected_voice().is_none());

    gateway.publish_voices(&["Voice-A", "Voice-B"]);
    controller.pump();

    let after = render(&controller.snapshot(), gateway.as_ref());
    let names: Vec<_> = after.voices.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["Voice-A", "Voice-B"]);
    assert_eq!(after.selected_voice(), Some("Voice-A"));
}

#[test]
fn selecting_a_voice_moves_the_selected_flag() {
    let gateway = RecordingGateway::with_voices(&["Voice-A", "Voice-B"]);
    let (mut controller, _rx) = controller(&gateway);
    controller.initialize("Hello world");

    dispatch(&mut controller, Intent::SelectVoice("Voice-B".to_string()));
    let view = render(&controller.snapshot(), gateway.as_ref());

    let selected: Vec<_> = view.voices.iter().map(|v| v.selected).collect();
    assert_eq!(selected, [false, true]);

    dispatch(&mut controller, Intent::SelectVoice("Nobody".to_string()));
    assert_eq!(controller.voice(), Some("Voice-B"));
}

#[test]
fn slider_values_snap_to_step() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    dispatch(&mut controller, Intent::SetPitch(1.26));
    dispatch(&mut controller, Intent::SetRate(9.0));
    dispatch(&mut controller, Intent::SetVolume(0.44));

    let params = controller.params();
    assert!((params.pitch() - 1.3).abs() < 1e-6);
    assert!((params.rate() - 2.0).abs() < 1e-6);
    assert!((params.volume() - 0.4).abs() < 1e-6);

    let view = render(&controller.snapshot(), gateway.as_ref());
    assert!((view.sliders[0].value - 1.3).abs() < 1e-6);
}

#[test]
fn transport_intents_reach_the_engine() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);
    controller.initialize("Hello world");

    dispatch(&mut controller, Intent::Play);
    dispatch(&mut controller, Intent::Pause);
    dispatch(&mut controller, Intent::Stop);

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(gateway.speaks(), 1);
    assert_eq!(gateway.cancels(), 1);
    assert_eq!(gateway.voices().len(), 1);
}

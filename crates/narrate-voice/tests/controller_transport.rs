//! Integration tests for the `NarrationController` transport state machine.
//!
//! These drive the controller against a recording gateway. Engine callbacks
//! (voice list ready, natural end of speech) are fired by hand, then fed back
//! through `pump()` the way the session loop would.

mod common;

use narrate_core::{PlaybackParams, PlaybackState};
use narrate_voice::{GatewayCommand, NarrationEvent};

use common::{RecordingGateway, controller, drain_events};

#[test]
fn initialize_then_teardown_cancels_without_speaking() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.teardown();

    assert_eq!(gateway.commands(), vec![GatewayCommand::Cancel]);
    assert!(!controller.is_loaded());

    // Dropping an already torn-down controller must not cancel again.
    drop(controller);
    assert_eq!(gateway.cancels(), 1);
}

#[test]
fn play_from_idle_submits_current_parameters() {
    let gateway = RecordingGateway::with_voices(&["Voice-A", "Voice-B"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.set_voice("Voice-B");
    controller.set_pitch(1.5);
    controller.set_rate(0.8);
    controller.set_volume(0.3);
    controller.play();

    assert_eq!(controller.state(), PlaybackState::Speaking);
    assert_eq!(
        gateway.commands(),
        vec![GatewayCommand::Speak {
            text: "Hello world".to_string(),
            voice: Some("Voice-B".to_string()),
            params: PlaybackParams::new(1.5, 0.8, 0.3),
        }]
    );
}

#[test]
fn play_while_paused_resumes_without_resubmitting() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();
    controller.pause();
    assert_eq!(controller.state(), PlaybackState::Paused);

    controller.play();
    assert_eq!(controller.state(), PlaybackState::Speaking);
    assert_eq!(gateway.speaks(), 1);
    assert_eq!(
        &gateway.commands()[1..],
        &[GatewayCommand::Pause, GatewayCommand::Resume]
    );
}

#[test]
fn parameter_changes_are_not_retroactive() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();
    controller.set_rate(2.0);
    controller.pause();
    controller.play();

    // Only the resume followed; the engine never saw the new rate.
    assert_eq!(gateway.speaks(), 1);
    let first = controller.utterance().map(|u| u.params().rate());
    assert_eq!(first, Some(1.0));
}

#[test]
fn stop_then_play_submits_fresh() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, mut rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();
    controller.pause();
    controller.stop();
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(controller.is_loaded());

    controller.play();
    assert_eq!(controller.state(), PlaybackState::Speaking);
    assert_eq!(gateway.speaks(), 2);
    assert!(!gateway.commands().contains(&GatewayCommand::Resume));

    let states: Vec<PlaybackState> = drain_events(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            NarrationEvent::StateChanged(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            PlaybackState::Speaking,
            PlaybackState::Paused,
            PlaybackState::Idle,
            PlaybackState::Speaking,
        ]
    );
}

#[test]
fn pitch_is_clamped_before_storage() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.set_pitch(7.0);
    assert!((controller.params().pitch() - 2.0).abs() < f32::EPSILON);

    controller.set_pitch(0.0);
    assert!((controller.params().pitch() - 0.5).abs() < f32::EPSILON);

    controller.set_volume(-1.0);
    assert!(controller.params().volume().abs() < f32::EPSILON);
}

#[test]
fn first_voice_is_adopted_once_engine_reports_it() {
    let gateway = RecordingGateway::empty();
    let (mut controller, mut rx) = controller(&gateway);

    controller.initialize("Hello world");
    assert!(controller.voice().is_none());
    assert_eq!(gateway.watchers(), 1);

    gateway.publish_voices(&["Voice-A"]);
    assert_eq!(controller.pump(), 1);

    assert_eq!(controller.voice(), Some("Voice-A"));
    assert!(
        drain_events(&mut rx).contains(&NarrationEvent::VoiceSelected(Some("Voice-A".to_string())))
    );
}

#[test]
fn play_before_voices_arrive_uses_engine_default() {
    let gateway = RecordingGateway::empty();
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();

    assert_eq!(controller.state(), PlaybackState::Speaking);
    assert!(matches!(
        gateway.commands().first(),
        Some(GatewayCommand::Speak { voice: None, .. })
    ));
}

#[test]
fn empty_voice_notification_registers_again() {
    let gateway = RecordingGateway::empty();
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    gateway.publish_voices(&[]);
    controller.pump();
    assert_eq!(gateway.watchers(), 1);

    gateway.publish_voices(&["Voice-A"]);
    controller.pump();
    assert_eq!(controller.voice(), Some("Voice-A"));
}

#[test]
fn teardown_while_speaking_cancels_once_and_ignores_transport() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();
    controller.teardown();

    controller.pause();
    controller.play();
    drop(controller);

    assert_eq!(gateway.cancels(), 1);
    assert_eq!(
        gateway.commands(),
        vec![
            GatewayCommand::Speak {
                text: "Hello world".to_string(),
                voice: Some("Voice-A".to_string()),
                params: PlaybackParams::default(),
            },
            GatewayCommand::Cancel,
        ]
    );
}

#[test]
fn dropping_a_loaded_controller_cancels() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    {
        let (mut controller, _rx) = controller(&gateway);
        controller.initialize("Hello world");
        controller.play();
    }
    assert_eq!(gateway.cancels(), 1);
}

#[test]
fn reinitialize_tears_down_previous_text() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("first text");
    controller.play();
    controller.initialize("second text");

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.utterance().map(|u| u.text()), Some("second text"));
    assert_eq!(gateway.cancels(), 1);
}

#[test]
fn natural_end_returns_to_idle() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();
    assert!(gateway.finish());
    controller.pump();

    assert_eq!(controller.state(), PlaybackState::Idle);

    // A fresh play follows, not a resume.
    controller.play();
    assert_eq!(gateway.speaks(), 2);
}

#[test]
fn end_from_cancelled_submission_is_ignored() {
    let gateway = RecordingGateway::with_voices(&["Voice-A"]);
    let (mut controller, _rx) = controller(&gateway);

    controller.initialize("Hello world");
    controller.play();
    controller.stop();
    controller.play();

    // A late end for the first submission must not reset the second.
    controller.handle_signal(narrate_voice::GatewaySignal::UtteranceEnded { submission: 1 });
    assert_eq!(controller.state(), PlaybackState::Speaking);
}

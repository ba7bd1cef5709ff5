//! Read command handler.
//!
//! Loads the text into a narration session and runs the interactive prompt.
//! Prompt lines become control-surface intents; controller events are echoed
//! back as they happen.

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use narrate_core::{PlaybackState, validate_settings};
use narrate_voice::surface::render;
use narrate_voice::{
    Intent, NarrationController, NarrationError, NarrationEvent, NarrationSession,
    NarrationSnapshot, SessionHandle, SurfaceView,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{mpsc, watch};

use crate::bootstrap::CliContext;
use crate::commands::ReadArgs;
use crate::error::CliError;
use crate::presentation::{format_surface, format_voices};
use crate::repl::{HELP, ReplCommand};

/// How long to wait for narration to start once input has closed.
const START_GRACE: Duration = Duration::from_millis(500);

/// Execute the read command.
///
/// Returns when the user quits, or when input closes and no narration is
/// running. Any narration still going is cancelled on the way out.
pub async fn execute(ctx: &CliContext, args: ReadArgs) -> Result<()> {
    let settings = args.settings();
    validate_settings(&settings).map_err(CliError::from)?;

    let text = match (&args.file, &args.text) {
        (None, None) => read_stdin()?,
        (file, text) => load_text(file.as_deref(), text.as_deref())?,
    };

    let (controller, mut events) =
        NarrationController::with_settings(Arc::clone(ctx.gateway()), &settings);
    let (session, handle) = NarrationSession::new(controller);
    let session_task = tokio::spawn(session.run());

    if args.show_text {
        println!("{}\n", text.trim_end());
    }
    handle.load(text).map_err(CliError::from)?;
    if args.autoplay {
        handle.send(Intent::Play).map_err(CliError::from)?;
    }
    println!("Type 'help' for commands.");

    let mut lines = spawn_prompt()?;
    let mut input_open = true;
    let mut snapshots = handle.subscribe();
    let mut surface_pending = true;

    loop {
        tokio::select! {
            line = lines.recv(), if input_open => match line {
                Some(line) => {
                    if !run_line(ctx, &handle, &line)? {
                        break;
                    }
                }
                None => {
                    input_open = false;
                    if !narration_started(&handle).await {
                        tracing::debug!(state = %handle.snapshot().state, "Input closed, nothing narrating");
                        break;
                    }
                    println!("Input closed, narrating to the end.");
                }
            },

            loaded = loaded_view(ctx, &mut snapshots), if surface_pending => {
                surface_pending = false;
                match loaded {
                    Some(view) => println!("{}", format_surface(&view)),
                    None => break,
                }
            },

            event = events.recv() => match event {
                Some(event) => {
                    if let Some(message) = describe_event(&event) {
                        println!("{message}");
                    }
                    if !input_open && event == NarrationEvent::StateChanged(PlaybackState::Idle) {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    match handle.close() {
        Ok(()) | Err(NarrationError::SessionClosed) => {}
        Err(e) => return Err(CliError::from(e).into()),
    }
    let controller = session_task
        .await
        .map_err(|e| CliError::Session(e.to_string()))?;
    tracing::debug!(state = %controller.state(), "Read session finished");

    Ok(())
}

/// Apply one prompt line. Returns `false` when the user asked to quit.
fn run_line(ctx: &CliContext, handle: &SessionHandle, line: &str) -> Result<bool> {
    match ReplCommand::parse(line) {
        Ok(ReplCommand::Quit) => return Ok(false),
        Ok(ReplCommand::Intent(intent)) => handle.send(intent).map_err(CliError::from)?,
        Ok(ReplCommand::Voices) => println!("{}", format_voices(&view(ctx, handle).voices)),
        Ok(ReplCommand::Status) => println!("{}", format_surface(&view(ctx, handle))),
        Ok(ReplCommand::Help) => println!("{HELP}"),
        Ok(ReplCommand::Empty) => {}
        Err(e) => eprintln!("{e}"),
    }
    Ok(true)
}

fn view(ctx: &CliContext, handle: &SessionHandle) -> SurfaceView {
    render(&handle.snapshot(), ctx.gateway().as_ref())
}

/// View of the first published snapshot with text loaded.
///
/// `None` once the session has shut down.
async fn loaded_view(
    ctx: &CliContext,
    snapshots: &mut watch::Receiver<NarrationSnapshot>,
) -> Option<SurfaceView> {
    let snapshot = snapshots.wait_for(|s| s.loaded).await.ok()?.clone();
    Some(render(&snapshot, ctx.gateway().as_ref()))
}

/// Whether narration is audibly running, allowing a queued play a moment to land.
///
/// A paused narration does not count: with input closed nothing could resume it.
async fn narration_started(handle: &SessionHandle) -> bool {
    let mut snapshots = handle.subscribe();
    let started = snapshots.wait_for(|s| s.state == PlaybackState::Speaking);
    matches!(tokio::time::timeout(START_GRACE, started).await, Ok(Ok(_)))
}

/// Load the narration text from a file or the `--text` flag.
pub fn load_text(file: Option<&Path>, text: Option<&str>) -> Result<String, CliError> {
    let text = match (file, text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?,
        (None, Some(text)) => text.to_string(),
        (None, None) => {
            return Err(CliError::Arguments(
                "provide --file, --text or pipe text on stdin".to_string(),
            ));
        }
    };

    if text.trim().is_empty() {
        return Err(CliError::Arguments("nothing to narrate: the text is empty".to_string()));
    }
    Ok(text)
}

fn read_stdin() -> Result<String, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return load_text(None, None);
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    load_text(None, Some(&buffer))
}

/// Read prompt lines on a dedicated thread. The channel closes on EOF.
fn spawn_prompt() -> Result<mpsc::UnboundedReceiver<String>, CliError> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("narrate-prompt".to_string())
        .spawn(move || {
            let mut editor = match DefaultEditor::new() {
                Ok(editor) => editor,
                Err(e) => {
                    tracing::warn!(error = %e, "Interactive prompt unavailable");
                    return;
                }
            };
            loop {
                match editor.readline("narrate> ") {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = editor.add_history_entry(line.as_str());
                        }
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    // Ctrl-C quits right away; Ctrl-D lets narration finish.
                    Err(ReadlineError::Interrupted) => {
                        let _ = tx.send("quit".to_string());
                        break;
                    }
                    Err(ReadlineError::Eof) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "Prompt read failed");
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// One-line description of a controller event, if it is worth printing.
pub fn describe_event(event: &NarrationEvent) -> Option<String> {
    match event {
        NarrationEvent::StateChanged(state) => Some(format!("[{state}]")),
        NarrationEvent::VoiceSelected(Some(voice)) => Some(format!("Voice: {voice}")),
        NarrationEvent::ParamsChanged(params) => Some(format!(
            "Pitch {:.1}  Speed {:.1}  Volume {:.1} (from the next play)",
            params.pitch(),
            params.rate(),
            params.volume()
        )),
        NarrationEvent::TextLoaded { words } => Some(format!("Loaded {words} word(s).")),
        NarrationEvent::VoiceSelected(None) | NarrationEvent::TornDown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap_with_simulated;
    use narrate_core::PlaybackParams;
    use std::io::Write;

    fn start_session(ctx: &CliContext) -> SessionHandle {
        let (controller, _events) = NarrationController::new(Arc::clone(ctx.gateway()));
        let (session, handle) = NarrationSession::new(controller);
        tokio::spawn(session.run());
        handle
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_narration_does_not_outlive_input() {
        let ctx = bootstrap_with_simulated(Duration::ZERO);
        let handle = start_session(&ctx);

        handle.load("one two three").unwrap();
        handle.send(Intent::Play).unwrap();
        handle.send(Intent::Pause).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().state, PlaybackState::Paused);

        assert!(!narration_started(&handle).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speaking_narration_outlives_input() {
        let ctx = bootstrap_with_simulated(Duration::ZERO);
        let handle = start_session(&ctx);

        handle.load("one two three").unwrap();
        handle.send(Intent::Play).unwrap();

        assert!(narration_started(&handle).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_narration_does_not_outlive_input() {
        let ctx = bootstrap_with_simulated(Duration::ZERO);
        let handle = start_session(&ctx);

        handle.load("one two three").unwrap();
        assert!(!narration_started(&handle).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_surface_waits_for_loaded_snapshot() {
        let ctx = bootstrap_with_simulated(Duration::ZERO);
        let handle = start_session(&ctx);
        let mut snapshots = handle.subscribe();

        handle.load("one two three").unwrap();
        let view = loaded_view(&ctx, &mut snapshots).await.unwrap();

        assert!(view.loaded);
        assert_eq!(view.selected_voice(), Some("Aria"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_surface_gives_up_when_session_closes() {
        let ctx = bootstrap_with_simulated(Duration::ZERO);
        let handle = start_session(&ctx);
        let mut snapshots = handle.subscribe();

        handle.close().unwrap();
        assert!(loaded_view(&ctx, &mut snapshots).await.is_none());
    }

    #[test]
    fn test_load_text_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Once upon a time.").unwrap();

        let text = load_text(Some(file.path()), None).unwrap();
        assert_eq!(text.trim(), "Once upon a time.");
    }

    #[test]
    fn test_load_text_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = load_text(Some(&missing), None).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_load_text_rejects_blank_text() {
        let err = load_text(None, Some("   \n")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(load_text(None, None).is_err());
    }

    #[test]
    fn test_describe_event() {
        assert_eq!(
            describe_event(&NarrationEvent::StateChanged(PlaybackState::Paused)).as_deref(),
            Some("[paused]")
        );
        assert_eq!(
            describe_event(&NarrationEvent::ParamsChanged(PlaybackParams::new(1.0, 1.5, 0.5)))
                .as_deref(),
            Some("Pitch 1.0  Speed 1.5  Volume 0.5 (from the next play)")
        );
        assert!(describe_event(&NarrationEvent::TornDown).is_none());
    }
}

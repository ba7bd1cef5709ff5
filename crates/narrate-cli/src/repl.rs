//! Interactive prompt commands.
//!
//! Each line typed at the `read` prompt parses into one [`ReplCommand`].
//! Transport and parameter commands become control-surface intents and
//! are forwarded to the session unchanged.

use narrate_voice::Intent;
use thiserror::Error;

/// Help text printed by the `help` command.
pub const HELP: &str = "\
Commands:
  play | resume         start narrating, or resume after a pause
  pause                 hold the narration
  stop                  stop and rewind to the beginning
  voice <name>          choose a voice for the next play
  pitch <0.5-2.0>       pitch multiplier for the next play
  rate <0.5-2.0>        speaking rate for the next play (alias: speed)
  volume <0.0-1.0>      volume for the next play
  voices                list available voices
  status                show the controls
  help                  show this help
  quit                  stop narrating and exit";

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Forward to the control surface.
    Intent(Intent),
    Voices,
    Status,
    Help,
    Quit,
    /// Blank line.
    Empty,
}

/// Why a prompt line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("'{0}' needs a value")]
    MissingArgument(&'static str),

    #[error("'{value}' is not a number (for '{command}')")]
    InvalidNumber { command: &'static str, value: String },
}

impl ReplCommand {
    /// Parse one prompt line. Command words are case-insensitive.
    pub fn parse(line: &str) -> Result<Self, ReplError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "play" | "resume" => Self::Intent(Intent::Play),
            "pause" => Self::Intent(Intent::Pause),
            "stop" => Self::Intent(Intent::Stop),
            "voice" => {
                if rest.is_empty() {
                    return Err(ReplError::MissingArgument("voice"));
                }
                Self::Intent(Intent::SelectVoice(rest.to_string()))
            }
            "pitch" => Self::Intent(Intent::SetPitch(number("pitch", rest)?)),
            "rate" | "speed" => Self::Intent(Intent::SetRate(number("rate", rest)?)),
            "volume" => Self::Intent(Intent::SetVolume(number("volume", rest)?)),
            "voices" => Self::Voices,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ReplError::Unknown(word.to_string())),
        };
        Ok(command)
    }
}

fn number(command: &'static str, value: &str) -> Result<f32, ReplError> {
    if value.is_empty() {
        return Err(ReplError::MissingArgument(command));
    }
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ReplError::InvalidNumber {
            command,
            value: value.to_string(),
        })
}

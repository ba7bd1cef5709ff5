//! Main commands enum and per-command arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use narrate_core::NarrationSettings;

/// Available commands for the narration tool.
#[derive(Subcommand)]
pub enum Commands {
    /// Load a text and control its narration from an interactive prompt
    Read(ReadArgs),

    /// List the voices the speech engine offers
    Voices {
        /// Print the voice list as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for the read command.
///
/// With neither `--file` nor `--text`, the text is read from piped stdin.
#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Text file to narrate
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Text to narrate
    #[arg(short, long)]
    pub text: Option<String>,

    /// Preferred voice, kept once the engine lists it
    #[arg(long, env = "NARRATE_VOICE")]
    pub voice: Option<String>,

    /// Pitch multiplier (0.5 - 2.0)
    #[arg(long, env = "NARRATE_PITCH", default_value_t = 1.0)]
    pub pitch: f32,

    /// Speaking rate multiplier (0.5 - 2.0)
    #[arg(long, env = "NARRATE_RATE", default_value_t = 1.0)]
    pub rate: f32,

    /// Output volume (0.0 - 1.0)
    #[arg(long, env = "NARRATE_VOLUME", default_value_t = 1.0)]
    pub volume: f32,

    /// Print the loaded text above the controls
    #[arg(long)]
    pub show_text: bool,

    /// Start narrating as soon as the text is loaded
    #[arg(long)]
    pub autoplay: bool,
}

impl ReadArgs {
    /// Initial controller settings from the flags.
    pub fn settings(&self) -> NarrationSettings {
        NarrationSettings {
            voice: self.voice.clone(),
            pitch: self.pitch,
            rate: self.rate,
            volume: self.volume,
        }
    }
}

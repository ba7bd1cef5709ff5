//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::bootstrap::Backend;
use crate::commands::Commands;

/// Command-line interface for narrating text with synthesized speech.
///
/// Global options pick and tune the speech engine; subcommands do the work.
#[derive(Parser)]
#[command(name = "narrate")]
#[command(about = "Read text aloud with play, pause and stop controls")]
#[command(version)]
pub struct Cli {
    /// Speech engine to narrate with
    #[arg(
        long,
        global = true,
        value_enum,
        env = "NARRATE_BACKEND",
        default_value_t = Backend::Simulated
    )]
    pub backend: Backend,

    /// How long the simulated engine keeps its voice list empty
    #[arg(long = "voices-delay-ms", global = true, default_value_t = 250)]
    pub voices_delay_ms: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

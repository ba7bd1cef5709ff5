//! Command-line front end for narrate.
//!
//! Loads a text, wires a speech engine into a narration session and exposes
//! the control surface at an interactive prompt.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod repl;

// Re-export primary types for convenient access
pub use bootstrap::{
    Backend, CliConfig, CliContext, bootstrap, bootstrap_with, bootstrap_with_simulated,
};
pub use commands::{Commands, ReadArgs};
pub use error::CliError;
pub use parser::Cli;

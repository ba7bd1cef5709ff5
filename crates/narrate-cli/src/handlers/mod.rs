//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Drive the narration session or query the engine
//!   3. Format output for the terminal
//!
//! Transport logic lives in `narrate-voice`, never here.

pub mod read;
pub mod voices;

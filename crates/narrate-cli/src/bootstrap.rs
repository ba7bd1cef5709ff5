//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where a concrete speech engine is chosen
//! and instantiated. Command handlers receive the composed [`CliContext`]
//! and only ever see the [`SpeechGateway`] port.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use narrate_core::SpeechGateway;
use narrate_voice::{SimulatedGateway, SimulatedGatewayConfig};

use crate::error::CliError;

/// Speech engine selectable with `--backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// In-process engine that narrates on a timer (no audio).
    Simulated,
    /// The operating system's speech service.
    Platform,
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Which engine to narrate with.
    pub backend: Backend,
    /// Delay before the simulated engine reports its voices.
    pub voices_delay: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Simulated,
            voices_delay: Duration::ZERO,
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// The engine every command narrates through.
    pub gateway: Arc<dyn SpeechGateway>,
    /// Engine that was selected.
    pub backend: Backend,
}

impl CliContext {
    /// Access the speech engine.
    pub const fn gateway(&self) -> &Arc<dyn SpeechGateway> {
        &self.gateway
    }
}

/// Bootstrap the CLI application.
///
/// Must be called inside a Tokio runtime: the simulated engine schedules its
/// voice list and utterance timers on it.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let ctx = match config.backend {
        Backend::Simulated => bootstrap_with_simulated(config.voices_delay),
        Backend::Platform => bootstrap_with(platform_gateway()?, Backend::Platform),
    };

    tracing::debug!(backend = ?ctx.backend, "Speech engine ready");

    Ok(ctx)
}

/// Bootstrap around an existing engine (for testing).
pub fn bootstrap_with(gateway: Arc<dyn SpeechGateway>, backend: Backend) -> CliContext {
    CliContext { gateway, backend }
}

/// Context around a fresh simulated engine.
pub fn bootstrap_with_simulated(voices_delay: Duration) -> CliContext {
    let gateway = SimulatedGateway::new(SimulatedGatewayConfig {
        voices_delay,
        ..SimulatedGatewayConfig::default()
    });
    bootstrap_with(Arc::new(gateway), Backend::Simulated)
}

#[cfg(feature = "platform")]
fn platform_gateway() -> Result<Arc<dyn SpeechGateway>, CliError> {
    let gateway = narrate_voice::PlatformGateway::new()?;
    Ok(Arc::new(gateway))
}

#[cfg(not(feature = "platform"))]
fn platform_gateway() -> Result<Arc<dyn SpeechGateway>, CliError> {
    Err(CliError::Config(
        "narrate was built without the `platform` feature".to_string(),
    ))
}

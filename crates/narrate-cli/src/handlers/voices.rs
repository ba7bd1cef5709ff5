//! Voices command handler.
//!
//! Lists the voices the selected speech engine offers.

use std::time::Duration;

use anyhow::Result;
use narrate_core::VoiceProfile;

use crate::bootstrap::CliContext;
use crate::presentation::{print_separator, truncate_string};

/// Upper bound on how long to wait for an engine that populates its voices late.
const VOICES_TIMEOUT: Duration = Duration::from_secs(5);

/// Execute the voices command.
///
/// Engines may report an empty list until they finish loading; in that case
/// this waits for the engine's voices-changed notification, up to a timeout.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let voices = wait_for_voices(ctx, VOICES_TIMEOUT).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&voices)?);
        return Ok(());
    }

    if voices.is_empty() {
        println!("The speech engine reports no voices; its default voice will be used.");
        return Ok(());
    }

    println!("Found {} voice(s):\n", voices.len());
    println!("{:<32} {:<10} ID", "Name", "Language");
    print_separator(72);
    for voice in &voices {
        println!(
            "{:<32} {:<10} {}",
            truncate_string(&voice.name, 31),
            voice.language.as_deref().unwrap_or("--"),
            truncate_string(&voice.id, 28)
        );
    }

    Ok(())
}

/// Current voice list, waiting up to `timeout` if it starts out empty.
pub async fn wait_for_voices(ctx: &CliContext, timeout: Duration) -> Vec<VoiceProfile> {
    let voices = ctx.gateway().voices();
    if !voices.is_empty() {
        return voices;
    }

    let (tx, rx) = tokio::sync::oneshot::channel();
    ctx.gateway().on_voices_changed(Box::new(move || {
        let _ = tx.send(());
    }));

    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(())) => ctx.gateway().voices(),
        Ok(Err(_)) | Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis(), "No voices reported in time");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{Backend, bootstrap_with};
    use narrate_voice::{SimulatedGateway, SimulatedGatewayConfig};
    use std::sync::Arc;

    #[test]
    fn test_ready_voices_are_returned_immediately() {
        let gateway = SimulatedGateway::new(SimulatedGatewayConfig::default());
        let ctx = bootstrap_with(Arc::new(gateway), Backend::Simulated);

        let voices = tokio_test::block_on(wait_for_voices(&ctx, Duration::ZERO));
        let names: Vec<&str> = voices.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["Aria", "Brian", "Chloe"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_voices_are_awaited() {
        let gateway = SimulatedGateway::new(SimulatedGatewayConfig {
            voices_delay: Duration::from_millis(400),
            ..SimulatedGatewayConfig::default()
        });
        let ctx = bootstrap_with(Arc::new(gateway), Backend::Simulated);

        let voices = wait_for_voices(&ctx, Duration::from_secs(1)).await;
        assert_eq!(voices.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_engine_times_out_empty() {
        let gateway = SimulatedGateway::new(SimulatedGatewayConfig {
            voices: Vec::new(),
            ..SimulatedGatewayConfig::default()
        });
        let ctx = bootstrap_with(Arc::new(gateway), Backend::Simulated);

        let voices = wait_for_voices(&ctx, Duration::from_millis(100)).await;
        assert!(voices.is_empty());
    }
}

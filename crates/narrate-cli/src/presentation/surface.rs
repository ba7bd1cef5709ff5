//! Text rendering of the control surface.

use std::fmt::Write;

use narrate_core::ParamSpec;
use narrate_voice::{Slider, SurfaceView, VoiceOption};

use super::tables::truncate_string;

const BAR_WIDTH: usize = 15;

/// Render the whole control surface as a block of text.
pub fn format_surface(view: &SurfaceView) -> String {
    let mut out = String::new();

    let voice = view.selected_voice().unwrap_or("engine default");
    let _ = writeln!(out, "  State   {}", view.state);
    let _ = writeln!(
        out,
        "  Voice   {}  ({} available)",
        truncate_string(voice, 32),
        view.voices.len()
    );
    for slider in &view.sliders {
        let _ = writeln!(out, "  {}", format_slider(slider));
    }

    let buttons: Vec<String> = view
        .buttons
        .iter()
        .map(|b| format!("[ {} ]", b.label))
        .collect();
    let _ = write!(out, "  {}", buttons.join(" "));
    if !view.loaded {
        out.push_str("  (no text loaded)");
    }
    out
}

/// Render the voice selector as a table, marking the selected voice.
pub fn format_voices(voices: &[VoiceOption]) -> String {
    if voices.is_empty() {
        return "  No voices reported yet; the engine default will be used.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "    {:<32} Language", "Name");
    for voice in voices {
        let marker = if voice.selected { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "  {marker} {:<32} {}",
            truncate_string(&voice.name, 32),
            voice.language.as_deref().unwrap_or("--")
        );
    }
    out.truncate(out.trim_end().len());
    out
}

fn format_slider(slider: &Slider) -> String {
    format!(
        "{:<7} {} {:.1}  ({:.1}-{:.1})",
        slider.label,
        slider_bar(slider.value, &slider.spec, BAR_WIDTH),
        slider.value,
        slider.spec.min,
        slider.spec.max
    )
}

/// Draw `value` as a fill bar `width` cells wide.
pub fn slider_bar(value: f32, spec: &ParamSpec, width: usize) -> String {
    let span = spec.max - spec.min;
    let fraction = if span > 0.0 {
        ((spec.clamp(value) - spec.min) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = (fraction * width as f32).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled.min(width)))
}

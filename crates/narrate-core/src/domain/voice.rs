//! Voice profiles.

use serde::{Deserialize, Serialize};

/// A selectable synthesized voice, as enumerated by a speech engine.
///
/// Profiles are owned by the engine. Callers hold on to a profile's
/// [`name`](Self::name) and look it up again when they need the profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    /// Engine-specific voice identifier.
    pub id: String,

    /// Human-readable name, unique within one engine's list.
    pub name: String,

    /// BCP 47 language tag, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl VoiceProfile {
    /// Profile whose id doubles as its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            language: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Find a profile by name in an engine's list.
    pub fn find<'a>(voices: &'a [Self], name: &str) -> Option<&'a Self> {
        voices.iter().find(|v| v.name == name)
    }
}

//! User-facing AI settings.
//!
//! # Invariants
//! - `model` is always one of the fixed presets.
//! - `api_key` is stored as plain text. This is the accepted trust boundary
//!   for a single-user local store; what is shown is what is persisted.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fixed list of model identifiers the AI backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelPreset {
    #[default]
    #[serde(rename = "gpt-4.1-mini")]
    Gpt41Mini,
    #[serde(rename = "gpt-4.1")]
    Gpt41,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "o4-mini")]
    O4Mini,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 5] = [
        ModelPreset::Gpt41Mini,
        ModelPreset::Gpt41,
        ModelPreset::Gpt4oMini,
        ModelPreset::Gpt4o,
        ModelPreset::O4Mini,
    ];

    /// Wire identifier sent to the AI backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt41Mini => "gpt-4.1-mini",
            Self::Gpt41 => "gpt-4.1",
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4o => "gpt-4o",
            Self::O4Mini => "o4-mini",
        }
    }

    /// Parses a wire identifier; unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|preset| preset.as_str() == value)
    }

    /// Parses a wire identifier, falling back to the default preset.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

impl Display for ModelPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials and model choice for AI-assisted operations.
#[derive(Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub api_key: String,
    pub model: ModelPreset,
}

impl AppSettings {
    /// Returns whether an API key is configured (non-blank).
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// Keeps the key out of debug output and therefore out of logs.
impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<empty>" })
            .field("model", &self.model)
            .finish()
    }
}

/// Partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub api_key: Option<String>,
    pub model: Option<ModelPreset>,
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, ModelPreset};

    #[test]
    fn parse_falls_back_to_default_preset() {
        assert_eq!(ModelPreset::parse_or_default("gpt-4o"), ModelPreset::Gpt4o);
        assert_eq!(
            ModelPreset::parse_or_default("gpt-9-ultra"),
            ModelPreset::Gpt41Mini
        );
        assert_eq!(ModelPreset::parse(""), None);
    }

    #[test]
    fn preset_serializes_as_wire_identifier() {
        let json = serde_json::to_value(ModelPreset::O4Mini).unwrap();
        assert_eq!(json, "o4-mini");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let settings = AppSettings {
            api_key: "sk-secret".to_string(),
            model: ModelPreset::default(),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<set>"));
        assert!(!AppSettings::default().has_api_key());
    }
}

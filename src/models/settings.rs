use serde::{Deserialize, Serialize};

use crate::config;

/// Practitioner letterhead, printed on PDF reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Therapist {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub siret: String,
}

fn default_title() -> String {
    "Somatopathe".to_string()
}

impl Default for Therapist {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: default_title(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            siret: String::new(),
        }
    }
}

impl Therapist {
    /// Contact line for report footers: phone / email / SIRET, present parts only.
    pub fn contact_line(&self) -> String {
        let mut parts = Vec::new();
        if !self.phone.is_empty() {
            parts.push(self.phone.clone());
        }
        if !self.email.is_empty() {
            parts.push(self.email.clone());
        }
        if !self.siret.is_empty() {
            parts.push(format!("SIRET: {}", self.siret));
        }
        parts.join(" - ")
    }
}

/// AI analysis settings (persisted via the preferences repository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    config::DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    config::DEFAULT_OLLAMA_URL.to_string()
}

fn default_timeout() -> u64 {
    config::DEFAULT_OLLAMA_TIMEOUT_SECS
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Display preferences (persisted via the preferences repository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub dark_mode: bool,
    /// "tabs" or "all" (every grid on one screen).
    #[serde(default = "default_view_mode")]
    pub default_view_mode: String,
    #[serde(default)]
    pub animation_reduced: bool,
    #[serde(default)]
    pub compact_mode: bool,
}

fn default_view_mode() -> String {
    "tabs".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            default_view_mode: default_view_mode(),
            animation_reduced: false,
            compact_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn therapist_defaults_to_somatopathe_title() {
        let t = Therapist::default();
        assert_eq!(t.title, "Somatopathe");
    }

    #[test]
    fn contact_line_skips_empty_parts() {
        let t = Therapist {
            phone: "06 12 34 56 78".into(),
            siret: "123 456 789 00010".into(),
            ..Therapist::default()
        };
        assert_eq!(t.contact_line(), "06 12 34 56 78 - SIRET: 123 456 789 00010");
    }

    #[test]
    fn contact_line_empty_when_nothing_set() {
        assert!(Therapist::default().contact_line().is_empty());
    }

    #[test]
    fn ai_settings_default_to_local_ollama() {
        let s = AiSettings::default();
        assert_eq!(s.model, "llama3");
        assert_eq!(s.base_url, "http://localhost:11434");
    }

    #[test]
    fn ai_settings_fill_missing_fields_from_defaults() {
        let s: AiSettings = serde_json::from_str(r#"{"model":"mistral"}"#).unwrap();
        assert_eq!(s.model, "mistral");
        assert_eq!(s.base_url, "http://localhost:11434");
        assert_eq!(s.timeout_secs, 300);
    }

    #[test]
    fn ui_settings_default_to_light_tabbed_view() {
        let s = UiSettings::default();
        assert!(!s.dark_mode);
        assert_eq!(s.default_view_mode, "tabs");
        assert!(!s.compact_mode);
    }
}

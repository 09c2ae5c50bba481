//! Symbolic interpretations of grid elements.
//!
//! A built-in table ships with the application; practitioners can override
//! entries, and overrides merge field-by-field over the built-ins. Lookups
//! go through one canonical key (trimmed, upper-cased) computed when the
//! catalog is built, so resolving a label is a single map access.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_INTERPRETATIONS: &str = include_str!("../resources/element_interpretations.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot read interpretations from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("cannot parse interpretations: {0}")]
    Parse(String),
}

/// Interpretation of one grid element. The long field names are the
/// historical JSON keys; overrides may use the short forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(
        default,
        rename = "Psychisme",
        alias = "psych",
        skip_serializing_if = "Option::is_none"
    )]
    pub psych: Option<String>,
    #[serde(
        default,
        rename = "Lien Pied",
        alias = "lien",
        skip_serializing_if = "Option::is_none"
    )]
    pub lien: Option<String>,
}

impl Interpretation {
    /// Whether either field carries text.
    pub fn has_content(&self) -> bool {
        let filled = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.psych) || filled(&self.lien)
    }
}

/// Canonical lookup key: trimmed and upper-cased.
pub fn canonical_key(label: &str) -> String {
    label.trim().to_uppercase()
}

/// Built-in interpretations plus practitioner overrides, keyed canonically.
#[derive(Debug, Clone, Default)]
pub struct InterpretationCatalog {
    builtin: HashMap<String, Interpretation>,
    overrides: HashMap<String, Interpretation>,
}

impl InterpretationCatalog {
    pub fn new(builtin: HashMap<String, Interpretation>) -> Self {
        Self {
            builtin: canonicalize(builtin),
            overrides: HashMap::new(),
        }
    }

    /// The interpretations bundled with the application.
    pub fn bundled() -> Result<Self, CatalogError> {
        let builtin: HashMap<String, Interpretation> =
            serde_json::from_str(BUNDLED_INTERPRETATIONS)
                .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Self::new(builtin))
    }

    /// Replace the practitioner override table.
    pub fn with_overrides(mut self, overrides: HashMap<String, Interpretation>) -> Self {
        self.overrides = canonicalize(overrides);
        self
    }

    /// Resolve a column label. Override fields win; missing override fields
    /// fall back to the built-in entry.
    pub fn lookup(&self, label: &str) -> Option<Interpretation> {
        let key = canonical_key(label);
        let over = self.overrides.get(&key);
        let base = self.builtin.get(&key);
        match (over, base) {
            (None, None) => None,
            (Some(o), None) => Some(o.clone()),
            (None, Some(b)) => Some(b.clone()),
            (Some(o), Some(b)) => Some(Interpretation {
                psych: o.psych.clone().or_else(|| b.psych.clone()),
                lien: o.lien.clone().or_else(|| b.lien.clone()),
            }),
        }
    }
}

fn canonicalize(map: HashMap<String, Interpretation>) -> HashMap<String, Interpretation> {
    map.into_iter()
        .map(|(k, v)| (canonical_key(&k), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(psych: Option<&str>, lien: Option<&str>) -> Interpretation {
        Interpretation {
            psych: psych.map(String::from),
            lien: lien.map(String::from),
        }
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = InterpretationCatalog::bundled().unwrap();
        let foie = catalog.lookup("FOIE").unwrap();
        assert!(foie.psych.unwrap().contains("Colère"));
    }

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let catalog = InterpretationCatalog::bundled().unwrap();
        let exact = catalog.lookup("FOIE").unwrap();
        assert_eq!(catalog.lookup("  FOIE ").unwrap(), exact);
        assert_eq!(catalog.lookup("foie").unwrap(), exact);
    }

    #[test]
    fn accented_labels_canonicalize() {
        let catalog = InterpretationCatalog::bundled().unwrap();
        assert!(catalog.lookup("Périnée").is_some());
        assert!(catalog.lookup("PÉRINÉE").is_some());
    }

    #[test]
    fn unknown_label_resolves_to_none() {
        let catalog = InterpretationCatalog::bundled().unwrap();
        assert!(catalog.lookup("Colonne inconnue").is_none());
    }

    #[test]
    fn override_field_wins_over_builtin() {
        let catalog = InterpretationCatalog::new(HashMap::from([(
            "FOIE".to_string(),
            entry(Some("symbolique de base"), Some("zone de base")),
        )]))
        .with_overrides(HashMap::from([(
            "foie".to_string(),
            entry(Some("note personnelle"), None),
        )]));

        let merged = catalog.lookup("FOIE").unwrap();
        assert_eq!(merged.psych.as_deref(), Some("note personnelle"));
        // The field the override leaves out falls back to the built-in.
        assert_eq!(merged.lien.as_deref(), Some("zone de base"));
    }

    #[test]
    fn override_without_builtin_stands_alone() {
        let catalog = InterpretationCatalog::new(HashMap::new()).with_overrides(HashMap::from([(
            "Chaîne antérieure".to_string(),
            entry(None, Some("appui interne du pied")),
        )]));

        let resolved = catalog.lookup("CHAÎNE ANTÉRIEURE").unwrap();
        assert_eq!(resolved.lien.as_deref(), Some("appui interne du pied"));
    }

    #[test]
    fn short_field_names_parse_as_aliases() {
        let i: Interpretation =
            serde_json::from_str(r#"{"psych": "texte", "lien": "pied"}"#).unwrap();
        assert_eq!(i.psych.as_deref(), Some("texte"));
        assert_eq!(i.lien.as_deref(), Some("pied"));
    }

    #[test]
    fn long_field_names_are_the_wire_format() {
        let i = entry(Some("texte"), None);
        let json = serde_json::to_value(&i).unwrap();
        assert_eq!(json, serde_json::json!({"Psychisme": "texte"}));
    }

    #[test]
    fn has_content_ignores_blank_fields() {
        assert!(!entry(None, None).has_content());
        assert!(!entry(Some("  "), None).has_content());
        assert!(entry(None, Some("pied")).has_content());
    }
}

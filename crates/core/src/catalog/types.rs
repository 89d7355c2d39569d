//! Types for the medicine catalog store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_HOUSE_SOURCE;

/// A persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Store-assigned surrogate id. `0` means "not yet assigned".
    #[serde(default)]
    pub id: i64,
    /// Caller-defined identifier, used for image lookup.
    pub external_id: String,
    /// Human-readable label (brand name).
    pub display_name: String,
    /// Only active entries are shown in the end-user catalog.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Origin label; the configured house value marks in-house entries.
    ///
    /// Required when deserializing: the house label is a runtime setting.
    pub source: String,
    /// Stored preferred-affiliate flag. See [`is_preferred`] for the read-side rule.
    #[serde(default)]
    pub is_preferred_affiliate: bool,
    #[serde(default)]
    pub active_ingredient: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub dosage: String,
    /// Dosage form (tablet, syrup, ...).
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub common_side_effects: Vec<String>,
    #[serde(default)]
    pub indicated_in: Vec<String>,
    #[serde(default)]
    pub drug_interactions: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl CatalogEntry {
    /// Create an unsaved, active entry with empty details, sourced from the
    /// default house label.
    pub fn new(external_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            external_id: external_id.into(),
            display_name: display_name.into(),
            is_active: true,
            source: DEFAULT_HOUSE_SOURCE.to_string(),
            is_preferred_affiliate: false,
            active_ingredient: String::new(),
            category: String::new(),
            dosage: String::new(),
            form: String::new(),
            price: String::new(),
            description: String::new(),
            key_features: Vec::new(),
            common_side_effects: Vec::new(),
            indicated_in: Vec::new(),
            drug_interactions: Vec::new(),
        }
    }

    /// Set the source label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the stored preferred-affiliate flag.
    pub fn with_preferred_affiliate(mut self, preferred: bool) -> Self {
        self.is_preferred_affiliate = preferred;
        self
    }

    /// Set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Whether this entry comes from the house source.
    pub fn is_house(&self, house_source: &str) -> bool {
        is_house_source(&self.source, house_source)
    }

    /// Effective preferred-affiliate status, see [`is_preferred`].
    pub fn is_preferred(&self, house_source: &str) -> bool {
        is_preferred(&self.source, self.is_preferred_affiliate, house_source)
    }
}

/// Case-insensitive comparison against the house source label.
pub fn is_house_source(source: &str, house_source: &str) -> bool {
    source.eq_ignore_ascii_case(house_source)
}

/// House entries are always preferred; affiliates use their stored flag.
pub fn is_preferred(source: &str, stored_flag: bool, house_source: &str) -> bool {
    stored_flag || is_house_source(source, house_source)
}

/// Sort entries the way the store returns them: by display name, then id.
pub(crate) fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Errors for catalog store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_defaults() {
        let entry = CatalogEntry::new("med001", "Amoxil");
        assert_eq!(entry.id, 0);
        assert!(entry.is_active);
        assert_eq!(entry.source, "Biofrench");
        assert!(!entry.is_preferred_affiliate);
        assert!(entry.key_features.is_empty());
    }

    #[test]
    fn test_house_source_is_case_insensitive() {
        assert!(is_house_source("biofrench", "Biofrench"));
        assert!(is_house_source("BIOFRENCH", "Biofrench"));
        assert!(!is_house_source("Biofrench Labs", "Biofrench"));
    }

    #[test]
    fn test_is_preferred_for_house_ignores_stored_flag() {
        assert!(is_preferred("Biofrench", false, "Biofrench"));
        assert!(is_preferred("biofrench", true, "Biofrench"));
    }

    #[test]
    fn test_is_preferred_for_affiliate_uses_stored_flag() {
        assert!(is_preferred("Acme", true, "Biofrench"));
        assert!(!is_preferred("Acme", false, "Biofrench"));
    }

    #[test]
    fn test_sort_entries_by_name_then_id() {
        let mut entries = vec![
            CatalogEntry { id: 3, ..CatalogEntry::new("c", "Zinc") },
            CatalogEntry { id: 2, ..CatalogEntry::new("b", "Amoxil") },
            CatalogEntry { id: 1, ..CatalogEntry::new("a", "Amoxil") },
        ];
        sort_entries(&mut entries);
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_entry_deserialize_applies_defaults() {
        let json = r#"{"external_id": "med9", "display_name": "Panadol", "source": "Acme"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 0);
        assert!(entry.is_active);
        assert_eq!(entry.source, "Acme");
        assert!(entry.drug_interactions.is_empty());
    }

    #[test]
    fn test_entry_deserialize_requires_source() {
        let json = r#"{"external_id": "med9", "display_name": "Panadol"}"#;
        let result: Result<CatalogEntry, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}

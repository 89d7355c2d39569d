//! Import file format and conversion into catalog entries.

use serde::Deserialize;
use serde_json::Value;

use super::ImportError;
use crate::catalog::{is_house_source, CatalogEntry};

/// One object of the import array.
///
/// Only `id` and `brandName` are required; unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDescriptor {
    pub id: String,
    pub brand_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Missing or null means the house source.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub preferred_affiliate: bool,
    #[serde(default)]
    pub active_ingredient: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default, rename = "type")]
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

impl EntryDescriptor {
    /// A descriptor needs a non-blank id and brand name to become an entry.
    pub fn is_usable(&self) -> bool {
        !self.id.trim().is_empty() && !self.brand_name.trim().is_empty()
    }

    /// Convert into an unsaved entry.
    ///
    /// House-sourced descriptors are always stored as preferred, whatever
    /// their own flag says.
    pub fn into_entry(self, house_source: &str) -> CatalogEntry {
        let source = self
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| house_source.to_string());
        let is_preferred_affiliate =
            self.preferred_affiliate || is_house_source(&source, house_source);

        CatalogEntry {
            id: 0,
            external_id: self.id.trim().to_string(),
            display_name: self.brand_name.trim().to_string(),
            is_active: self.is_active,
            source,
            is_preferred_affiliate,
            active_ingredient: self.active_ingredient,
            category: self.category,
            dosage: self.dosage,
            form: self.form,
            price: self.price,
            description: self.description,
            key_features: self.key_features,
            common_side_effects: self.common_side_effects,
            indicated_in: self.indicated_in,
            drug_interactions: self.drug_interactions,
        }
    }
}

/// Result of parsing an import document.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Descriptors that passed field parsing, in file order.
    pub descriptors: Vec<EntryDescriptor>,
    /// Array elements that were dropped.
    pub skipped: usize,
}

/// Parse an import document.
///
/// The document itself must be a JSON array; each element is parsed on its
/// own and bad elements are skipped rather than failing the whole import.
pub fn parse_document(text: &str) -> Result<ParsedDocument, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::ParseFailure(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ImportError::ParseFailure(format!(
                "expected a JSON array of entries, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut descriptors = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<EntryDescriptor>(item) {
            Ok(descriptor) if descriptor.is_usable() => descriptors.push(descriptor),
            Ok(descriptor) => {
                tracing::warn!(
                    index,
                    id = %descriptor.id,
                    "Skipping import entry with blank id or brandName"
                );
                skipped += 1;
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed import entry");
                skipped += 1;
            }
        }
    }

    Ok(ParsedDocument {
        descriptors,
        skipped,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

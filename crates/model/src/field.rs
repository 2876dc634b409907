//! Semantic field bindings and the live values supplied for them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A named piece of data an element can be bound to instead of carrying
/// static content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticField {
    BusinessName,
    Tagline,
    ExportId,
    Website,
    Phone,
    Email,
    Address,
    CallToAction,
    QrUrl,
    Label,
}

impl SemanticField {
    /// The fixed text shown when no live value is supplied.
    pub fn placeholder(&self) -> &'static str {
        match self {
            SemanticField::BusinessName => "Your Business Name",
            SemanticField::Tagline => "Your tagline goes here",
            SemanticField::ExportId => "ABC-123",
            SemanticField::Website => "www.example.com",
            SemanticField::Phone => "+1 555 0100",
            SemanticField::Email => "hello@example.com",
            SemanticField::Address => "123 Main Street",
            SemanticField::CallToAction => "Scan to leave a review",
            SemanticField::QrUrl => "https://example.com",
            SemanticField::Label => "Label",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SemanticField::BusinessName => "business_name",
            SemanticField::Tagline => "tagline",
            SemanticField::ExportId => "export_id",
            SemanticField::Website => "website",
            SemanticField::Phone => "phone",
            SemanticField::Email => "email",
            SemanticField::Address => "address",
            SemanticField::CallToAction => "call_to_action",
            SemanticField::QrUrl => "qr_url",
            SemanticField::Label => "label",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do when an element is bound to a field that has no live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Show the field's fixed placeholder text.
    #[default]
    Placeholder,
    /// Refuse to render the element.
    Fail,
}

/// Live values for semantic fields. An empty (whitespace-only) value counts
/// as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(HashMap<SemanticField, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: SemanticField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: SemanticField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: SemanticField) -> Option<&str> {
        self.0
            .get(&field)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Copies every value from `other` that is not already present.
    pub fn merge_missing(&mut self, other: &FieldValues) {
        for (field, value) in &other.0 {
            self.0.entry(*field).or_insert_with(|| value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        let values = FieldValues::new()
            .with(SemanticField::BusinessName, "   ")
            .with(SemanticField::Phone, "555");
        assert_eq!(values.get(SemanticField::BusinessName), None);
        assert_eq!(values.get(SemanticField::Phone), Some("555"));
    }

    #[test]
    fn deserializes_from_snake_case_map() {
        let values: FieldValues =
            serde_json::from_str(r#"{"business_name": "Cafe Blue", "qr_url": "https://x.y"}"#).unwrap();
        assert_eq!(values.get(SemanticField::BusinessName), Some("Cafe Blue"));
        assert_eq!(values.get(SemanticField::QrUrl), Some("https://x.y"));
    }

    #[test]
    fn merge_keeps_existing_values() {
        let mut values = FieldValues::new().with(SemanticField::Label, "mine");
        let defaults = FieldValues::new()
            .with(SemanticField::Label, "theirs")
            .with(SemanticField::Tagline, "hi");
        values.merge_missing(&defaults);
        assert_eq!(values.get(SemanticField::Label), Some("mine"));
        assert_eq!(values.get(SemanticField::Tagline), Some("hi"));
    }
}

//! Form data and error-state types shared by the engine and the wizard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved error-map key for messages that belong to the form as a whole
/// rather than to a single field.
pub const FORM_ERROR_KEY: &str = "_form";

static NULL_VALUE: FieldValue = FieldValue::Null;

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// Reference to a file picked in the UI. The core never reads its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A single form field value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    File(FileHandle),
    #[default]
    Null,
}

impl FieldValue {
    /// `Null`, or text that is empty once trimmed.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<FileHandle> for FieldValue {
    fn from(f: FileHandle) -> Self {
        Self::File(f)
    }
}

// ---------------------------------------------------------------------------
// Form record
// ---------------------------------------------------------------------------

/// Field name to value mapping for one wizard session.
///
/// Missing fields read as [`FieldValue::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord(BTreeMap<String, FieldValue>);

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from declared `(field, default)` pairs.
    pub fn with_defaults(defaults: &[(&str, FieldValue)]) -> Self {
        Self(
            defaults
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    pub fn get(&self, field: &str) -> &FieldValue {
        self.0.get(field).unwrap_or(&NULL_VALUE)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error map
// ---------------------------------------------------------------------------

/// Current error message per field; at most one message per field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`, replacing any earlier message.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for ErrorMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_field_reads_as_null() {
        let record = FormRecord::new();
        assert_eq!(record.get("subject"), &FieldValue::Null);
    }

    #[test]
    fn blank_values() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(FieldValue::from("   ").is_blank());
        assert!(!FieldValue::from("x").is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
        assert!(!FieldValue::Bool(false).is_blank());
    }

    #[test]
    fn field_values_deserialize_untagged() {
        let record: FormRecord = serde_json::from_value(json!({
            "subject": "Printer jammed",
            "count": 3,
            "urgent": true,
            "attachment": { "name": "a.png", "size_bytes": 42, "content_type": "image/png" },
            "notes": null
        }))
        .unwrap();

        assert_eq!(record.get("subject").as_text(), Some("Printer jammed"));
        assert_eq!(record.get("count").as_number(), Some(3.0));
        assert_eq!(record.get("urgent").as_bool(), Some(true));
        assert_eq!(record.get("attachment").as_file().unwrap().size_bytes, 42);
        assert_eq!(record.get("notes"), &FieldValue::Null);
    }

    #[test]
    fn error_map_insert_overwrites() {
        let mut errors = ErrorMap::new();
        errors.insert("name", "first");
        errors.insert("name", "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("second"));
    }
}

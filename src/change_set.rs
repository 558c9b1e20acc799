use std::iter::FromIterator;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{data_types::Value, error::Result};

/// The fields a caller wants to update, in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    fields: IndexMap<String, Value>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a change-set from a JSON object such as a PATCH request body.
    /// Key order in the document is kept.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set a field. A field that is already present keeps its position and has its value replaced.
    pub fn insert<F: Into<String>, V: Into<Value>>(&mut self, field: F, value: V) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn with<F: Into<String>, V: Into<Value>>(mut self, field: F, value: V) -> Self {
        self.insert(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|f| f.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(f, v)| (f.as_str(), v))
    }
}

impl<F: Into<String>, V: Into<Value>> FromIterator<(F, V)> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        let mut change_set = ChangeSet::new();
        change_set.extend(iter);
        change_set
    }
}

impl<F: Into<String>, V: Into<Value>> Extend<(F, V)> for ChangeSet {
    fn extend<I: IntoIterator<Item = (F, V)>>(&mut self, iter: I) {
        for (field, value) in iter {
            self.insert(field, value);
        }
    }
}

impl IntoIterator for ChangeSet {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinserting_keeps_position() {
        let mut changes = ChangeSet::new().with("firstName", "Aliya").with("age", 32);
        let old = changes.insert("firstName", "Ali");
        assert_eq!(old, Some(Value::from("Aliya")));
        assert_eq!(changes.fields().collect::<Vec<_>>(), vec!["firstName", "age"]);
        assert_eq!(changes.get("firstName"), Some(&Value::from("Ali")));
    }

    #[test]
    fn remove_shifts_later_fields() {
        let mut changes: ChangeSet = vec![("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        changes.remove("a");
        assert_eq!(changes.fields().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn json_document_order_is_kept() {
        let changes = ChangeSet::from_json(r#"{"zeta": 1, "alpha": "x", "mid": null}"#).unwrap();
        assert_eq!(changes.fields().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert!(changes.get("mid").unwrap().is_null());
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(ChangeSet::from_json("[1, 2]").is_err());
    }
}

use std::{collections::HashMap, iter::FromIterator};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maps caller-facing field names to the column names used in storage.
/// Fields without an entry are stored under their own name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTranslationTable {
    names: HashMap<String, String>,
}

impl NameTranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert<F, C>(&mut self, field: F, column: C) -> Option<String>
    where
        F: Into<String>,
        C: Into<String>,
    {
        self.names.insert(field.into(), column.into())
    }

    pub fn with<F: Into<String>, C: Into<String>>(mut self, field: F, column: C) -> Self {
        self.insert(field, column);
        self
    }

    /// The translation for `field`, if one was given. An empty translation is still a translation.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.names.get(field).map(|c| c.as_str())
    }

    /// The column `field` is stored under.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.get(field).unwrap_or(field)
    }

    /// Whether `field` is stored under a different name.
    pub fn is_translated(&self, field: &str) -> bool {
        self.resolve(field) != field
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<F: Into<String>, C: Into<String>> FromIterator<(F, C)> for NameTranslationTable {
    fn from_iter<I: IntoIterator<Item = (F, C)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(field, column)| (field.into(), column.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_field() {
        let names = NameTranslationTable::new().with("firstName", "first_name");
        assert_eq!(names.resolve("firstName"), "first_name");
        assert_eq!(names.resolve("age"), "age");
        assert!(names.is_translated("firstName"));
        assert!(!names.is_translated("age"));
    }

    #[test]
    fn empty_translation_is_honored() {
        let names = NameTranslationTable::new().with("blank", "");
        assert_eq!(names.get("blank"), Some(""));
        assert_eq!(names.resolve("blank"), "");
    }

    #[test]
    fn parses_json_table() {
        let names = NameTranslationTable::from_json(r#"{"isAdmin": "is_admin"}"#).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.resolve("isAdmin"), "is_admin");
    }
}

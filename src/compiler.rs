use std::{
    convert::TryFrom,
    fmt::{Display, Formatter},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    change_set::ChangeSet,
    data_types::Value,
    error::{RequestError, Result},
    name_table::NameTranslationTable,
};

/// Postgres truncates identifiers longer than this.
const MAX_IDENTIFIER_LEN: usize = 63;

/// How much the compiler trusts the column names it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnPolicy {
    /// Column names are spliced in verbatim.
    Trusted,
    /// Column names must be plain unquoted-style identifiers.
    Identifier,
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        ColumnPolicy::Trusted
    }
}

impl ColumnPolicy {
    fn check(&self, field: &str, column: &str) -> Result<()> {
        match self {
            ColumnPolicy::Trusted => Ok(()),
            ColumnPolicy::Identifier if is_plain_identifier(column) => Ok(()),
            ColumnPolicy::Identifier => Err(RequestError::InvalidColumn {
                field: field.to_owned(),
                column: column.to_owned(),
            }
            .into()),
        }
    }
}

fn is_plain_identifier(column: &str) -> bool {
    let mut chars = column.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_well
        && column.len() <= MAX_IDENTIFIER_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The 1-based placeholder numbers of the `"<column>"=$<n>` fragments in `clause`, in order.
fn placeholders(clause: &str) -> Vec<usize> {
    clause
        .match_indices("\"=$")
        .filter_map(|(index, marker)| {
            let rest = &clause[index + marker.len()..];
            let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
            let after = &rest[digits..];
            if digits > 0 && (after.is_empty() || after.starts_with(", ")) {
                rest[..digits].parse().ok()
            } else {
                None
            }
        })
        .collect()
}

/// The settable part of an update statement together with its bound values.
/// Placeholder `$N` in the clause addresses `values()[N - 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompiledUpdateParts")]
pub struct CompiledUpdate {
    assignment_clause: String,
    values: Vec<Value>,
}

#[derive(Deserialize)]
struct CompiledUpdateParts {
    assignment_clause: String,
    values: Vec<Value>,
}

impl TryFrom<CompiledUpdateParts> for CompiledUpdate {
    type Error = RequestError;

    fn try_from(parts: CompiledUpdateParts) -> core::result::Result<Self, Self::Error> {
        let found = placeholders(&parts.assignment_clause);
        let expected = (1..=parts.values.len()).collect::<Vec<_>>();
        if parts.values.is_empty() || found != expected {
            return Err(RequestError::MismatchedParameters {
                placeholders: found.len(),
                values: parts.values.len(),
            });
        }
        Ok(Self {
            assignment_clause: parts.assignment_clause,
            values: parts.values,
        })
    }
}

impl CompiledUpdate {
    pub fn assignment_clause(&self) -> &str {
        &self.assignment_clause
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of placeholders used by the clause.
    pub fn num_params(&self) -> usize {
        self.values.len()
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.assignment_clause, self.values)
    }
}

impl Display for CompiledUpdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.assignment_clause)
    }
}

/// Turns a change-set into a column-assignment clause with positional parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialUpdateCompiler {
    policy: ColumnPolicy,
}

impl PartialUpdateCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ColumnPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ColumnPolicy {
        self.policy
    }

    /// Compile `changes` into `"<column>"=$<n>` fragments, resolving each field through `names`.
    ///
    /// Fails with [`RequestError::EmptyChangeSet`] when there is nothing to update.
    pub fn compile(
        &self,
        changes: &ChangeSet,
        names: &NameTranslationTable,
    ) -> Result<CompiledUpdate> {
        if changes.is_empty() {
            return Err(RequestError::EmptyChangeSet.into());
        }
        let columns = changes
            .fields()
            .map(|field| {
                let column = names.resolve(field);
                self.policy.check(field, column).map(|_| column)
            })
            .collect::<Result<Vec<_>>>()?;
        let assignment_clause = columns
            .iter()
            .enumerate()
            .map(|(index, column)| format!("\"{}\"=${}", column, index + 1))
            .join(", ");
        let values = changes.values().cloned().collect();
        log::debug!(
            "compiled partial update of {} field(s): {}",
            columns.len(),
            assignment_clause
        );
        Ok(CompiledUpdate {
            assignment_clause,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rules() {
        assert!(is_plain_identifier("first_name"));
        assert!(is_plain_identifier("_private2"));
        assert!(!is_plain_identifier(""));
        assert!(!is_plain_identifier("2fast"));
        assert!(!is_plain_identifier("name\"; DROP TABLE users; --"));
        assert!(!is_plain_identifier("has space"));
        assert!(is_plain_identifier(&"a".repeat(MAX_IDENTIFIER_LEN)));
        assert!(!is_plain_identifier(&"a".repeat(MAX_IDENTIFIER_LEN + 1)));
    }

    #[test]
    fn policy_deserializes_snake_case() {
        let policy: ColumnPolicy = serde_json::from_str("\"identifier\"").unwrap();
        assert_eq!(policy, ColumnPolicy::Identifier);
        assert_eq!(ColumnPolicy::default(), ColumnPolicy::Trusted);
        assert_eq!(PartialUpdateCompiler::new().policy(), ColumnPolicy::Trusted);
        assert_eq!(
            PartialUpdateCompiler::with_policy(policy).policy(),
            ColumnPolicy::Identifier
        );
    }

    #[test]
    fn placeholder_numbers() {
        assert_eq!(placeholders("\"a\"=$1, \"b\"=$2"), vec![1, 2]);
        assert_eq!(placeholders("\"a\"=$1, \"b\"=$10"), vec![1, 10]);
        assert_eq!(placeholders("\"a\"=$1x"), Vec::<usize>::new());
        assert!(placeholders("").is_empty());
    }

    #[test]
    fn deserialize_checks_placeholders_against_values() {
        let mismatched = r#"{"assignment_clause":"\"a\"=$1, \"b\"=$2","values":[]}"#;
        let err = serde_json::from_str::<CompiledUpdate>(mismatched).unwrap_err();
        assert!(err.to_string().contains("2 placeholder(s)"), "{}", err);

        let reordered = r#"{"assignment_clause":"\"a\"=$2, \"b\"=$1","values":[1, 2]}"#;
        assert!(serde_json::from_str::<CompiledUpdate>(reordered).is_err());

        let short = r#"{"assignment_clause":"\"a\"=$1","values":[1, 2]}"#;
        assert!(serde_json::from_str::<CompiledUpdate>(short).is_err());

        let valid = r#"{"assignment_clause":"\"a\"=$1, \"b\"=$2","values":[1, "x"]}"#;
        let compiled: CompiledUpdate = serde_json::from_str(valid).unwrap();
        assert_eq!(compiled.num_params(), 2);
    }
}

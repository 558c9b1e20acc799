use itertools::Itertools;

use crate::{compiler::CompiledUpdate, data_types::Value, name_table::NameTranslationTable};

/// A full `UPDATE` statement built around a compiled assignment clause.
///
/// The table name and returning items are written as given, so they must come from the caller's
/// own code rather than from request data.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    table: String,
    compiled: CompiledUpdate,
    filter: Option<(String, Value)>,
    returning: Vec<String>,
}

impl UpdateStatement {
    pub fn new<T: Into<String>>(table: T, compiled: CompiledUpdate) -> Self {
        Self {
            table: table.into(),
            compiled,
            filter: None,
            returning: Vec::new(),
        }
    }

    /// Restrict the update to rows where `column` equals `value`.
    /// The value is bound after the assignment values.
    pub fn filter<C: Into<String>, V: Into<Value>>(mut self, column: C, value: V) -> Self {
        self.filter = Some((column.into(), value.into()));
        self
    }

    pub fn returning<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning.extend(items.into_iter().map(Into::into));
        self
    }

    /// Return `fields` under their caller-facing names, aliasing translated columns.
    pub fn returning_fields<'a, I>(mut self, fields: I, names: &NameTranslationTable) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for field in fields {
            let item = if names.is_translated(field) {
                format!("\"{}\" AS \"{}\"", names.resolve(field), field)
            } else {
                format!("\"{}\"", field)
            };
            self.returning.push(item);
        }
        self
    }

    pub fn compiled(&self) -> &CompiledUpdate {
        &self.compiled
    }

    pub fn sql(&self) -> String {
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.table,
            self.compiled.assignment_clause()
        );
        if let Some((column, _)) = &self.filter {
            sql.push_str(&format!(
                " WHERE \"{}\"=${}",
                column,
                self.compiled.num_params() + 1
            ));
        }
        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.iter().join(", "));
        }
        log::debug!("rendered update statement: {}", sql);
        sql
    }

    /// Every bound value, in placeholder order.
    pub fn parameters(&self) -> Vec<Value> {
        let mut parameters = self.compiled.values().to_vec();
        if let Some((_, value)) = &self.filter {
            parameters.push(value.clone());
        }
        parameters
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        let sql = self.sql();
        let (_, mut parameters) = self.compiled.into_parts();
        if let Some((_, value)) = self.filter {
            parameters.push(value);
        }
        (sql, parameters)
    }
}

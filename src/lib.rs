//! Builds the `SET` part of parameterized `UPDATE` statements from partial update payloads.
//!
//! ```
//! use partial_update::{sql_for_partial_update, ChangeSet, NameTranslationTable};
//!
//! let changes = ChangeSet::new().with("firstName", "Aliya").with("age", 32);
//! let names = NameTranslationTable::new().with("firstName", "first_name");
//! let compiled = sql_for_partial_update(&changes, &names).unwrap();
//! assert_eq!(compiled.assignment_clause(), "\"first_name\"=$1, \"age\"=$2");
//! ```

#[macro_use]
mod utils;
mod c_interface;
pub mod change_set;
pub mod compiler;
pub mod data_types;
pub mod error;
pub mod name_table;
pub mod statement;

pub use c_interface::*;
pub use change_set::ChangeSet;
pub use compiler::{ColumnPolicy, CompiledUpdate, PartialUpdateCompiler};
pub use data_types::Value;
pub use name_table::NameTranslationTable;
pub use statement::UpdateStatement;

use error::Result;

/// Compile `changes` with the default, trusting compiler.
pub fn sql_for_partial_update(
    changes: &ChangeSet,
    names: &NameTranslationTable,
) -> Result<CompiledUpdate> {
    PartialUpdateCompiler::new().compile(changes, names)
}

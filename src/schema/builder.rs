//! Union schema over a sequence of heterogeneous records.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::infer::{infer_column_type, TypeTag};
use super::value::FieldValue;
use crate::storage::quote_identifier;

/// One JSON record: an ordered map from field name to value.
pub type Record = Map<String, Value>;

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field name, used verbatim as the column name
    pub name: String,
    /// Inferred column type
    pub type_tag: TypeTag,
}

/// Ordered set of unique columns inferred for one load unit.
///
/// The implicit `id` primary key is not part of the column list; it is added
/// when the DDL is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Columns in schema order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up the type of a column by name.
    pub fn type_of(&self, name: &str) -> Option<TypeTag> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.type_tag)
    }

    /// Number of inferred columns (excluding `id`).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns were inferred.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders the `CREATE TABLE` statement with the leading identity column.
    pub fn create_table_sql(&self, table: &str) -> String {
        let mut defs = Vec::with_capacity(self.columns.len() + 1);
        defs.push(format!(
            "{} INTEGER PRIMARY KEY AUTOINCREMENT",
            quote_identifier(crate::config::ID_COLUMN)
        ));
        defs.extend(
            self.columns
                .iter()
                .map(|c| format!("{} {}", quote_identifier(&c.name), c.type_tag.sql_name())),
        );
        format!("CREATE TABLE {} ({})", quote_identifier(table), defs.join(", "))
    }
}

/// Builds the union schema for `records`.
///
/// Returns `None` when there are no records. Column order is the lexicographic
/// order of the key union, independent of record or key order in the source.
pub fn build_schema(records: &[Record]) -> Option<Schema> {
    if records.is_empty() {
        return None;
    }

    let keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();

    let columns = keys
        .into_iter()
        .map(|key| {
            let values: Vec<FieldValue<'_>> = records
                .iter()
                .map(|r| FieldValue::project(r.get(key)))
                .collect();
            Column {
                name: key.to_string(),
                type_tag: infer_column_type(&values),
            }
        })
        .collect();

    Some(Schema { columns })
}

//! Transactional table replacement and bulk insert.
//!
//! One file is one load unit. Inside a single transaction the target table is
//! dropped, recreated from the inferred schema, and filled with one multi-row
//! `INSERT` per chunk. Any failure rolls the whole unit back, including the
//! drop of the previous table.

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use sqlx::query_builder::Separated;
use sqlx::{Connection, QueryBuilder, Sqlite, SqliteConnection};

use super::types::{FileOutcome, LoadOutcome};
use crate::app::EventSink;
use crate::config::{ConnectionConfig, MAX_BIND_PARAMS};
use crate::error_handling::{DatabaseError, FailureKind, LoadError};
use crate::schema::{build_schema, FieldValue, Record, Schema, TypeTag};
use crate::storage::{open_connection, quote_identifier};

/// Loads JSON record sequences into freshly replaced tables.
///
/// Owns the single storage connection of an import operation.
pub struct BulkLoader {
    conn: SqliteConnection,
    sink: Arc<dyn EventSink>,
}

impl BulkLoader {
    /// Wraps an already open connection.
    pub fn new(conn: SqliteConnection, sink: Arc<dyn EventSink>) -> Self {
        Self { conn, sink }
    }

    /// Opens the connection described by `config`.
    pub async fn connect(
        config: &ConnectionConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, DatabaseError> {
        let conn = open_connection(config).await?;
        sink.status("Database connection established");
        Ok(Self::new(conn, sink))
    }

    /// The underlying connection, for reads between loads.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// The sink this loader reports to.
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Closes the connection.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await?;
        self.sink.status("Database connection closed");
        Ok(())
    }

    /// Replaces `table` with the inferred schema of `records` and inserts them.
    ///
    /// An empty record sequence is skipped without touching storage. Otherwise
    /// the drop, create and inserts run in one transaction that is rolled back
    /// on any error.
    pub async fn load(&mut self, table: &str, records: &[Record]) -> Result<LoadOutcome, LoadError> {
        let Some(schema) = build_schema(records) else {
            let reason = format!("No data in {table} - skipping");
            self.sink.status(&reason);
            return Ok(LoadOutcome::Skipped { reason });
        };
        self.sink.status(&format!(
            "Columns to be created for {}: {:?}",
            table,
            schema.column_names()
        ));
        check_integer_range(&schema, records)?;

        let mut tx = self.conn.begin().await?;
        match replace_table(&mut tx, table, &schema, records, self.sink.as_ref()).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(LoadOutcome::Created {
                    table: table.to_string(),
                    columns: schema
                        .column_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    rows: records.len(),
                })
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback of {} failed: {}", table, rollback_err);
                }
                Err(LoadError::Storage(e))
            }
        }
    }

    /// Imports one file into the table named after its stem.
    ///
    /// Never fails: read, parse and storage errors become
    /// [`FileOutcome::Failure`], empty documents [`FileOutcome::Skipped`].
    pub async fn load_file(&mut self, path: &Path) -> FileOutcome {
        let table = table_name_for(path);
        let outcome = match self.load_document(path, &table).await {
            Ok(LoadOutcome::Created { rows, .. }) => FileOutcome::Success(format!(
                "Successfully imported {} ({} records)",
                path.display(),
                rows
            )),
            Ok(LoadOutcome::Skipped { .. }) => FileOutcome::Skipped(format!(
                "Skipped {} - File is empty or contains no data",
                path.display()
            )),
            Err(e) => FileOutcome::Failure {
                message: match &e {
                    LoadError::InvalidJson(_) => format!("Skipped {} - {}", path.display(), e),
                    _ => format!("ERROR importing {}: {}", path.display(), e),
                },
                kind: FailureKind::from(&e),
            },
        };
        self.sink.status(outcome.message());
        outcome
    }

    async fn load_document(&mut self, path: &Path, table: &str) -> Result<LoadOutcome, LoadError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let document: Value = serde_json::from_str(&text)?;
        match normalize_document(document)? {
            Some(records) => self.load(table, &records).await,
            None => Ok(LoadOutcome::Skipped {
                reason: "File is empty or contains no data".to_string(),
            }),
        }
    }
}

/// Table name for an input file: its stem.
pub fn table_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turns a parsed document into a record sequence.
///
/// `null`, `[]` and `{}` yield `None` (nothing to load). A bare object becomes
/// a one-element sequence. Scalars, and arrays holding anything other than
/// objects, are rejected.
pub fn normalize_document(document: Value) -> Result<Option<Vec<Record>>, LoadError> {
    match document {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => Ok(Some(vec![map])),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(LoadError::UnsupportedShape(format!(
                    "element {} is a {}, expected an object",
                    idx,
                    json_kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        other => Err(LoadError::UnsupportedShape(format!(
            "top-level {} is neither an object nor an array",
            json_kind(&other)
        ))),
    }
}

async fn replace_table(
    conn: &mut SqliteConnection,
    table: &str,
    schema: &Schema,
    records: &[Record],
    sink: &dyn EventSink,
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))
        .execute(&mut *conn)
        .await?;
    sink.status(&format!("Dropped table {} if it existed", table));

    sqlx::query(&schema.create_table_sql(table))
        .execute(&mut *conn)
        .await?;
    sink.status(&format!(
        "Created table {} with {} columns",
        table,
        schema.len()
    ));

    let inserted = insert_rows(conn, table, schema, records).await?;
    sink.status(&format!("Inserted {} records into {}", inserted, table));
    Ok(())
}

/// Rejects top-level integers that SQLite cannot store exactly.
///
/// Runs before the transaction, so a rejected file leaves storage untouched.
fn check_integer_range(schema: &Schema, records: &[Record]) -> Result<(), LoadError> {
    for record in records {
        for column in schema.columns() {
            if let FieldValue::Int(value) = FieldValue::project(record.get(&column.name)) {
                if i64::try_from(value).is_err() {
                    return Err(LoadError::IntegerOutOfRange {
                        column: column.name.clone(),
                        value,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Rows per `INSERT` so that bound parameters stay under the SQLite limit.
fn rows_per_statement(column_count: usize) -> usize {
    (MAX_BIND_PARAMS / column_count.max(1)).max(1)
}

async fn insert_rows(
    conn: &mut SqliteConnection,
    table: &str,
    schema: &Schema,
    records: &[Record],
) -> Result<usize, sqlx::Error> {
    let table_sql = quote_identifier(table);

    if schema.is_empty() {
        // Records without fields still get one row each
        for _ in records {
            sqlx::query(&format!("INSERT INTO {} DEFAULT VALUES", table_sql))
                .execute(&mut *conn)
                .await?;
        }
        return Ok(records.len());
    }

    let column_list = schema
        .columns()
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let chunk_size = rows_per_statement(schema.len());
    for chunk in records.chunks(chunk_size) {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("INSERT INTO {} ({}) ", table_sql, column_list));
        builder.push_values(chunk, |mut row, record| {
            for column in schema.columns() {
                let value = record.get(&column.name);
                if column.type_tag == TypeTag::Json {
                    bind_json(&mut row, value);
                } else {
                    bind_field(&mut row, FieldValue::project(value));
                }
            }
        });
        builder.build().execute(&mut *conn).await?;
        debug!("Inserted chunk of {} rows into {}", chunk.len(), table);
    }
    Ok(records.len())
}

/// Binds one cell of a scalar column. Integers were range-checked up front.
fn bind_field(row: &mut Separated<'_, '_, Sqlite, &'static str>, value: FieldValue<'_>) {
    match value {
        FieldValue::Null => row.push_bind(None::<String>),
        FieldValue::Bool(b) => row.push_bind(b),
        FieldValue::Int(i) => row.push_bind(i64::try_from(i).unwrap_or_default()),
        FieldValue::Float(f) => row.push_bind(f),
        FieldValue::Text(s) => row.push_bind(s.to_string()),
        FieldValue::Array(items) => row.push_bind(Value::Array(items.to_vec()).to_string()),
        FieldValue::Object(map) => row.push_bind(Value::Object(map.clone()).to_string()),
    };
}

/// Binds one cell of a JSON column as its compact serialization.
///
/// Strings keep their quotes, so `"123"` or `"true"` cannot be mistaken for a
/// number or boolean when read back.
fn bind_json(row: &mut Separated<'_, '_, Sqlite, &'static str>, value: Option<&Value>) {
    match value {
        None | Some(Value::Null) => row.push_bind(None::<String>),
        Some(v) => row.push_bind(v.to_string()),
    };
}

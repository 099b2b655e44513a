//! Whole-table dump to a JSON array.

use serde_json::Value;
use sqlx::SqliteConnection;

use super::writer::write_pretty_json;
use crate::app::EventSink;
use crate::config::DumpOptions;
use crate::error_handling::ExportError;
use crate::storage::read_table;

/// Writes every row of `options.table` (without the identity column) to
/// `options.output`, ordered by identity. Returns the row count.
///
/// Nested values come back as JSON and booleans as `true`/`false`, so the file
/// can be imported again to recreate the table.
pub(crate) async fn export_table(
    conn: &mut SqliteConnection,
    options: &DumpOptions,
    sink: &dyn EventSink,
) -> Result<usize, ExportError> {
    let records = read_table(conn, &options.table).await?;
    let rows: Vec<Value> = records.into_iter().map(Value::Object).collect();
    write_pretty_json(&options.output, &rows)?;
    sink.status(&format!(
        "Dumped {} rows from {} to {}",
        rows.len(),
        options.table,
        options.output.display()
    ));
    Ok(rows.len())
}

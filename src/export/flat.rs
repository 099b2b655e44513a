//! Flat export of the merge table: one JSON array plus a CSV companion.
//!
//! Columns follow [`FLAT_COLUMNS`]. Date and datetime columns are normalized to
//! `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS`; values that cannot be parsed are
//! written unchanged.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use futures::TryStreamExt;
use serde_json::{Map, Value};
use sqlx::SqliteConnection;

use super::csv::CsvExport;
use super::types::FlatExportSummary;
use super::writer::write_pretty_json;
use crate::app::EventSink;
use crate::config::FlatExportOptions;
use crate::error_handling::ExportError;
use crate::storage::{quote_identifier, read_cell};

/// How a flat column is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatKind {
    /// Integer, passed through
    Integer,
    /// Real, passed through
    Real,
    /// Text, passed through
    Text,
    /// Calendar date
    Date,
    /// Date and time of day
    DateTime,
}

/// A declared column of the flat export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatColumn {
    /// Column name in the table and in the output
    pub name: &'static str,
    /// Rendering rule
    pub kind: FlatKind,
}

const fn column(name: &'static str, kind: FlatKind) -> FlatColumn {
    FlatColumn { name, kind }
}

/// Columns of the flat export, in output order.
pub const FLAT_COLUMNS: [FlatColumn; 16] = [
    column("MergeID", FlatKind::Integer),
    column("CommunityID", FlatKind::Text),
    column("EntityID", FlatKind::Integer),
    column("ApplicationID", FlatKind::Text),
    column("EntityType", FlatKind::Text),
    column("TargetID", FlatKind::Text),
    column("SourceIDValue", FlatKind::Text),
    column("FirstName", FlatKind::Text),
    column("LastName", FlatKind::Text),
    column("DateOfBirth", FlatKind::Date),
    column("Gender", FlatKind::Text),
    column("MatchScore", FlatKind::Real),
    column("MatchStatus", FlatKind::Text),
    column("ReviewedBy", FlatKind::Text),
    column("CreatedAt", FlatKind::DateTime),
    column("UpdatedAt", FlatKind::DateTime),
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn format_temporal(kind: FlatKind, value: Value) -> Value {
    let parsed = match &value {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc()),
        _ => None,
    };
    let format = match kind {
        FlatKind::Date => DATE_FORMAT,
        FlatKind::DateTime => DATETIME_FORMAT,
        _ => return value,
    };
    match parsed {
        Some(dt) => Value::String(dt.format(format).to_string()),
        None => value,
    }
}

/// Renders one cell of a flat column.
pub fn render_flat_cell(kind: FlatKind, value: Value) -> Value {
    match kind {
        FlatKind::Date | FlatKind::DateTime => format_temporal(kind, value),
        FlatKind::Integer | FlatKind::Real | FlatKind::Text => value,
    }
}

/// Streams the table ordered by `EntityID, MergeID` into
/// `{prefix}.json` and `{prefix}.csv`.
pub(crate) async fn export_flat(
    conn: &mut SqliteConnection,
    options: &FlatExportOptions,
    sink: &dyn EventSink,
) -> Result<FlatExportSummary, ExportError> {
    let select = FLAT_COLUMNS
        .iter()
        .map(|c| quote_identifier(c.name))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {select} FROM {table} ORDER BY {entity}, {merge}",
        table = quote_identifier(&options.table),
        entity = quote_identifier("EntityID"),
        merge = quote_identifier("MergeID"),
    );

    let json_path = options.output_dir.join(format!("{}.json", options.prefix));
    let csv_path = options.output_dir.join(format!("{}.csv", options.prefix));
    let mut records = Vec::new();

    // The first row is pulled before any file exists, so a missing table or
    // column leaves nothing behind.
    let mut rows = sqlx::query(&sql).fetch(&mut *conn);
    let mut next = rows.try_next().await?;
    let mut csv = CsvExport::create(&csv_path, FLAT_COLUMNS.iter().map(|c| c.name))?;
    while let Some(row) = next {
        let mut cells = Vec::with_capacity(FLAT_COLUMNS.len());
        for (idx, col) in FLAT_COLUMNS.iter().enumerate() {
            cells.push(render_flat_cell(col.kind, read_cell(&row, idx)?));
        }
        csv.write_row(&cells)?;
        let record: Map<String, Value> = FLAT_COLUMNS
            .iter()
            .map(|c| c.name.to_string())
            .zip(cells)
            .collect();
        records.push(Value::Object(record));
        next = rows.try_next().await?;
    }
    drop(rows);

    let csv_path = csv.finish()?;
    write_pretty_json(&json_path, &records)?;
    sink.status(&format!(
        "Exported {} rows from {} to {} and {}",
        records.len(),
        options.table,
        json_path.display(),
        csv_path.display()
    ));

    Ok(FlatExportSummary {
        rows: records.len(),
        json_path,
        csv_path,
    })
}

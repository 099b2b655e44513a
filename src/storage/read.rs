//! Reading stored rows back as JSON values.

use std::str::FromStr;

use serde_json::{Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, TypeInfo, ValueRef};

use super::quote_identifier;
use crate::config::ID_COLUMN;
use crate::schema::{Record, TypeTag};

/// Converts one cell to JSON by its runtime storage class.
///
/// INTEGER becomes a JSON integer, REAL a JSON float (non-finite values become
/// `null`), TEXT a string and BLOB a lossily decoded string.
pub(crate) fn read_cell(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_string();
    let value = match storage_class.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => Number::from_f64(row.try_get::<f64, _>(idx)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => Value::String(String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(idx)?).into_owned()),
        _ => Value::String(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

/// Restores a cell to the JSON shape implied by its declared column type.
///
/// JSON columns hold compact serializations; SQLite keeps numeric members as
/// numbers, everything else is text that parses back to the stored value.
fn restore_declared(declared: Option<TypeTag>, cell: Value) -> Value {
    match (declared, cell) {
        (Some(TypeTag::Json), Value::String(text)) => {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        }
        (Some(TypeTag::Boolean), Value::Number(n)) => match n.as_i64() {
            Some(0) => Value::Bool(false),
            Some(1) => Value::Bool(true),
            _ => Value::Number(n),
        },
        (_, cell) => cell,
    }
}

/// Declared columns of `table` as `(name, declared type)`, in table order.
pub async fn table_columns(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Vec<(String, String)>, sqlx::Error> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_identifier(table)))
        .fetch_all(&mut *conn)
        .await?;
    rows.iter()
        .map(|row| Ok((row.try_get("name")?, row.try_get("type")?)))
        .collect()
}

/// Reads every row of a loaded table as a JSON record.
///
/// The identity column is left out and rows come back in insertion order.
/// JSON columns are parsed back into nested values and BOOLEAN columns into
/// booleans, so a table created by the loader reads back as the records it
/// was loaded from (null padding aside).
///
/// # Errors
///
/// Returns `sqlx::Error::Configuration` if the table does not exist, or the
/// underlying error if the read fails.
pub async fn read_table(
    conn: &mut SqliteConnection,
    table: &str,
) -> Result<Vec<Record>, sqlx::Error> {
    let declared = table_columns(conn, table).await?;
    if declared.is_empty() {
        return Err(sqlx::Error::Configuration(
            format!("table {table} does not exist").into(),
        ));
    }

    let has_id = declared.iter().any(|(name, _)| name == ID_COLUMN);
    let columns: Vec<(String, Option<TypeTag>)> = declared
        .into_iter()
        .filter(|(name, _)| name != ID_COLUMN)
        .map(|(name, decl)| {
            let tag = TypeTag::from_str(&decl).ok();
            (name, tag)
        })
        .collect();

    let select_list = if columns.is_empty() {
        "1".to_string()
    } else {
        columns
            .iter()
            .map(|(name, _)| quote_identifier(name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let order_by = if has_id {
        quote_identifier(ID_COLUMN)
    } else {
        "rowid".to_string()
    };
    let sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_list,
        quote_identifier(table),
        order_by
    );

    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record = Record::new();
        for (idx, (name, tag)) in columns.iter().enumerate() {
            let cell = read_cell(row, idx)?;
            record.insert(name.clone(), restore_declared(*tag, cell));
        }
        records.push(record);
    }
    Ok(records)
}

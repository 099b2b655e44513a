//! Queries behind the batched export.

use futures::TryStreamExt;
use serde_json::Value;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::types::{ExportRow, GroupKey};
use crate::config::ExportLayout;
use crate::error_handling::ExportError;
use crate::storage::{quote_identifier, read_cell};

fn push_bind_key(builder: &mut QueryBuilder<'_, Sqlite>, key: &GroupKey) {
    match key {
        GroupKey::Integer(i) => builder.push_bind(*i),
        GroupKey::Real(r) => builder.push_bind(*r),
        GroupKey::Text(s) => builder.push_bind(s.clone()),
    };
}

/// Distinct non-null grouping keys of the layout's table, ascending.
pub(crate) async fn fetch_group_keys(
    conn: &mut SqliteConnection,
    layout: &ExportLayout,
) -> Result<Vec<GroupKey>, sqlx::Error> {
    let key = quote_identifier(&layout.key_column);
    let sql = format!(
        "SELECT DISTINCT {key} FROM {table} WHERE {key} IS NOT NULL ORDER BY {key}",
        table = quote_identifier(&layout.table),
    );
    let mut rows = sqlx::query(&sql).fetch(&mut *conn);
    let mut keys = Vec::new();
    while let Some(row) = rows.try_next().await? {
        if let Some(key) = GroupKey::from_cell(&read_cell(&row, 0)?) {
            keys.push(key);
        }
    }
    Ok(keys)
}

/// The single community of the table, or `null` when no row carries one.
///
/// A second distinct value is an error.
pub(crate) async fn fetch_community_id(
    conn: &mut SqliteConnection,
    layout: &ExportLayout,
) -> Result<Value, ExportError> {
    let community = quote_identifier(&layout.community_column);
    let sql = format!(
        "SELECT DISTINCT {community} FROM {table} WHERE {community} IS NOT NULL LIMIT 2",
        table = quote_identifier(&layout.table),
    );
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    let mut values = rows
        .iter()
        .map(|row| read_cell(row, 0))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();

    match (values.next(), values.next()) {
        (None, _) => Ok(Value::Null),
        (Some(first), None) => Ok(first),
        (Some(first), Some(second)) => Err(ExportError::MixedCommunity {
            first: display_cell(&first),
            second: display_cell(&second),
        }),
    }
}

/// Rows whose key lies in `[first, last]`, ordered by key then order column.
pub(crate) async fn fetch_window_rows(
    conn: &mut SqliteConnection,
    layout: &ExportLayout,
    first: &GroupKey,
    last: &GroupKey,
) -> Result<Vec<ExportRow>, sqlx::Error> {
    let key = quote_identifier(&layout.key_column);
    let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT ");
    builder.push(format!(
        "{key}, {system}, {kind}, {application}, {correlation} FROM {table} WHERE {key} BETWEEN ",
        system = quote_identifier(&layout.system_column),
        kind = quote_identifier(&layout.type_column),
        application = quote_identifier(&layout.application_column),
        correlation = quote_identifier(&layout.correlation_column),
        table = quote_identifier(&layout.table),
    ));
    push_bind_key(&mut builder, first);
    builder.push(" AND ");
    push_bind_key(&mut builder, last);
    builder.push(format!(
        " ORDER BY {key}, {order}",
        order = quote_identifier(&layout.order_column)
    ));

    let mut rows = builder.build().fetch(&mut *conn);
    let mut out = Vec::new();
    while let Some(row) = rows.try_next().await? {
        let Some(key) = GroupKey::from_cell(&read_cell(&row, 0)?) else {
            continue;
        };
        out.push(ExportRow {
            key,
            system: read_cell(&row, 1)?,
            kind: read_cell(&row, 2)?,
            application_id: read_cell(&row, 3)?,
            correlation: read_cell(&row, 4)?,
        });
    }
    Ok(out)
}

/// Plain text form of a cell for messages.
pub(crate) fn display_cell(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

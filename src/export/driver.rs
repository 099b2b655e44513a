//! Batched export of grouped rows into numbered JSON files.

use std::sync::Arc;

use log::debug;
use sqlx::{Connection, SqliteConnection};

use super::batch::{batch_file_name, BatchPaginator};
use super::grouping::build_batch_document;
use super::queries::{display_cell, fetch_community_id, fetch_group_keys, fetch_window_rows};
use super::types::{ExportSummary, FlatExportSummary};
use super::writer::write_pretty_json;
use crate::app::EventSink;
use crate::config::{ConnectionConfig, DumpOptions, ExportOptions, FlatExportOptions};
use crate::error_handling::{DatabaseError, ExportError};
use crate::storage::open_connection;

/// Runs exports over the single storage connection of an export operation.
pub struct ExportDriver {
    conn: SqliteConnection,
    sink: Arc<dyn EventSink>,
}

impl ExportDriver {
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

    /// The underlying connection.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Closes the connection.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await?;
        self.sink.status("Database connection closed");
        Ok(())
    }

    /// Writes one file per window of `batch_size` grouping keys.
    ///
    /// Each file holds the table's community identifier and one envelope per
    /// key of its window. A table without keys writes nothing and reports a
    /// zero summary. Progress is reported after every file.
    pub async fn export_batches(
        &mut self,
        options: &ExportOptions,
    ) -> Result<ExportSummary, ExportError> {
        let layout = &options.layout;
        let keys = fetch_group_keys(&mut self.conn, layout).await?;
        if keys.is_empty() {
            self.sink
                .status(&format!("No data found in {} table", layout.table));
            return Ok(ExportSummary::default());
        }

        let community_id = fetch_community_id(&mut self.conn, layout).await?;
        let paginator = BatchPaginator::new(keys, options.batch_size);
        let total = paginator.batch_count();
        self.sink.status(&format!(
            "Found {} unique entities; CommunityID: {}; will create {} file(s)",
            paginator.key_count(),
            display_cell(&community_id),
            total
        ));

        let mut files = Vec::with_capacity(total);
        for window in paginator.windows() {
            let Some((first, last)) = window.bounds() else {
                continue;
            };
            debug!(
                "Fetching batch {} ({} to {})",
                window.number, first, last
            );
            let rows = fetch_window_rows(&mut self.conn, layout, first, last).await?;
            let document = build_batch_document(rows, community_id.clone());

            let name = batch_file_name(&options.prefix, window.number, &options.extension);
            let path = options.output_dir.join(&name);
            write_pretty_json(&path, &document)?;
            self.sink.status(&format!(
                "Created {} with {} entities",
                name,
                document.entities.len()
            ));
            self.sink.progress(window.number, total);
            files.push(path);
        }

        let summary = ExportSummary {
            file_count: files.len(),
            entity_count: paginator.key_count(),
            files,
        };
        self.sink.status(&format!(
            "Export completed: {} entities in {} file(s)",
            summary.entity_count, summary.file_count
        ));
        Ok(summary)
    }

    /// Writes the flat merge export as a JSON array and a CSV companion.
    pub async fn export_flat(
        &mut self,
        options: &FlatExportOptions,
    ) -> Result<FlatExportSummary, ExportError> {
        super::flat::export_flat(&mut self.conn, options, self.sink.as_ref()).await
    }

    /// Dumps a whole table as a JSON array of objects.
    pub async fn export_table(&mut self, options: &DumpOptions) -> Result<usize, ExportError> {
        super::table::export_table(&mut self.conn, options, self.sink.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RecordingSink;
    use crate::config::ExportLayout;
    use crate::storage::test_helpers::create_test_connection;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    async fn seed(conn: &mut SqliteConnection, rows: &[(i64, &str, &str, Option<&str>)]) {
        sqlx::query(
            "CREATE TABLE \"PostScript_AllianceMerge\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"EntityID\" BIGINT, \"CommunityID\" TEXT, \"ApplicationID\" TEXT, \
             \"EntityType\" TEXT, \"TargetID\" TEXT, \"SourceIDValue\" TEXT)",
        )
        .execute(&mut *conn)
        .await
        .unwrap();
        for &(entity, community, app, correlation) in rows {
            sqlx::query(
                "INSERT INTO \"PostScript_AllianceMerge\" (\"EntityID\", \"CommunityID\", \
                 \"ApplicationID\", \"EntityType\", \"TargetID\", \"SourceIDValue\") \
                 VALUES (?, ?, ?, 'Person', ?, ?)",
            )
            .bind(entity)
            .bind(community)
            .bind(format!("SYS-{app}"))
            .bind(app)
            .bind(correlation)
            .execute(&mut *conn)
            .await
            .unwrap();
        }
    }

    fn options(dir: &TempDir, batch_size: usize) -> ExportOptions {
        ExportOptions {
            output_dir: dir.path().to_path_buf(),
            batch_size,
            ..ExportOptions::default()
        }
    }

    fn read_json(path: &std::path::Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_export_batches_groups_and_paginates() {
        let mut conn = create_test_connection().await;
        seed(
            &mut conn,
            &[
                (3, "C1", "b", None),
                (1, "C1", "z", Some("K1")),
                (1, "C1", "a", Some("")),
                (2, "C1", "m", None),
            ],
        )
        .await;
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let mut driver = ExportDriver::new(conn, sink.clone());

        let summary = driver.export_batches(&options(&dir, 2)).await.unwrap();

        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.entity_count, 3);
        assert_eq!(summary.files[0], dir.path().join("Export1.json"));

        let first = read_json(&summary.files[0]);
        assert_eq!(first["CommunityId"], json!("C1"));
        let entities = first["Entities"].as_array().unwrap();
        assert_eq!(entities.len(), 2);
        let items = entities[0]["Entity"].as_array().unwrap();
        assert_eq!(items[0]["system"], json!("SYS-a"));
        assert_eq!(items[0]["applicationId"], json!("a"));
        assert!(items[0].get("correlationId").is_none());
        assert_eq!(items[1]["correlationId"], json!("K1"));

        let second = read_json(&summary.files[1]);
        assert_eq!(second["Entities"].as_array().unwrap().len(), 1);
        assert_eq!(second["Entities"][0]["Entity"][0]["applicationId"], json!("b"));

        let progress: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, crate::app::OperationEvent::Progress { .. }))
            .collect();
        assert_eq!(progress.len(), 2);
    }

    #[tokio::test]
    async fn test_export_batches_empty_table() {
        let mut conn = create_test_connection().await;
        seed(&mut conn, &[]).await;
        let dir = TempDir::new().unwrap();
        let mut driver = ExportDriver::new(conn, Arc::new(RecordingSink::default()));

        let summary = driver.export_batches(&options(&dir, 10)).await.unwrap();

        assert_eq!(summary, ExportSummary::default());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_export_batches_rejects_mixed_community() {
        let mut conn = create_test_connection().await;
        seed(&mut conn, &[(1, "C1", "a", None), (2, "C2", "b", None)]).await;
        let dir = TempDir::new().unwrap();
        let mut driver = ExportDriver::new(conn, Arc::new(RecordingSink::default()));

        let err = driver.export_batches(&options(&dir, 10)).await.unwrap_err();

        assert!(matches!(err, ExportError::MixedCommunity { .. }));
    }

    #[tokio::test]
    async fn test_export_batches_custom_layout_text_keys() {
        let mut conn = create_test_connection().await;
        sqlx::query("CREATE TABLE t (k TEXT, c TEXT, s TEXT, ty TEXT, a TEXT, x TEXT)")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO t VALUES ('b', NULL, 's', 't', 'a2', NULL), \
             ('a', NULL, 's', 't', 'a1', NULL), (NULL, NULL, 's', 't', 'a0', NULL)",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        let dir = TempDir::new().unwrap();
        let mut driver = ExportDriver::new(conn, Arc::new(RecordingSink::default()));
        let options = ExportOptions {
            output_dir: dir.path().to_path_buf(),
            prefix: "Out".to_string(),
            extension: "txt".to_string(),
            batch_size: 5,
            layout: ExportLayout {
                table: "t".to_string(),
                key_column: "k".to_string(),
                community_column: "c".to_string(),
                system_column: "s".to_string(),
                type_column: "ty".to_string(),
                application_column: "a".to_string(),
                correlation_column: "x".to_string(),
                order_column: "a".to_string(),
            },
        };

        let summary = driver.export_batches(&options).await.unwrap();

        assert_eq!(summary.entity_count, 2);
        assert_eq!(summary.files, vec![dir.path().join("Out1.txt")]);
        let doc = read_json(&summary.files[0]);
        assert_eq!(doc["CommunityId"], Value::Null);
        assert_eq!(doc["Entities"][0]["Entity"][0]["applicationId"], json!("a1"));
        assert_eq!(doc["Entities"][1]["Entity"][0]["applicationId"], json!("a2"));
    }
}

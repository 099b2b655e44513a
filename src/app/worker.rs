//! Operation workers.
//!
//! Each operation runs on its own tokio task with its own connection. The
//! caller gets the task handle and the receiving half of the event channel;
//! the channel closes when the task finishes. Options are validated before the
//! task is spawned, so an invalid request never touches storage.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;

use super::events::{EventSink, OperationEvent};
use crate::config::{ConnectionConfig, DumpOptions, ExportOptions, FlatExportOptions, ImportOptions};
use crate::error_handling::ValidationError;
use crate::export::{ExportDriver, ExportSummary, FlatExportSummary};
use crate::load::{import_directory, BulkLoader, ImportSummary};

/// A running operation.
#[derive(Debug)]
pub struct OperationHandle<T> {
    /// Status and progress events, in emission order
    pub events: UnboundedReceiver<OperationEvent>,
    /// Resolves to the operation's result
    pub result: JoinHandle<Result<T>>,
}

impl<T> OperationHandle<T> {
    /// Forwards every event to `on_event`, then awaits the result.
    pub async fn join_with<F>(self, mut on_event: F) -> Result<T>
    where
        F: FnMut(OperationEvent),
    {
        let OperationHandle { mut events, result } = self;
        while let Some(event) = events.recv().await {
            on_event(event);
        }
        result.await.context("Operation task panicked")?
    }
}

fn spawn_operation<T, F, Fut>(run: F) -> OperationHandle<T>
where
    T: Send + 'static,
    F: FnOnce(Arc<dyn EventSink>) -> Fut,
    Fut: std::future::Future<Output = Result<T>> + Send + 'static,
{
    let (tx, events) = unbounded_channel();
    let sink: Arc<dyn EventSink> = Arc::new(tx);
    let result = tokio::spawn(run(sink));
    OperationHandle { events, result }
}

/// Imports every matching file of a directory.
pub fn spawn_import(
    connection: ConnectionConfig,
    options: ImportOptions,
) -> Result<OperationHandle<ImportSummary>, ValidationError> {
    connection.validate()?;
    options.validate()?;
    Ok(spawn_operation(move |sink| async move {
        run_import(&connection, &options, sink).await
    }))
}

/// Writes batched grouped documents.
pub fn spawn_export(
    connection: ConnectionConfig,
    options: ExportOptions,
) -> Result<OperationHandle<ExportSummary>, ValidationError> {
    connection.validate()?;
    options.validate()?;
    Ok(spawn_operation(move |sink| async move {
        let mut driver = connect_driver(&connection, sink).await?;
        let summary = driver
            .export_batches(&options)
            .await
            .with_context(|| format!("Failed to export table {}", options.layout.table))?;
        close_driver(driver).await;
        Ok(summary)
    }))
}

/// Writes the flat JSON array and CSV companion.
pub fn spawn_flat_export(
    connection: ConnectionConfig,
    options: FlatExportOptions,
) -> Result<OperationHandle<FlatExportSummary>, ValidationError> {
    connection.validate()?;
    options.validate()?;
    Ok(spawn_operation(move |sink| async move {
        let mut driver = connect_driver(&connection, sink).await?;
        let summary = driver
            .export_flat(&options)
            .await
            .with_context(|| format!("Failed to export table {}", options.table))?;
        close_driver(driver).await;
        Ok(summary)
    }))
}

/// Dumps one table to a JSON array file. Resolves to the row count.
pub fn spawn_dump(
    connection: ConnectionConfig,
    options: DumpOptions,
) -> Result<OperationHandle<usize>, ValidationError> {
    connection.validate()?;
    options.validate()?;
    Ok(spawn_operation(move |sink| async move {
        let mut driver = connect_driver(&connection, sink).await?;
        let rows = driver
            .export_table(&options)
            .await
            .with_context(|| format!("Failed to dump table {}", options.table))?;
        close_driver(driver).await;
        Ok(rows)
    }))
}

/// Body of an import task; usable directly when no separate task is wanted.
pub async fn run_import(
    connection: &ConnectionConfig,
    options: &ImportOptions,
    sink: Arc<dyn EventSink>,
) -> Result<ImportSummary> {
    let mut loader = BulkLoader::connect(connection, sink)
        .await
        .context("Failed to connect to database")?;
    let summary = import_directory(&mut loader, options)
        .await
        .with_context(|| format!("Failed to read directory {}", options.directory.display()))?;
    if let Err(e) = loader.close().await {
        warn!("Failed to close database connection: {}", e);
    }
    Ok(summary)
}

async fn connect_driver(
    connection: &ConnectionConfig,
    sink: Arc<dyn EventSink>,
) -> Result<ExportDriver> {
    ExportDriver::connect(connection, sink)
        .await
        .context("Failed to connect to database")
}

async fn close_driver(driver: ExportDriver) {
    if let Err(e) = driver.close().await {
        warn!("Failed to close database connection: {}", e);
    }
}

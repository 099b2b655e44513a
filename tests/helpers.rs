// Shared test helpers for database setup and input file creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use sqlx::SqliteConnection;
use tempfile::TempDir;

use json_table_bridge::storage::open_connection;
use json_table_bridge::{BulkLoader, ConnectionConfig, LogSink};

/// A scratch area with an input directory, an output directory and a database file.
pub struct Workspace {
    pub dir: TempDir,
}

#[allow(dead_code)] // Not every test file uses every helper
impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("input")).expect("Failed to create input dir");
        std::fs::create_dir(dir.path().join("output")).expect("Failed to create output dir");
        Self { dir }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.dir.path().join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("output")
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            db_path: self.dir.path().join("bridge.db"),
            ..ConnectionConfig::default()
        }
    }

    /// Writes `content` verbatim to `input/<name>`.
    pub fn write_input(&self, name: &str, content: &str) -> PathBuf {
        let path = self.input_dir().join(name);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// Writes `value` as JSON to `input/<name>`.
    pub fn write_input_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write_input(
            name,
            &serde_json::to_string_pretty(value).expect("Failed to serialize input"),
        )
    }

    pub async fn connect(&self) -> SqliteConnection {
        open_connection(&self.connection_config())
            .await
            .expect("Failed to open test database")
    }

    pub async fn loader(&self) -> BulkLoader {
        BulkLoader::connect(&self.connection_config(), Arc::new(LogSink))
            .await
            .expect("Failed to open test database")
    }
}

#[allow(dead_code)]
pub fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("Failed to read output file");
    serde_json::from_str(&text).expect("Output is not valid JSON")
}

#[allow(dead_code)]
pub async fn row_count(conn: &mut SqliteConnection, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", table))
        .fetch_one(conn)
        .await
        .expect("Failed to count rows")
}

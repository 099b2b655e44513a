//! Directory import through the public API.

mod helpers;

use helpers::{row_count, Workspace};
use json_table_bridge::load::import_directory;
use json_table_bridge::storage::read_table;
use json_table_bridge::{spawn_import, ImportOptions, OperationEvent};
use serde_json::json;
use sqlx::Connection;

fn options(ws: &Workspace) -> ImportOptions {
    ImportOptions {
        directory: ws.input_dir(),
        ..ImportOptions::default()
    }
}

#[tokio::test]
async fn test_mixed_directory_summary() {
    let ws = Workspace::new();
    ws.write_input_json("valid.json", &json!([{"name": "Ada", "age": 36}]));
    ws.write_input("empty.json", "[]");
    ws.write_input("broken.json", "{\"name\": ");
    ws.write_input("notes.txt", "ignored");

    let mut loader = ws.loader().await;
    let summary = import_directory(&mut loader, &options(&ws)).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed_files, vec!["broken.json".to_string()]);
    assert_eq!(summary.skipped_files, vec!["empty.json".to_string()]);

    assert_eq!(row_count(loader.connection(), "valid").await, 1);
}

#[tokio::test]
async fn test_failed_file_does_not_touch_earlier_tables() {
    let ws = Workspace::new();
    ws.write_input_json("a_people.json", &json!([{"name": "Ada"}, {"name": "Grace"}]));
    // A field named like the identity column cannot be created.
    ws.write_input_json("b_bad.json", &json!([{"id": 1, "name": "x"}]));

    let mut loader = ws.loader().await;
    let summary = import_directory(&mut loader, &options(&ws)).await.unwrap();

    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(row_count(loader.connection(), "a_people").await, 2);
}

#[tokio::test]
async fn test_insert_failure_in_middle_file_is_isolated() {
    let ws = Workspace::new();
    ws.write_input_json("a_people.json", &json!([{"name": "Ada"}, {"name": "Grace"}]));
    ws.write_input_json("b_orders.json", &json!([{"total": 5}]));
    ws.write_input_json("c_cities.json", &json!([{"city": "London"}]));

    // An exhausted autoincrement sequence for b_orders lets its CREATE pass
    // and makes the first INSERT fail.
    let mut conn = ws.connect().await;
    sqlx::query("CREATE TABLE \"seed\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT)")
        .execute(&mut conn)
        .await
        .unwrap();
    sqlx::query("INSERT INTO sqlite_sequence (name, seq) VALUES ('b_orders', ?)")
        .bind(i64::MAX)
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();

    let mut statuses = Vec::new();
    let summary = spawn_import(ws.connection_config(), options(&ws))
        .unwrap()
        .join_with(|event| {
            if let OperationEvent::Status(line) = event {
                statuses.push(line);
            }
        })
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failed_files, vec!["b_orders.json".to_string()]);
    assert!(statuses
        .iter()
        .any(|s| s == "Created table b_orders with 1 columns"));
    assert!(!statuses.iter().any(|s| s.starts_with("Inserted") && s.ends_with("b_orders")));

    let mut conn = ws.connect().await;
    assert_eq!(row_count(&mut conn, "a_people").await, 2);
    assert_eq!(row_count(&mut conn, "c_cities").await, 1);
    let orders: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'b_orders'",
    )
    .fetch_one(&mut conn)
    .await
    .unwrap();
    assert_eq!(orders, 0);
}

#[tokio::test]
async fn test_failed_reimport_keeps_previous_table() {
    let ws = Workspace::new();
    ws.write_input_json("people.json", &json!([{"name": "Ada"}]));
    let mut loader = ws.loader().await;
    import_directory(&mut loader, &options(&ws)).await.unwrap();

    ws.write_input_json("people.json", &json!([{"ID": 1}, {"id": 2}]));
    let summary = import_directory(&mut loader, &options(&ws)).await.unwrap();
    assert_eq!(summary.failed, 1);

    let records = read_table(loader.connection(), "people").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], json!("Ada"));
}

#[tokio::test]
async fn test_reimport_replaces_table() {
    let ws = Workspace::new();
    ws.write_input_json("people.json", &json!([{"name": "Ada"}, {"name": "Grace"}]));
    let mut loader = ws.loader().await;
    import_directory(&mut loader, &options(&ws)).await.unwrap();

    ws.write_input_json("people.json", &json!([{"city": "London"}]));
    import_directory(&mut loader, &options(&ws)).await.unwrap();

    let records = read_table(loader.connection(), "people").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("city"), Some(&json!("London")));
    assert!(records[0].get("name").is_none());
}

#[tokio::test]
async fn test_single_object_and_extension_filter() {
    let ws = Workspace::new();
    ws.write_input_json("single.JSON", &json!({"k": "v"}));
    ws.write_input_json("other.json", &json!({"k": "w"}));

    let mut loader = ws.loader().await;
    let summary = import_directory(&mut loader, &options(&ws)).await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.successful, 2);
    assert_eq!(row_count(loader.connection(), "single").await, 1);
}

#[tokio::test]
async fn test_spawned_import_reports_progress_per_file() {
    let ws = Workspace::new();
    ws.write_input_json("one.json", &json!([{"a": 1}]));
    ws.write_input_json("two.json", &json!([{"b": 2}]));

    let handle = spawn_import(ws.connection_config(), options(&ws)).unwrap();
    let mut progress = Vec::new();
    let summary = handle
        .join_with(|event| {
            if let OperationEvent::Progress { current, total } = event {
                progress.push((current, total));
            }
        })
        .await
        .unwrap();

    assert_eq!(summary.successful, 2);
    assert_eq!(progress, vec![(1, 2), (2, 2)]);
}

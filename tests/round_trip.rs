//! Import, read back, dump, and import the dump again.

mod helpers;

use helpers::{read_json, Workspace};
use json_table_bridge::load::import_directory;
use json_table_bridge::storage::{read_table, table_columns};
use json_table_bridge::{spawn_dump, DumpOptions, ImportOptions};
use serde_json::{json, Value};

fn people() -> Value {
    json!([
        {
            "name": "Ada",
            "active": true,
            "visits": 3,
            "balance": 2147483648i64,
            "score": 1.25,
            "tags": ["math", "engines"],
            "address": {"city": "London", "zip": null},
            "note": null
        },
        {
            "name": "Grace",
            "active": null,
            "visits": -7,
            "balance": -2147483649i64,
            "score": 0.5,
            "tags": [],
            "address": {"city": "Arlington"},
            "note": "compiler"
        }
    ])
}

#[tokio::test]
async fn test_read_back_reproduces_records() {
    let ws = Workspace::new();
    ws.write_input_json("people.json", &people());
    let mut loader = ws.loader().await;
    import_directory(
        &mut loader,
        &ImportOptions {
            directory: ws.input_dir(),
            ..ImportOptions::default()
        },
    )
    .await
    .unwrap();

    let records = read_table(loader.connection(), "people").await.unwrap();
    let records: Vec<Value> = records.into_iter().map(Value::Object).collect();
    assert_eq!(Value::Array(records), people());

    let columns = table_columns(loader.connection(), "people").await.unwrap();
    let types: Vec<(&str, &str)> = columns
        .iter()
        .map(|(n, t)| (n.as_str(), t.as_str()))
        .collect();
    assert_eq!(
        types,
        vec![
            ("id", "INTEGER"),
            ("active", "BOOLEAN"),
            ("address", "JSON"),
            ("balance", "BIGINT"),
            ("name", "VARCHAR(255)"),
            ("note", "VARCHAR(255)"),
            ("score", "DOUBLE"),
            ("tags", "JSON"),
            ("visits", "INT"),
        ]
    );
}

#[tokio::test]
async fn test_dump_then_reimport_is_stable() {
    let ws = Workspace::new();
    ws.write_input_json("people.json", &people());
    let options = ImportOptions {
        directory: ws.input_dir(),
        ..ImportOptions::default()
    };
    let mut loader = ws.loader().await;
    import_directory(&mut loader, &options).await.unwrap();

    let dump_path = ws.output_dir().join("people.json");
    let rows = spawn_dump(
        ws.connection_config(),
        DumpOptions {
            table: "people".to_string(),
            output: dump_path.clone(),
        },
    )
    .unwrap()
    .join_with(|_| {})
    .await
    .unwrap();
    assert_eq!(rows, 2);
    assert_eq!(read_json(&dump_path), people());

    // Import the dump in place of the original file.
    std::fs::copy(&dump_path, ws.input_dir().join("people.json")).unwrap();
    let summary = import_directory(&mut loader, &options).await.unwrap();
    assert_eq!(summary.successful, 1);

    let records = read_table(loader.connection(), "people").await.unwrap();
    let records: Vec<Value> = records.into_iter().map(Value::Object).collect();
    assert_eq!(Value::Array(records), people());
}

#[tokio::test]
async fn test_json_column_with_scalar_members_round_trips() {
    let ws = Workspace::new();
    let source = json!([
        {"meta": {"a": 1}},
        {"meta": "123"},
        {"meta": "true"},
        {"meta": true},
        {"meta": "null"},
        {"meta": "[1,2]"},
        {"meta": -4}
    ]);
    ws.write_input_json("mixed.json", &source);
    let options = ImportOptions {
        directory: ws.input_dir(),
        ..ImportOptions::default()
    };
    let mut loader = ws.loader().await;
    import_directory(&mut loader, &options).await.unwrap();

    let records = read_table(loader.connection(), "mixed").await.unwrap();
    let records: Vec<Value> = records.into_iter().map(Value::Object).collect();
    assert_eq!(Value::Array(records), source);

    let dump_path = ws.output_dir().join("mixed.json");
    spawn_dump(
        ws.connection_config(),
        DumpOptions {
            table: "mixed".to_string(),
            output: dump_path.clone(),
        },
    )
    .unwrap()
    .join_with(|_| {})
    .await
    .unwrap();
    assert_eq!(read_json(&dump_path), source);
}

#[tokio::test]
async fn test_dump_missing_table_fails() {
    let ws = Workspace::new();
    let result = spawn_dump(
        ws.connection_config(),
        DumpOptions {
            table: "absent".to_string(),
            output: ws.output_dir().join("absent.json"),
        },
    )
    .unwrap()
    .join_with(|_| {})
    .await;

    assert!(result.is_err());
    assert!(!ws.output_dir().join("absent.json").exists());
}

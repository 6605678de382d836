//! Integration Tests
//!
//! End-to-end tests against the real embedded engine: local file and
//! in-memory databases, ephemeral read-only mode, and formatted output.
//! Remote backends (MotherDuck, S3, R2) are covered by the fake-engine unit
//! tests; nothing here talks to the network.

use pretty_assertions::assert_eq;

use duckgate::{BackendKind, ClientSettings, DatabaseClient};

fn memory_client(json_output: bool) -> DatabaseClient {
    DatabaseClient::connect(ClientSettings {
        db_path: Some(":memory:".to_string()),
        json_output,
        ..ClientSettings::default()
    })
    .expect("in-memory client should initialize")
}

#[test]
fn test_select_one_round_trip() {
    let client = memory_client(false);

    let result = client.execute("SELECT 1 AS x").unwrap();
    assert_eq!(result.columns, vec!["x"]);
    assert_eq!(result.column_types.len(), 1);
    assert_eq!(result.rows, vec![vec![serde_json::json!(1)]]);
}

#[test]
fn test_memory_client_is_local_and_persistent() {
    let client = memory_client(false);
    assert_eq!(client.backend_kind(), BackendKind::DuckDb);
    assert!(!client.is_ephemeral());
}

#[test]
fn test_column_order_and_types_preserved() {
    let client = memory_client(false);

    let result = client
        .execute("SELECT 1 AS z, 'two' AS a, true AS m")
        .unwrap();
    assert_eq!(result.columns, vec!["z", "a", "m"]);
    assert_eq!(result.column_types.len(), 3);
    // Type identifiers come from the engine, one per column in order
    assert!(result.column_types.iter().all(|t| !t.is_empty()));
}

#[test]
fn test_query_failure_does_not_invalidate_client() {
    let client = memory_client(false);

    let err = client.execute("SELECT * FROM missing_table").unwrap_err();
    assert_eq!(err.error_code(), "QUERY_FAILED");

    // The held handle is still healthy
    let result = client.execute("SELECT 2 AS x").unwrap();
    assert_eq!(result.rows, vec![vec![serde_json::json!(2)]]);
}

#[test]
fn test_statements_through_held_handle() {
    let client = memory_client(false);

    client.execute("CREATE TABLE users (id INTEGER, name VARCHAR)").unwrap();
    client.execute("INSERT INTO users VALUES (1, 'Alice'), (2, 'Bob')").unwrap();

    let result = client.execute("SELECT name FROM users ORDER BY id").unwrap();
    assert_eq!(result.columns, vec!["name"]);
    assert_eq!(
        result.rows,
        vec![vec![serde_json::json!("Alice")], vec![serde_json::json!("Bob")]]
    );
}

#[test]
fn test_read_only_file_client_is_ephemeral() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.db");
    let path_str = path.to_str().unwrap().to_string();

    // Seed the database with a writable client, then drop it
    {
        let writer = DatabaseClient::connect(ClientSettings {
            db_path: Some(path_str.clone()),
            ..ClientSettings::default()
        })
        .unwrap();
        writer.execute("CREATE TABLE t (id INTEGER)").unwrap();
        writer.execute("INSERT INTO t VALUES (1), (2), (3)").unwrap();
    }

    let reader = DatabaseClient::connect(ClientSettings {
        db_path: Some(path_str),
        read_only: true,
        ..ClientSettings::default()
    })
    .unwrap();
    assert!(reader.is_ephemeral());

    // Two sequential queries, each on its own short-lived connection
    let first = reader.execute("SELECT count(*) AS n FROM t").unwrap();
    assert_eq!(first.rows, vec![vec![serde_json::json!(3)]]);

    let second = reader.execute("SELECT max(id) AS m FROM t").unwrap();
    assert_eq!(second.rows, vec![vec![serde_json::json!(3)]]);
}

#[test]
fn test_read_only_client_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sealed.db");
    let path_str = path.to_str().unwrap().to_string();

    {
        let writer = DatabaseClient::connect(ClientSettings {
            db_path: Some(path_str.clone()),
            ..ClientSettings::default()
        })
        .unwrap();
        writer.execute("CREATE TABLE t (id INTEGER)").unwrap();
    }

    let reader = DatabaseClient::connect(ClientSettings {
        db_path: Some(path_str),
        read_only: true,
        ..ClientSettings::default()
    })
    .unwrap();

    let err = reader.execute("INSERT INTO t VALUES (1)").unwrap_err();
    assert_eq!(err.error_code(), "QUERY_FAILED");
}

#[test]
fn test_query_table_output() {
    let client = memory_client(false);

    let text = client.query("SELECT 1 AS x, 'hi' AS y").unwrap();
    // Header carries the column name with its type underneath
    assert!(text.contains('x'));
    assert!(text.contains('y'));
    assert!(text.contains("hi"));
    assert!(text.contains('+'), "expected an ASCII table frame: {text}");
}

#[test]
fn test_query_json_output() {
    let client = memory_client(true);

    let text = client.query("SELECT 1 AS x, 'hi' AS y").unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0]["x"], serde_json::json!(1));
    assert_eq!(parsed[0]["y"], serde_json::json!("hi"));
}

#[test]
fn test_default_settings_use_in_memory() {
    let client = DatabaseClient::connect(ClientSettings::default()).unwrap();
    assert_eq!(client.backend_kind(), BackendKind::DuckDb);

    let result = client.execute("SELECT 1 AS x").unwrap();
    assert_eq!(result.rows.len(), 1);
}

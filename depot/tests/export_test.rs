//! Integration tests for the single-format exports.
//!
//! Verifies:
//! - CSV-zip entry inventory, header/row content and RFC 4180 quoting
//! - JSON document shape and native value types
//! - deterministic archives for identical data
//! - Excel dispatch and the capability substitution
//! - SQLite copy rejection for in-memory stores

use depot::{AdminService, Error, ExportFormat, Store};
use std::fs::File;
use std::io::Read;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup(temp: &TempDir) -> AdminService {
    let store = Store::open(temp.path().join("warehouse.db"), false).unwrap();
    {
        let conn = store.connection();
        conn.execute_batch(
            r#"
            INSERT INTO users (username, password_hash) VALUES ('admin', 'hash');
            INSERT INTO suppliers (name, contact, notes) VALUES
                ('Acme, "Inc"', 'acme@example.com', 'line1
line2'),
                ('Bolt & Co', NULL, NULL);
            "#,
        )
        .unwrap();
    }
    AdminService::new(store, temp.path().join("uploads"))
}

fn zip_names(path: &std::path::Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
    names.sort();
    names
}

fn zip_entry(path: &std::path::Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

// ---------------------------------------------------------------------------
// CSV-zip
// ---------------------------------------------------------------------------

#[test]
fn test_csv_zip_inventory_and_content() {
    let temp = TempDir::new().unwrap();
    let admin = setup(&temp);
    let out = temp.path().join("out");

    let outcome = admin.request_export(ExportFormat::CsvZip, &out).unwrap();
    assert!(!outcome.substituted);
    assert_eq!(
        outcome.artifact.file_name().unwrap(),
        "warehouse_export.zip"
    );

    assert_eq!(
        zip_names(&outcome.artifact),
        vec![
            "items.csv",
            "materials.csv",
            "movements.csv",
            "suppliers.csv",
            "users.csv"
        ]
    );

    let suppliers = zip_entry(&outcome.artifact, "suppliers.csv");
    let mut reader = csv::Reader::from_reader(suppliers.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers, csv::StringRecord::from(vec!["id", "name", "contact", "notes"]));

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "Acme, \"Inc\"");
    assert_eq!(&records[0][3], "line1\nline2");
    assert_eq!(&records[1][1], "Bolt & Co");
    assert_eq!(&records[1][2], "");

    // Empty tables still get a header-only CSV.
    let items = zip_entry(&outcome.artifact, "items.csv");
    assert_eq!(items.lines().count(), 1);
}

#[test]
fn test_csv_zip_deterministic() {
    let temp = TempDir::new().unwrap();
    let admin = setup(&temp);

    let first = admin
        .request_export(ExportFormat::CsvZip, &temp.path().join("a"))
        .unwrap();
    let second = admin
        .request_export(ExportFormat::CsvZip, &temp.path().join("b"))
        .unwrap();

    let bytes_a = std::fs::read(&first.artifact).unwrap();
    let bytes_b = std::fs::read(&second.artifact).unwrap();
    assert_eq!(bytes_a, bytes_b);
    assert_eq!(first.metadata.checksum, second.metadata.checksum);
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn test_json_document_round_trip() {
    let temp = TempDir::new().unwrap();
    let admin = setup(&temp);

    let outcome = admin
        .request_export(ExportFormat::Json, &temp.path().join("out"))
        .unwrap();
    assert_eq!(
        outcome.artifact.file_name().unwrap(),
        "warehouse_export.json"
    );

    let doc: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&outcome.artifact).unwrap()).unwrap();

    for table in ["items", "materials", "movements", "suppliers", "users"] {
        assert!(doc[table].is_array(), "missing table {}", table);
    }

    let suppliers = doc["suppliers"].as_array().unwrap();
    assert_eq!(suppliers.len(), 2);
    assert_eq!(suppliers[0]["id"], serde_json::json!(1));
    assert_eq!(suppliers[0]["name"], serde_json::json!("Acme, \"Inc\""));
    assert_eq!(suppliers[1]["contact"], serde_json::Value::Null);

    let users = doc["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], serde_json::json!("admin"));
}

// ---------------------------------------------------------------------------
// Excel / capability substitution
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
#[test]
fn test_excel_export_delivers_workbook() {
    let temp = TempDir::new().unwrap();
    let admin = setup(&temp);

    let outcome = admin
        .request_export(ExportFormat::Excel, &temp.path().join("out"))
        .unwrap();
    assert!(!outcome.substituted);
    assert_eq!(outcome.delivered, ExportFormat::Excel);
    assert_eq!(
        outcome.artifact.file_name().unwrap(),
        "warehouse_export.xlsx"
    );

    let bytes = std::fs::read(&outcome.artifact).unwrap();
    assert_eq!(&bytes[..2], b"PK"); // xlsx is a zip container
}

#[cfg(not(feature = "xlsx"))]
#[test]
fn test_excel_request_substitutes_csv_zip() {
    let temp = TempDir::new().unwrap();
    let admin = setup(&temp);

    let outcome = admin
        .request_export(ExportFormat::Excel, &temp.path().join("out"))
        .unwrap();
    assert!(outcome.substituted);
    assert_eq!(outcome.requested, ExportFormat::Excel);
    assert_eq!(outcome.delivered, ExportFormat::CsvZip);
    assert_eq!(
        outcome.artifact.file_name().unwrap(),
        "warehouse_export.zip"
    );
}

// ---------------------------------------------------------------------------
// SQLite copy
// ---------------------------------------------------------------------------

#[test]
fn test_sqlite_export_rejected_for_in_memory_store() {
    let temp = TempDir::new().unwrap();
    let store = Store::open_in_memory(false).unwrap();
    let admin = AdminService::new(store, temp.path().join("uploads"));

    let err = admin
        .request_export(ExportFormat::Sqlite, temp.path())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));

    // No half-written artifact left behind.
    assert!(!temp.path().join("database_export.sqlite").exists());
}

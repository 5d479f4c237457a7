//! End-to-end scenario: export a small database, then reset it.
//!
//! Database holds `suppliers` (2 rows) and `users` (1 row). A csv-zip
//! export yields `suppliers.csv` (header + 2 lines) and `users.csv`
//! (header + 1 line); a subsequent confirmed reset leaves suppliers empty,
//! the user untouched and the upload directory empty.

use depot::{AdminService, ExportFormat, ResetRequest, Store};
use std::fs::{self, File};
use std::io::Read;
use tempfile::TempDir;

#[test]
fn test_export_then_reset_scenario() {
    let temp = TempDir::new().unwrap();
    let uploads = temp.path().join("uploads");
    fs::create_dir_all(&uploads).unwrap();
    fs::write(uploads.join("attachment.pdf"), b"pdf").unwrap();

    let store = Store::open(temp.path().join("warehouse.db"), false).unwrap();
    {
        let conn = store.connection();
        conn.execute_batch(
            "INSERT INTO users (username, password_hash) VALUES ('admin', 'hash');
             INSERT INTO suppliers (name) VALUES ('Acme'), ('Bolt & Co');",
        )
        .unwrap();
    }
    let admin = AdminService::new(store, &uploads);

    // Export first.
    let outcome = admin
        .request_export(ExportFormat::CsvZip, &temp.path().join("out"))
        .unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&outcome.artifact).unwrap()).unwrap();
    let mut read_entry = |name: &str| {
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    };
    assert_eq!(read_entry("suppliers.csv").lines().count(), 3); // header + 2
    assert_eq!(read_entry("users.csv").lines().count(), 2); // header + 1

    // Then reset.
    admin.request_reset(ResetRequest::confirmed()).unwrap();

    let conn = admin.store().connection();
    let suppliers: i64 = conn
        .query_row("SELECT COUNT(*) FROM suppliers", [], |r| r.get(0))
        .unwrap();
    let users: i64 = conn
        .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
        .unwrap();
    assert_eq!(suppliers, 0);
    assert_eq!(users, 1);
    assert!(fs::read_dir(&uploads).unwrap().next().is_none());
}

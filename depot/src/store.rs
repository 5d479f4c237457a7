//! SQLite store: connection management, schema bootstrap, and default seeding.
//!
//! The connection sits behind a single mutex. Administrative operations
//! (export, reset) hold the guard for their entire duration, so an export
//! snapshot can never be taken mid-reset and a reset can never start
//! mid-export.

use crate::error::Result;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Warehouse schema. Foreign keys point child → parent; the reset executor
/// derives its deletion order from them at runtime.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'operator',
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS suppliers (
    id      INTEGER PRIMARY KEY,
    name    TEXT NOT NULL,
    contact TEXT,
    notes   TEXT
);

CREATE TABLE IF NOT EXISTS materials (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    unit TEXT
);

CREATE TABLE IF NOT EXISTS items (
    id          INTEGER PRIMARY KEY,
    code        TEXT NOT NULL UNIQUE,
    description TEXT,
    supplier_id INTEGER REFERENCES suppliers(id),
    material_id INTEGER REFERENCES materials(id),
    quantity    INTEGER NOT NULL DEFAULT 0,
    location    TEXT
);

CREATE TABLE IF NOT EXISTS movements (
    id       INTEGER PRIMARY KEY,
    item_id  INTEGER NOT NULL REFERENCES items(id),
    user_id  INTEGER REFERENCES users(id),
    delta    INTEGER NOT NULL,
    moved_at TEXT NOT NULL DEFAULT (datetime('now')),
    note     TEXT
);
"#;

/// Handle to the warehouse database.
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) a file-backed store.
    ///
    /// `seed_defaults` is evaluated once: only when the database had no
    /// tables at all are the default lookup rows inserted. Reopening an
    /// existing database never re-seeds, and neither does a reset.
    pub fn open(path: impl AsRef<Path>, seed_defaults: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        initialize(&conn, seed_defaults)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Open an in-memory store (for testing). Not file-backed, so the
    /// SQLite-copy export format is unavailable.
    pub fn open_in_memory(seed_defaults: bool) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        initialize(&conn, seed_defaults)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Path of the backing database file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Database name used for artifact naming (file stem of the backing file).
    pub fn database_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "database".to_string())
    }

    /// Acquire the connection. The guard serializes administrative
    /// operations; hold it for the full duration of an export or reset.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Insert a small set of example rows (demo/bootstrap aid).
    pub fn insert_demo_rows(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            r#"
            INSERT INTO users (username, password_hash, role)
                VALUES ('admin', 'demo-not-a-real-hash', 'admin');
            INSERT INTO suppliers (name, contact) VALUES
                ('Northern Steel Co.', 'orders@northernsteel.example'),
                ('Valley Plastics', 'sales@valleyplastics.example');
            INSERT INTO materials (name, unit) VALUES
                ('Steel sheet', 'kg'),
                ('ABS pellet', 'kg');
            INSERT INTO items (code, description, supplier_id, material_id, quantity, location) VALUES
                ('STL-001', '2mm steel sheet',
                 (SELECT id FROM suppliers WHERE name = 'Northern Steel Co.'),
                 (SELECT id FROM materials WHERE name = 'Steel sheet'), 120, 'A-01'),
                ('ABS-014', 'ABS pellets, black',
                 (SELECT id FROM suppliers WHERE name = 'Valley Plastics'),
                 (SELECT id FROM materials WHERE name = 'ABS pellet'), 40, 'B-07');
            INSERT INTO movements (item_id, user_id, delta, note) VALUES
                ((SELECT id FROM items WHERE code = 'STL-001'),
                 (SELECT id FROM users WHERE username = 'admin'), 120, 'initial stock'),
                ((SELECT id FROM items WHERE code = 'ABS-014'),
                 (SELECT id FROM users WHERE username = 'admin'), 40, 'initial stock');
            "#,
        )?;
        tracing::info!("Inserted demo rows");
        Ok(())
    }
}

fn initialize(conn: &Connection, seed_defaults: bool) -> Result<()> {
    configure(conn)?;
    let fresh = table_count(conn)? == 0;
    conn.execute_batch(SCHEMA_SQL)?;
    if fresh && seed_defaults {
        seed_lookup_defaults(conn)?;
    }
    Ok(())
}

/// Connection pragmas: referential integrity on, WAL for file-backed stores.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

fn table_count(conn: &Connection) -> Result<usize> {
    let count: usize = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Default rows for the lookup tables. Applied only on first initialization
/// of an empty database; a later reset leaves these tables empty.
fn seed_lookup_defaults(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "INSERT INTO suppliers (name, notes)
             VALUES ('Generic supplier', 'Default placeholder supplier');
         INSERT INTO materials (name, unit)
             VALUES ('Unspecified material', 'pcs');",
    )?;
    tracing::info!("Seeded default lookup rows");
    Ok(())
}

//! Point-in-time snapshot of every table in the database.
//!
//! Tables are enumerated alphabetically from `sqlite_master` and read inside
//! one read transaction, so each table is captured fully or not at all and
//! the set of tables is consistent across the snapshot. Serialization
//! against concurrent writers is the caller's job (the admin service holds
//! the connection guard across the whole export).

use crate::error::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;

/// One table: name, ordered column names, ordered rows.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Rows as JSON objects (column → value), for the JSON document export.
    pub fn row_objects(&self) -> Vec<serde_json::Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Immutable snapshot of the whole database at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Database name (file stem of the backing file)
    pub database: String,
    /// Capture timestamp (RFC 3339)
    pub captured_at: String,
    /// Tables in alphabetical order
    pub tables: Vec<Table>,
}

impl Snapshot {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Total number of rows across all tables.
    pub fn row_count(&self) -> u64 {
        self.tables.iter().map(|t| t.rows.len() as u64).sum()
    }
}

/// Read a snapshot of every table defined in the schema.
pub fn read_snapshot(conn: &Connection, database: &str) -> Result<Snapshot> {
    let tx = conn.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let names: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<_, _>>()?;
    drop(stmt);

    let mut tables = Vec::with_capacity(names.len());
    for name in &names {
        tables.push(read_table(&tx, name)?);
        tracing::debug!(table = %name, "Captured table");
    }

    tx.commit()?;

    Ok(Snapshot {
        database: database.to_string(),
        captured_at: chrono::Utc::now().to_rfc3339(),
        tables,
    })
}

fn read_table(conn: &Connection, name: &str) -> Result<Table> {
    // SELECT * preserves the declared column order.
    let mut stmt = conn.prepare(&format!("SELECT * FROM \"{}\"", name))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut out = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut record = Vec::with_capacity(column_count);
        for i in 0..column_count {
            record.push(value_to_json(row.get_ref(i)?));
        }
        out.push(record);
    }

    Ok(Table {
        name: name.to_string(),
        columns,
        rows: out,
    })
}

/// Map a SQLite value to its native JSON counterpart. Blobs are base64.
fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(BASE64.encode(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_tables_alphabetical() {
        let store = Store::open_in_memory(false).unwrap();
        let conn = store.connection();
        let snapshot = read_snapshot(&conn, "test").unwrap();
        let names: Vec<&str> = snapshot.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["items", "materials", "movements", "suppliers", "users"]
        );
    }

    #[test]
    fn test_column_order_preserved() {
        let store = Store::open_in_memory(false).unwrap();
        let conn = store.connection();
        let snapshot = read_snapshot(&conn, "test").unwrap();
        let suppliers = snapshot.table("suppliers").unwrap();
        assert_eq!(suppliers.columns, vec!["id", "name", "contact", "notes"]);
    }

    #[test]
    fn test_native_value_types() {
        let store = Store::open_in_memory(false).unwrap();
        let conn = store.connection();
        conn.execute(
            "INSERT INTO suppliers (name, contact, notes) VALUES ('Acme', NULL, 'ok')",
            [],
        )
        .unwrap();
        let snapshot = read_snapshot(&conn, "test").unwrap();
        let row = &snapshot.table("suppliers").unwrap().rows[0];
        assert_eq!(row[0], Value::from(1));
        assert_eq!(row[1], Value::String("Acme".into()));
        assert_eq!(row[2], Value::Null);
    }

    #[test]
    fn test_row_objects_round_trip() {
        let store = Store::open_in_memory(false).unwrap();
        let conn = store.connection();
        conn.execute("INSERT INTO materials (name, unit) VALUES ('Steel', 'kg')", [])
            .unwrap();
        let snapshot = read_snapshot(&conn, "test").unwrap();
        let objects = snapshot.table("materials").unwrap().row_objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["name"], Value::String("Steel".into()));
        assert_eq!(objects[0]["unit"], Value::String("kg".into()));
    }
}

//! SQLite export: binary copy of the live database's storage file.

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Copy the backing database file into `dest`. The WAL is checkpointed
/// first so the copy is self-contained. The caller must hold the connection
/// guard so no writer can race the copy.
pub fn copy_database(conn: &Connection, db_path: &Path, dest: &mut dyn Write) -> Result<u64> {
    checkpoint(conn)?;
    let mut file = File::open(db_path)
        .map_err(|e| Error::Export(format!("Cannot open {}: {}", db_path.display(), e)))?;
    let copied = std::io::copy(&mut file, dest)?;
    tracing::debug!(bytes = copied, "Copied database file");
    Ok(copied)
}

/// Error for stores without a backing file (in-memory databases).
pub fn unsupported() -> Error {
    Error::UnsupportedFormat(
        "sqlite copy requires a file-backed database; the active store is in-memory".to_string(),
    )
}

fn checkpoint(conn: &Connection) -> Result<()> {
    // wal_checkpoint returns a result row; query_row consumes it.
    conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
    Ok(())
}

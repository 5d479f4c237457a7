//! Destructive reset: wipe all business data, keep user accounts.
//!
//! Flow: `PendingConfirmation → Executing → Completed | Failed`. Without an
//! explicit confirmation nothing is mutated. A confirmed reset deletes all
//! rows from every table except `users` inside one transaction — children
//! before parents, order derived from the schema's foreign keys — then
//! clears the upload directory. A failure anywhere in the transaction rolls
//! the whole delete set back; upload cleanup failures are collected per file
//! and never roll back the already-committed wipe. There is no undo once
//! the transaction commits.

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Tables never touched by a reset.
const PRESERVED_TABLES: &[&str] = &["users"];

/// A reset request. `confirmed` is the caller-supplied confirmation signal;
/// without it the executor performs no mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetRequest {
    pub confirmed: bool,
}

impl ResetRequest {
    pub fn confirmed() -> Self {
        Self { confirmed: true }
    }
}

/// One upload-directory entry that could not be removed.
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a completed reset.
#[derive(Debug, Clone)]
pub struct ResetReport {
    /// Tables emptied, in deletion order
    pub tables_cleared: Vec<String>,
    /// Total rows deleted across all tables
    pub rows_deleted: u64,
    /// Upload entries removed
    pub uploads_removed: usize,
    /// Upload entries that could not be removed
    pub upload_failures: Vec<UploadFailure>,
}

/// Execute a reset. The caller must hold the store's connection guard for
/// the whole call so no export can interleave.
pub fn execute(
    conn: &mut Connection,
    upload_dir: &Path,
    request: ResetRequest,
) -> Result<ResetReport> {
    if !request.confirmed {
        tracing::info!("Reset requested without confirmation, refusing");
        return Err(Error::ResetNotConfirmed);
    }

    let order = deletion_order(conn)?;
    tracing::info!(tables = ?order, "Executing reset");

    let mut rows_deleted = 0u64;
    {
        let tx = conn
            .transaction()
            .map_err(|e| Error::Reset(format!("cannot begin transaction: {}", e)))?;
        // Constraint checks move to commit time, so the delete order only
        // has to be plausible, not perfect, even with FK cycles.
        tx.execute_batch("PRAGMA defer_foreign_keys = ON")
            .map_err(|e| Error::Reset(e.to_string()))?;
        for table in &order {
            let deleted = tx
                .execute(&format!("DELETE FROM \"{}\"", table), [])
                .map_err(|e| Error::Reset(format!("deleting from {}: {}", table, e)))?;
            rows_deleted += deleted as u64;
            tracing::debug!(table = %table, rows = deleted, "Cleared table");
        }
        tx.commit()
            .map_err(|e| Error::Reset(format!("commit failed, rolled back: {}", e)))?;
    }

    let (uploads_removed, upload_failures) = clear_upload_dir(upload_dir);
    if !upload_failures.is_empty() {
        tracing::warn!(
            failed = upload_failures.len(),
            "Some upload entries could not be removed"
        );
    }

    tracing::info!(
        rows = rows_deleted,
        uploads = uploads_removed,
        "Reset completed"
    );

    Ok(ResetReport {
        tables_cleared: order,
        rows_deleted,
        uploads_removed,
        upload_failures,
    })
}

/// Compute the deletion order: every non-preserved table, children before
/// parents, alphabetical tie-break. Kahn's algorithm over the foreign-key
/// graph; a cycle falls back to alphabetical order for the remainder (the
/// deferred constraint check covers it).
pub fn deletion_order(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let all: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<_, _>>()?;
    drop(stmt);

    let tables: Vec<String> = all
        .into_iter()
        .filter(|t| !PRESERVED_TABLES.contains(&t.as_str()))
        .collect();
    let table_set: HashSet<&str> = tables.iter().map(|t| t.as_str()).collect();

    // parents[child] = tables the child references; referenced_by[parent] =
    // number of remaining children pointing at it.
    let mut parents: HashMap<String, Vec<String>> = HashMap::new();
    let mut referenced_by: HashMap<String, usize> = tables.iter().map(|t| (t.clone(), 0)).collect();

    for table in &tables {
        let mut stmt = conn.prepare(&format!("PRAGMA foreign_key_list(\"{}\")", table))?;
        let refs: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(2))?
            .collect::<std::result::Result<_, _>>()?;
        for parent in refs {
            if parent != *table && table_set.contains(parent.as_str()) {
                *referenced_by.get_mut(&parent).unwrap() += 1;
                parents.entry(table.clone()).or_default().push(parent);
            }
        }
    }

    let mut order = Vec::with_capacity(tables.len());
    let mut remaining: Vec<String> = tables;
    while !remaining.is_empty() {
        // Ready = not referenced by any remaining table. `remaining` stays
        // sorted, so ties resolve alphabetically.
        let ready: Vec<String> = remaining
            .iter()
            .filter(|t| referenced_by[*t] == 0)
            .cloned()
            .collect();
        if ready.is_empty() {
            // FK cycle: deterministic fallback.
            order.extend(remaining);
            break;
        }
        for table in &ready {
            if let Some(ps) = parents.get(table) {
                for parent in ps {
                    *referenced_by.get_mut(parent).unwrap() -= 1;
                }
            }
        }
        remaining.retain(|t| !ready.contains(t));
        order.extend(ready);
    }

    Ok(order)
}

/// Remove every entry under the upload directory, continuing past
/// individual failures. A missing directory counts as already clean.
fn clear_upload_dir(dir: &Path) -> (usize, Vec<UploadFailure>) {
    let mut removed = 0usize;
    let mut failures = Vec::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return (0, failures),
        Err(e) => {
            failures.push(UploadFailure {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return (0, failures);
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                failures.push(UploadFailure {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => failures.push(UploadFailure {
                path,
                reason: e.to_string(),
            }),
        }
    }

    (removed, failures)
}

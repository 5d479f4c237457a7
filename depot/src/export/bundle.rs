//! All-in-one export: one zip bundling every other format.
//!
//! Entry order is fixed: `csv/<table>.csv` per table (alphabetical), then
//! the JSON document, then the SQLite copy, then the Excel workbook. The
//! workbook entry appears only when spreadsheet support is compiled in and
//! generation succeeds; a generation failure is logged and the rest of the
//! bundle is still produced.

use crate::error::Result;
use crate::export::archive::ArchiveBuilder;
use crate::export::{csv_zip, json, sqlite};
use crate::snapshot::Snapshot;
use rusqlite::Connection;
use std::io::{Seek, Write};
use std::path::Path;

pub fn write_bundle<W: Write + Seek>(
    conn: &Connection,
    db_path: &Path,
    snapshot: &Snapshot,
    out: W,
) -> Result<W> {
    let mut archive = ArchiveBuilder::new(out);

    for table in &snapshot.tables {
        let name = format!("csv/{}.csv", table.name);
        archive.add_entry_with(&name, |entry| csv_zip::write_table_csv(table, entry))?;
    }

    archive.add_entry_with(&format!("{}.json", snapshot.database), |entry| {
        json::write_json(snapshot, entry)
    })?;

    archive.add_entry_with(&format!("{}.sqlite", snapshot.database), |entry| {
        sqlite::copy_database(conn, db_path, entry)?;
        Ok(())
    })?;

    add_workbook(&mut archive, snapshot)?;

    archive.finish()
}

#[cfg(feature = "xlsx")]
fn add_workbook<W: Write + Seek>(
    archive: &mut ArchiveBuilder<W>,
    snapshot: &Snapshot,
) -> Result<()> {
    use crate::export::excel;

    match excel::write_workbook(snapshot) {
        Ok(bytes) => {
            archive.add_bytes(&format!("{}.xlsx", snapshot.database), &bytes)?;
        }
        Err(e) => {
            // Non-fatal: the rest of the bundle is still valid.
            tracing::warn!(error = %e, "Excel generation failed, omitting workbook from bundle");
        }
    }
    Ok(())
}

#[cfg(not(feature = "xlsx"))]
fn add_workbook<W: Write + Seek>(
    _archive: &mut ArchiveBuilder<W>,
    _snapshot: &Snapshot,
) -> Result<()> {
    tracing::debug!("Spreadsheet support not compiled in, bundle has no workbook");
    Ok(())
}

//! CSV-zip export: one `<table>.csv` entry per table.
//!
//! Field quoting/escaping follows RFC 4180 via the `csv` crate: fields
//! containing the delimiter, quote character or a newline are quoted, with
//! embedded quotes doubled.

use crate::error::{Error, Result};
use crate::export::archive::ArchiveBuilder;
use crate::snapshot::{Snapshot, Table};
use serde_json::Value;
use std::io::{Seek, Write};

/// Write the snapshot as a zip of CSVs. Entries follow the snapshot's
/// alphabetical table order.
pub fn write_csv_zip<W: Write + Seek>(snapshot: &Snapshot, out: W) -> Result<W> {
    let mut archive = ArchiveBuilder::new(out);
    for table in &snapshot.tables {
        let name = format!("{}.csv", table.name);
        archive.add_entry_with(&name, |entry| write_table_csv(table, entry))?;
    }
    archive.finish()
}

/// Write one table as CSV: header row of column names, then data rows in
/// original column order.
pub fn write_table_csv(table: &Table, out: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer.flush().map_err(Error::Io)?;
    Ok(())
}

/// Render a cell for CSV output. NULL becomes an empty field; text is
/// emitted raw (the csv writer handles quoting).
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&Value::from(42)), "42");
        assert_eq!(cell_text(&Value::from(2.5)), "2.5");
        assert_eq!(cell_text(&Value::String("a,b".into())), "a,b");
    }

    #[test]
    fn test_quoting_and_escaping() {
        let table = Table {
            name: "t".into(),
            columns: vec!["name".into(), "notes".into()],
            rows: vec![vec![
                Value::String("Acme, \"Inc\"".into()),
                Value::String("line1\nline2".into()),
            ]],
        };
        let mut buf = Vec::new();
        write_table_csv(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name,notes\n\"Acme, \"\"Inc\"\"\",\"line1\nline2\"\n");
    }
}

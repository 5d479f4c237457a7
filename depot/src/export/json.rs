//! JSON export: one document mapping table name to a list of row objects.

use crate::error::Result;
use crate::snapshot::Snapshot;
use serde_json::Value;
use std::io::Write;

/// Build the export document: `{ table: [ {column: value, ...}, ... ] }`.
/// Values keep their native types (numbers as numbers, text as strings,
/// NULL as null).
pub fn document(snapshot: &Snapshot) -> Value {
    let mut doc = serde_json::Map::new();
    for table in &snapshot.tables {
        let rows: Vec<Value> = table
            .row_objects()
            .into_iter()
            .map(Value::Object)
            .collect();
        doc.insert(table.name.clone(), Value::Array(rows));
    }
    Value::Object(doc)
}

/// Serialize the export document to a writer.
pub fn write_json(snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &document(snapshot))?;
    out.write_all(b"\n")?;
    Ok(())
}

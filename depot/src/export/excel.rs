//! Excel export: one workbook, one worksheet per table.

use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde_json::Value;

/// Build the workbook in memory: header row of column names, then data
/// rows, one worksheet per table in snapshot order.
pub fn write_workbook(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for table in &snapshot.tables {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sanitize_sheet_name(&table.name))
            .map_err(xlsx_error)?;

        for (col, column) in table.columns.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, column.as_str())
                .map_err(xlsx_error)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                write_cell(worksheet, row_num, col as u16, value)?;
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: &Value,
) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b).map_err(xlsx_error)?;
        }
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                worksheet.write_number(row, col, f).map_err(xlsx_error)?;
            }
        }
        Value::String(s) => {
            worksheet
                .write_string(row, col, s.as_str())
                .map_err(xlsx_error)?;
        }
        other => {
            worksheet
                .write_string(row, col, other.to_string())
                .map_err(xlsx_error)?;
        }
    }
    Ok(())
}

/// Worksheet names are capped at 31 characters and reject a handful of
/// characters; replace the invalid ones and truncate.
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    cleaned.chars().take(31).collect()
}

fn xlsx_error(e: XlsxError) -> Error {
    Error::Export(format!("xlsx: {}", e))
}

//! Export types and metadata.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Export format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One workbook, one worksheet per table (requires spreadsheet support)
    Excel,
    /// Zip of one CSV per table
    CsvZip,
    /// Single JSON document mapping table name to rows
    Json,
    /// Binary copy of the SQLite database file
    Sqlite,
    /// Zip bundling the SQLite copy, JSON document, CSVs and (if possible) the workbook
    AllInOne,
}

impl ExportFormat {
    /// File extension of the produced artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::CsvZip => "zip",
            ExportFormat::Json => "json",
            ExportFormat::Sqlite => "sqlite",
            ExportFormat::AllInOne => "zip",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::CsvZip => write!(f, "csv-zip"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Sqlite => write!(f, "sqlite"),
            ExportFormat::AllInOne => write!(f, "all-in-one"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" | "csv-zip" | "csv_zip" => Ok(ExportFormat::CsvZip),
            "json" => Ok(ExportFormat::Json),
            "sqlite" | "db" => Ok(ExportFormat::Sqlite),
            "all" | "all-in-one" | "all_in_one" => Ok(ExportFormat::AllInOne),
            _ => Err(format!(
                "Invalid export format '{}'. Use 'excel', 'csv-zip', 'json', 'sqlite' or 'all-in-one'",
                s
            )),
        }
    }
}

/// Metadata describing a completed export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Tool version that created this export
    pub version: String,
    /// Database name
    pub database: String,
    /// Export timestamp (RFC 3339)
    pub exported_at: String,
    /// Number of tables in the snapshot
    pub table_count: usize,
    /// Total number of rows across all tables
    pub row_count: u64,
    /// SHA-256 checksum of the artifact
    pub checksum: Option<String>,
}

/// Result of an export request.
///
/// `delivered` differs from `requested` only when Excel was requested
/// without spreadsheet support compiled in; the dispatcher then substitutes
/// CSV-zip and sets `substituted`, so callers can report the downgrade
/// instead of failing (or being silent about it).
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub requested: ExportFormat,
    pub delivered: ExportFormat,
    pub substituted: bool,
    pub artifact: PathBuf,
    pub metadata: ExportMetadata,
}

//! Database export in interchangeable formats.
//!
//! Formats:
//! - **csv-zip**: zip with one RFC 4180 CSV per table
//! - **json**: single document, table name → list of row objects
//! - **sqlite**: binary copy of the database file
//! - **excel**: one workbook, one worksheet per table (feature `xlsx`)
//! - **all-in-one**: zip bundling all of the above

pub mod archive;
pub mod bundle;
pub mod capability;
pub mod csv_zip;
#[cfg(feature = "xlsx")]
pub mod excel;
pub mod json;
pub mod sqlite;
pub mod types;

pub use capability::spreadsheet_available;
pub use types::{ExportFormat, ExportMetadata, ExportOutcome};

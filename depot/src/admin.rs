//! Administrative surface: the two operations exposed to callers.
//!
//! Both operations run synchronously and hold the store's connection guard
//! from start to finish, so an export snapshot is never taken mid-reset and
//! a reset never starts mid-export.

use crate::error::{Error, Result};
use crate::export::{self, bundle, csv_zip, json, sqlite, ExportFormat, ExportMetadata, ExportOutcome};
use crate::reset::{self, ResetReport, ResetRequest};
use crate::snapshot::{self, Snapshot};
use crate::store::Store;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub struct AdminService {
    store: Store,
    upload_dir: PathBuf,
}

impl AdminService {
    pub fn new(store: Store, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Export the whole database in the requested format.
    ///
    /// The artifact is written to `<out_dir>/<database-name>_export.<ext>`
    /// via a temp file that is cleaned up on every failure path. When Excel
    /// is requested without spreadsheet support, CSV-zip is delivered
    /// instead and the substitution is flagged in the outcome.
    pub fn request_export(&self, format: ExportFormat, out_dir: &Path) -> Result<ExportOutcome> {
        let conn = self.store.connection();

        let (delivered, substituted) = match format {
            ExportFormat::Excel if !export::spreadsheet_available() => {
                tracing::warn!("Spreadsheet support unavailable, substituting csv-zip for excel");
                (ExportFormat::CsvZip, true)
            }
            f => (f, false),
        };

        let database = self.store.database_name();
        tracing::info!(format = %delivered, database = %database, "Starting export");

        let snapshot = snapshot::read_snapshot(&conn, &database)?;

        std::fs::create_dir_all(out_dir)?;
        let mut temp = tempfile::NamedTempFile::new_in(out_dir)?;

        match delivered {
            ExportFormat::CsvZip => {
                csv_zip::write_csv_zip(&snapshot, temp.as_file_mut())?;
            }
            ExportFormat::Json => {
                json::write_json(&snapshot, temp.as_file_mut())?;
            }
            ExportFormat::Sqlite => {
                let db_path = self.store.path().ok_or_else(sqlite::unsupported)?;
                sqlite::copy_database(&conn, db_path, temp.as_file_mut())?;
            }
            ExportFormat::AllInOne => {
                let db_path = self.store.path().ok_or_else(sqlite::unsupported)?;
                bundle::write_bundle(&conn, db_path, &snapshot, temp.as_file_mut())?;
            }
            ExportFormat::Excel => {
                #[cfg(feature = "xlsx")]
                {
                    let bytes = crate::export::excel::write_workbook(&snapshot)?;
                    temp.as_file_mut().write_all(&bytes)?;
                }
                #[cfg(not(feature = "xlsx"))]
                {
                    unreachable!("excel dispatch is gated on the capability probe");
                }
            }
        }
        temp.as_file_mut().flush()?;

        let checksum = file_checksum(&mut temp.reopen()?)?;
        let artifact = out_dir.join(format!("{}_export.{}", database, delivered.extension()));
        temp.persist(&artifact).map_err(|e| Error::Io(e.error))?;

        let metadata = export_metadata(&snapshot, checksum);
        tracing::info!(
            artifact = %artifact.display(),
            tables = metadata.table_count,
            rows = metadata.row_count,
            "Export complete"
        );

        Ok(ExportOutcome {
            requested: format,
            delivered,
            substituted,
            artifact,
            metadata,
        })
    }

    /// Wipe all business data (every table except `users`) and clear the
    /// upload directory. Requires explicit confirmation; irreversible once
    /// the transaction commits.
    pub fn request_reset(&self, request: ResetRequest) -> Result<ResetReport> {
        let mut conn = self.store.connection();
        reset::execute(&mut conn, &self.upload_dir, request)
    }
}

fn export_metadata(snapshot: &Snapshot, checksum: String) -> ExportMetadata {
    ExportMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: snapshot.database.clone(),
        exported_at: snapshot.captured_at.clone(),
        table_count: snapshot.tables.len(),
        row_count: snapshot.row_count(),
        checksum: Some(checksum),
    }
}

fn file_checksum(file: &mut impl Read) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

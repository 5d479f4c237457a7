//! Export command implementation.

use anyhow::{anyhow, Context, Result};
use depot::{AdminService, ExportFormat, Store};
use std::path::Path;
use std::str::FromStr;

/// Run the export command.
pub fn run_export(db: &Path, format: &str, output: &Path) -> Result<()> {
    let format = ExportFormat::from_str(format).map_err(|e| anyhow!(e))?;

    let store = Store::open(db, false).with_context(|| format!("Cannot open {}", db.display()))?;
    // Upload dir is untouched by exports; any path works here.
    let admin = AdminService::new(store, "uploads");

    println!("Exporting database in {} format", format);
    let outcome = admin
        .request_export(format, output)
        .context("Export failed")?;

    if outcome.substituted {
        println!(
            "Note: spreadsheet support is not available; delivered {} instead of {}",
            outcome.delivered, outcome.requested
        );
    }

    println!("Export complete: {}", outcome.artifact.display());
    println!(
        "{} tables, {} rows",
        outcome.metadata.table_count, outcome.metadata.row_count
    );
    if let Some(checksum) = &outcome.metadata.checksum {
        println!("Checksum: {}", checksum);
    }

    Ok(())
}

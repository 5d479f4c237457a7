//! Reset command implementation.

use anyhow::{Context, Result};
use depot::{AdminService, ResetRequest, Store};
use std::path::Path;

/// Run the reset command. Without `--yes` nothing is changed.
pub fn run_reset(db: &Path, uploads: &Path, yes: bool) -> Result<()> {
    if !yes {
        println!("Reset is irreversible: it empties every table except 'users'");
        println!("and deletes every file under {}.", uploads.display());
        println!("Re-run with --yes to confirm.");
        return Ok(());
    }

    let store = Store::open(db, false).with_context(|| format!("Cannot open {}", db.display()))?;
    let admin = AdminService::new(store, uploads);

    tracing::info!(db = %db.display(), uploads = %uploads.display(), "Reset confirmed");

    let report = admin
        .request_reset(ResetRequest::confirmed())
        .context("Reset failed")?;

    println!(
        "Reset complete: {} rows deleted from {} tables, {} upload entries removed",
        report.rows_deleted,
        report.tables_cleared.len(),
        report.uploads_removed
    );
    for failure in &report.upload_failures {
        println!(
            "Warning: could not remove {}: {}",
            failure.path.display(),
            failure.reason
        );
    }

    Ok(())
}

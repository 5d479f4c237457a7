//! Init command implementation.

use anyhow::{Context, Result};
use depot::Store;
use std::path::Path;

/// Run the init command: open (or create) the database, optionally seeding
/// the default lookup rows and the demo data set.
pub fn run_init(db: &Path, seed_defaults: bool, demo: bool) -> Result<()> {
    let store =
        Store::open(db, seed_defaults).with_context(|| format!("Cannot open {}", db.display()))?;

    if demo {
        store.insert_demo_rows().context("Cannot insert demo rows")?;
    }

    println!("Database ready: {}", db.display());
    Ok(())
}

//! Administrative export and reset subsystem for warehouse inventory
//! databases.
//!
//! Two operations are exposed through [`AdminService`]: bulk export of the
//! whole database into interchangeable formats (CSV-zip, JSON, SQLite copy,
//! Excel, all-in-one bundle), and a confirmation-gated destructive reset
//! that wipes all business data while preserving user accounts.

pub mod admin;
pub mod config;
pub mod error;
pub mod export;
pub mod reset;
pub mod snapshot;
pub mod store;

pub use admin::AdminService;
pub use config::Config;
pub use error::{Error, Result};
pub use export::{ExportFormat, ExportOutcome};
pub use reset::{ResetReport, ResetRequest};
pub use store::Store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use depot::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "depot")]
#[command(about = "Depot CLI - warehouse database administration")]
#[command(version)]
struct Cli {
    /// Optional TOML configuration file; command-line flags take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize (or open) the warehouse database
    Init {
        /// Path to the SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Insert default lookup rows if the database is empty
        #[arg(long)]
        seed_defaults: bool,

        /// Insert a small set of example rows after bootstrap
        #[arg(long)]
        demo: bool,
    },

    /// Export the whole database in one format
    Export {
        /// Path to the SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Export format: excel, csv-zip, json, sqlite or all-in-one
        #[arg(short, long, default_value = "all-in-one")]
        format: String,

        /// Output directory for the artifact
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Wipe all business data, preserving user accounts
    Reset {
        /// Path to the SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Upload directory to clear
        #[arg(long)]
        uploads: Option<PathBuf>,

        /// Confirm the reset (without this flag nothing is changed)
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Init {
            db,
            seed_defaults,
            demo,
        } => {
            let db = db.unwrap_or(config.database_path);
            commands::init::run_init(&db, seed_defaults || config.seed_defaults, demo)
        }
        Commands::Export { db, format, output } => {
            let db = db.unwrap_or(config.database_path);
            commands::export::run_export(&db, &format, &output)
        }
        Commands::Reset { db, uploads, yes } => {
            let db = db.unwrap_or(config.database_path);
            let uploads = uploads.unwrap_or(config.upload_dir);
            commands::reset::run_reset(&db, &uploads, yes)
        }
    }
}

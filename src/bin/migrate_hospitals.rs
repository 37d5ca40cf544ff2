#![forbid(unsafe_code)]

//! Copy legacy hospital profiles into the normalized tables.
//!
//! Takes no arguments: the database comes from DATABASE_URL or the settings
//! file. Safe to run again after a failure; existing rows are skipped.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{error, info};

use medtour_home::{Settings, logging, migration};

fn run() -> Result<()> {
    let settings = Settings::load()?;
    let path = &settings.database_path;
    info!(database = %path.display(), "Opening database");

    let conn = Connection::open(path).with_context(|| format!("Failed to open database {}", path.display()))?;

    println!("Migrating hospital profiles in {}", path.display());
    let report = migration::run(&conn)?;

    for outcome in &report.outcomes {
        println!("  {outcome}");
    }
    println!();
    println!("{report}");
    Ok(())
}

fn main() -> Result<()> {
    logging::init()?;

    run().inspect_err(|e| error!(error = ?e, "Migration aborted"))
}

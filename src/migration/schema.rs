use anyhow::{Context, Result};
use rusqlite::Connection;

/// Normalized tables written by the migration. Existing tables are left as they are.
pub fn ensure_target_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS hospital_details (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          slug TEXT NOT NULL UNIQUE,
          description TEXT,
          address TEXT,
          city TEXT,
          state TEXT,
          country TEXT,
          phone TEXT,
          email TEXT,
          website TEXT,
          accreditations TEXT NOT NULL DEFAULT '[]',
          specialties TEXT NOT NULL DEFAULT '[]',
          legacy_profile_id INTEGER,
          created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS users (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          email TEXT NOT NULL UNIQUE,
          name TEXT,
          user_type TEXT NOT NULL,
          hospital_id INTEGER REFERENCES hospital_details(id),
          password_hash TEXT,
          created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS doctors (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          hospital_id INTEGER NOT NULL REFERENCES hospital_details(id),
          name TEXT NOT NULL,
          specialization TEXT,
          qualification TEXT,
          experience_years INTEGER,
          image TEXT,
          created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS treatments (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          hospital_id INTEGER NOT NULL REFERENCES hospital_details(id),
          name TEXT NOT NULL,
          description TEXT,
          category TEXT,
          price_min REAL,
          price_max REAL,
          duration TEXT,
          created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS packages (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          hospital_id INTEGER NOT NULL REFERENCES hospital_details(id),
          name TEXT NOT NULL,
          description TEXT,
          price REAL,
          duration TEXT,
          inclusions TEXT NOT NULL DEFAULT '[]',
          created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_doctors_hospital_name ON doctors(hospital_id, name);
        CREATE INDEX IF NOT EXISTS idx_treatments_hospital_name ON treatments(hospital_id, name);
        CREATE INDEX IF NOT EXISTS idx_packages_hospital_name ON packages(hospital_id, name);
        ",
    )
    .context("failed to create target tables")
}

/// Fail early with a readable message when the legacy table is missing
pub fn require_legacy_table(conn: &Connection) -> Result<()> {
    let found: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'hospital_profiles'",
            [],
            |row| row.get(0),
        )
        .context("failed to inspect database schema")?;

    if found == 0 {
        anyhow::bail!("table 'hospital_profiles' not found; nothing to migrate from");
    }
    Ok(())
}

/// Older dumps keep the hospital name only inside the JSON blob
pub fn legacy_has_name_column(conn: &Connection) -> Result<bool> {
    let found: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('hospital_profiles') WHERE name = 'name'",
            [],
            |row| row.get(0),
        )
        .context("failed to inspect hospital_profiles columns")?;
    Ok(found > 0)
}

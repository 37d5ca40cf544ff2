//! hospital_profiles -> hospital_details / users / doctors / treatments / packages
//!
//! Every insert is preceded by a lookup on its natural key, so a run that
//! died half way can simply be started again. There is deliberately no
//! wrapping transaction: rows written before a failure stay written.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::fmt;
use tracing::{debug, info, warn};

use super::legacy::{LegacyDoctor, LegacyPackage, LegacyProfile, LegacyTreatment};
use super::schema;
use super::slug::slugify;
use crate::constants::migration::{HOSPITAL_USER_TYPE, SYNTHETIC_EMAIL_DOMAIN};

/// Row of the legacy table
#[derive(Debug, Clone)]
pub struct LegacyRow {
    pub id: i64,
    /// `name` column, when the table has one
    pub name: Option<String>,
    pub profile_data: String,
}

/// What happened to one legacy row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Migrated {
        legacy_id: i64,
        slug: String,
        hospital_created: bool,
        doctors: usize,
        treatments: usize,
        packages: usize,
    },
    Skipped {
        legacy_id: i64,
        reason: String,
    },
}

impl fmt::Display for ProfileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileOutcome::Migrated { legacy_id, slug, hospital_created, doctors, treatments, packages } => write!(
                f,
                "[{legacy_id}] {slug}: hospital {}, +{doctors} doctors, +{treatments} treatments, +{packages} packages",
                if *hospital_created { "created" } else { "exists" },
            ),
            ProfileOutcome::Skipped { legacy_id, reason } => write!(f, "[{legacy_id}] skipped: {reason}"),
        }
    }
}

/// Counts of rows created by one run. Rows that already existed are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub profiles_seen: usize,
    pub profiles_skipped: usize,
    pub users_created: usize,
    /// Existing accounts with a matching email that are not hospital users
    pub users_not_linked: usize,
    pub hospitals_created: usize,
    pub doctors_created: usize,
    pub treatments_created: usize,
    pub packages_created: usize,
    pub outcomes: Vec<ProfileOutcome>,
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profiles processed: {}", self.profiles_seen)?;
        writeln!(f, "Profiles skipped:   {}", self.profiles_skipped)?;
        writeln!(f, "Users created:      {}", self.users_created)?;
        writeln!(f, "Users not linked:   {}", self.users_not_linked)?;
        writeln!(f, "Hospitals created:  {}", self.hospitals_created)?;
        writeln!(f, "Doctors created:    {}", self.doctors_created)?;
        writeln!(f, "Treatments created: {}", self.treatments_created)?;
        write!(f, "Packages created:   {}", self.packages_created)
    }
}

/// Child tables keyed by (hospital_id, name)
#[derive(Debug, Clone, Copy)]
enum ChildTable {
    Doctors,
    Treatments,
    Packages,
}

impl ChildTable {
    fn name(&self) -> &'static str {
        match self {
            ChildTable::Doctors => "doctors",
            ChildTable::Treatments => "treatments",
            ChildTable::Packages => "packages",
        }
    }
}

/// Run the whole migration against `conn`
pub fn run(conn: &Connection) -> Result<MigrationReport> {
    schema::require_legacy_table(conn)?;
    schema::ensure_target_schema(conn)?;

    let rows = load_legacy_rows(conn)?;
    info!(rows = rows.len(), "Loaded legacy hospital profiles");

    let mut report = MigrationReport::default();
    for row in &rows {
        report.profiles_seen += 1;

        let outcome = match serde_json::from_str::<LegacyProfile>(&row.profile_data) {
            Ok(mut profile) => {
                if profile.name.trim().is_empty() {
                    if let Some(name) = &row.name {
                        profile.name = name.clone();
                    }
                }
                migrate_profile(conn, row.id, &profile, &mut report)
                    .with_context(|| format!("failed to migrate legacy profile {}", row.id))?
            }
            Err(e) => {
                warn!(legacy_id = row.id, error = %e, "Unreadable legacy profile");
                ProfileOutcome::Skipped {
                    legacy_id: row.id,
                    reason: format!("invalid profile_data: {e}"),
                }
            }
        };

        if matches!(outcome, ProfileOutcome::Skipped { .. }) {
            report.profiles_skipped += 1;
        }
        report.outcomes.push(outcome);
    }

    info!(
        hospitals = report.hospitals_created,
        doctors = report.doctors_created,
        treatments = report.treatments_created,
        packages = report.packages_created,
        "Migration finished"
    );
    Ok(report)
}

fn load_legacy_rows(conn: &Connection) -> Result<Vec<LegacyRow>> {
    let sql = if schema::legacy_has_name_column(conn)? {
        "SELECT id, name, profile_data FROM hospital_profiles ORDER BY id"
    } else {
        "SELECT id, NULL, profile_data FROM hospital_profiles ORDER BY id"
    };
    let mut stmt = conn.prepare(sql).context("failed to query hospital_profiles")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(LegacyRow {
                id: row.get(0)?,
                name: row.get(1)?,
                profile_data: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to read hospital_profiles")?;

    Ok(rows)
}

fn migrate_profile(
    conn: &Connection,
    legacy_id: i64,
    profile: &LegacyProfile,
    report: &mut MigrationReport,
) -> Result<ProfileOutcome> {
    let slug = slugify(&profile.name);
    if slug.is_empty() {
        warn!(legacy_id, name = %profile.name, "Hospital name yields an empty slug");
        return Ok(ProfileOutcome::Skipped {
            legacy_id,
            reason: format!("hospital name '{}' has no usable characters", profile.name),
        });
    }

    let email = profile
        .contact_email()
        .unwrap_or_else(|| format!("{slug}@{SYNTHETIC_EMAIL_DOMAIN}"));

    let user = match find_user(conn, &email)? {
        Some((id, user_type)) if user_type == HOSPITAL_USER_TYPE => Some(id),
        Some((id, user_type)) => {
            warn!(
                legacy_id,
                user_id = id,
                email = %email,
                user_type = %user_type,
                "Email belongs to a non-hospital account, not linking"
            );
            report.users_not_linked += 1;
            None
        }
        None => {
            report.users_created += 1;
            Some(insert_user(conn, &email, &profile.name)?)
        }
    };

    let (hospital_id, hospital_created) = match find_hospital(conn, &slug)? {
        Some(id) => (id, false),
        None => {
            report.hospitals_created += 1;
            (insert_hospital(conn, legacy_id, &slug, &email, profile)?, true)
        }
    };

    if let Some(user_id) = user {
        conn.execute(
            "UPDATE users SET hospital_id = ?1 WHERE id = ?2 AND hospital_id IS NOT ?1",
            params![hospital_id, user_id],
        )
        .context("failed to link user to hospital")?;
    }

    let mut doctors = 0;
    for doctor in &profile.doctors {
        if ensure_child(conn, ChildTable::Doctors, hospital_id, &doctor.name, |conn| {
            insert_doctor(conn, hospital_id, doctor)
        })? {
            doctors += 1;
        }
    }

    let mut treatments = 0;
    for treatment in &profile.treatments {
        if ensure_child(conn, ChildTable::Treatments, hospital_id, &treatment.name, |conn| {
            insert_treatment(conn, hospital_id, treatment)
        })? {
            treatments += 1;
        }
    }

    let mut packages = 0;
    for package in &profile.packages {
        if ensure_child(conn, ChildTable::Packages, hospital_id, &package.name, |conn| {
            insert_package(conn, hospital_id, package)
        })? {
            packages += 1;
        }
    }

    report.doctors_created += doctors;
    report.treatments_created += treatments;
    report.packages_created += packages;

    debug!(legacy_id, slug = %slug, hospital_id, user_id = ?user, "Profile migrated");
    Ok(ProfileOutcome::Migrated {
        legacy_id,
        slug,
        hospital_created,
        doctors,
        treatments,
        packages,
    })
}

fn find_user(conn: &Connection, email: &str) -> Result<Option<(i64, String)>> {
    conn.query_row("SELECT id, user_type FROM users WHERE email = ?1", params![email], |row| {
        Ok((row.get(0)?, row.get(1)?))
    })
        .optional()
        .context("failed to look up user")
}

fn insert_user(conn: &Connection, email: &str, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (email, name, user_type) VALUES (?1, ?2, ?3)",
        params![email, name, HOSPITAL_USER_TYPE],
    )
    .with_context(|| format!("failed to insert user {email}"))?;
    Ok(conn.last_insert_rowid())
}

fn find_hospital(conn: &Connection, slug: &str) -> Result<Option<i64>> {
    conn.query_row("SELECT id FROM hospital_details WHERE slug = ?1", params![slug], |row| row.get(0))
        .optional()
        .context("failed to look up hospital")
}

fn insert_hospital(conn: &Connection, legacy_id: i64, slug: &str, email: &str, profile: &LegacyProfile) -> Result<i64> {
    let location = profile.location.clone().unwrap_or_default();
    let contact = profile.contact.clone().unwrap_or_default();

    conn.execute(
        "INSERT INTO hospital_details (name, slug, description, address, city, state, country,
         phone, email, website, accreditations, specialties, legacy_profile_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            profile.name.trim(),
            slug,
            profile.description,
            location.address,
            location.city,
            location.state,
            location.country,
            contact.phone,
            email,
            contact.website,
            serde_json::to_string(&profile.accreditations)?,
            serde_json::to_string(&profile.specialties)?,
            legacy_id,
        ],
    )
    .with_context(|| format!("failed to insert hospital {slug}"))?;
    Ok(conn.last_insert_rowid())
}

/// Insert a child row unless one with the same (hospital_id, name) exists.
/// Returns whether a row was created.
fn ensure_child(
    conn: &Connection,
    table: ChildTable,
    hospital_id: i64,
    name: &str,
    insert: impl FnOnce(&Connection) -> Result<()>,
) -> Result<bool> {
    let name = name.trim();
    if name.is_empty() {
        warn!(table = table.name(), hospital_id, "Skipping unnamed entry");
        return Ok(false);
    }

    let sql = format!("SELECT 1 FROM {} WHERE hospital_id = ?1 AND name = ?2 LIMIT 1", table.name());
    let exists = conn
        .query_row(&sql, params![hospital_id, name], |_| Ok(()))
        .optional()
        .with_context(|| format!("failed to look up {} entry", table.name()))?
        .is_some();

    if exists {
        return Ok(false);
    }
    insert(conn)?;
    Ok(true)
}

fn insert_doctor(conn: &Connection, hospital_id: i64, doctor: &LegacyDoctor) -> Result<()> {
    conn.execute(
        "INSERT INTO doctors (hospital_id, name, specialization, qualification, experience_years, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            hospital_id,
            doctor.name.trim(),
            doctor.specialization,
            doctor.qualification,
            doctor.experience_years.map(|y| y.round() as i64),
            doctor.image,
        ],
    )
    .with_context(|| format!("failed to insert doctor {}", doctor.name))?;
    Ok(())
}

fn insert_treatment(conn: &Connection, hospital_id: i64, treatment: &LegacyTreatment) -> Result<()> {
    conn.execute(
        "INSERT INTO treatments (hospital_id, name, description, category, price_min, price_max, duration)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            hospital_id,
            treatment.name.trim(),
            treatment.description,
            treatment.category,
            treatment.price_min,
            treatment.price_max,
            treatment.duration,
        ],
    )
    .with_context(|| format!("failed to insert treatment {}", treatment.name))?;
    Ok(())
}

fn insert_package(conn: &Connection, hospital_id: i64, package: &LegacyPackage) -> Result<()> {
    conn.execute(
        "INSERT INTO packages (hospital_id, name, description, price, duration, inclusions)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            hospital_id,
            package.name.trim(),
            package.description,
            package.price,
            package.duration,
            serde_json::to_string(&package.inclusions)?,
        ],
    )
    .with_context(|| format!("failed to insert package {}", package.name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_db(profiles: &[&str]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE hospital_profiles (id INTEGER PRIMARY KEY, name TEXT, profile_data TEXT)",
        )
        .unwrap();
        for data in profiles {
            conn.execute("INSERT INTO hospital_profiles (profile_data) VALUES (?1)", params![data])
                .unwrap();
        }
        conn
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    fn counts(conn: &Connection) -> [i64; 5] {
        [
            count(conn, "hospital_details"),
            count(conn, "users"),
            count(conn, "doctors"),
            count(conn, "treatments"),
            count(conn, "packages"),
        ]
    }

    const CITY: &str = r#"{ "name": "City Hospital", "contact": { "email": "x@y.com" }, "doctors": [ { "name": "Dr. A" } ] }"#;

    const RICH: &str = r#"{
        "name": "Sea View Multispeciality",
        "description": "Beachside hospital",
        "location": { "city": "Pondicherry", "country": "India" },
        "accreditations": ["NABH"],
        "doctors": [
            { "name": "Dr. Rao", "specialization": "Cardiology", "experience": "15 years" },
            { "name": "Dr. Iyer", "specialization": "Orthopedics" },
            { "name": "Dr. Rao", "specialization": "Cardiology" }
        ],
        "treatments": [ { "name": "Knee Replacement", "priceMin": "2,00,000", "priceMax": 350000 } ],
        "packages": [ { "name": "Heart Check", "price": 12000, "inclusions": ["ECG", "Echo"] } ]
    }"#;

    #[test]
    fn test_city_hospital_scenario() {
        let conn = legacy_db(&[CITY]);
        let report = run(&conn).unwrap();

        assert_eq!(report.hospitals_created, 1);
        assert_eq!(report.users_created, 1);
        assert_eq!(report.doctors_created, 1);

        let (hospital_id, slug): (i64, String) = conn
            .query_row("SELECT id, slug FROM hospital_details", [], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        assert_eq!(slug, "city-hospital");

        let (email, user_type, linked): (String, String, Option<i64>) = conn
            .query_row("SELECT email, user_type, hospital_id FROM users", [], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .unwrap();
        assert_eq!(email, "x@y.com");
        assert_eq!(user_type, "hospital");
        assert_eq!(linked, Some(hospital_id));

        let doctor: String = conn.query_row("SELECT name FROM doctors", [], |row| row.get(0)).unwrap();
        assert_eq!(doctor, "Dr. A");

        // Second run finds everything in place
        let again = run(&conn).unwrap();
        assert_eq!(counts(&conn), [1, 1, 1, 0, 0]);
        assert_eq!(again.hospitals_created, 0);
        assert_eq!(again.users_created, 0);
        assert_eq!(again.doctors_created, 0);
    }

    #[test]
    fn test_rerun_produces_same_counts() {
        let conn = legacy_db(&[CITY, RICH]);

        let first = run(&conn).unwrap();
        let after_first = counts(&conn);
        let second = run(&conn).unwrap();

        assert_eq!(counts(&conn), after_first);
        assert_eq!(after_first, [2, 2, 3, 1, 1]);
        assert_eq!(first.doctors_created, 3);
        assert_eq!(second.doctors_created + second.treatments_created + second.packages_created, 0);
    }

    #[test]
    fn test_duplicate_doctor_in_one_profile_inserted_once() {
        let conn = legacy_db(&[RICH]);
        let report = run(&conn).unwrap();

        assert_eq!(report.doctors_created, 2);
        match &report.outcomes[0] {
            ProfileOutcome::Migrated { doctors, treatments, packages, .. } => {
                assert_eq!((*doctors, *treatments, *packages), (2, 1, 1));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let price_min: f64 = conn
            .query_row("SELECT price_min FROM treatments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(price_min, 200000.0);
    }

    #[test]
    fn test_missing_email_gets_synthetic_address() {
        let conn = legacy_db(&[RICH]);
        run(&conn).unwrap();

        let email: String = conn.query_row("SELECT email FROM users", [], |row| row.get(0)).unwrap();
        assert_eq!(email, "sea-view-multispeciality@hospitals.medtour.local");
    }

    #[test]
    fn test_new_children_added_on_rerun() {
        let conn = legacy_db(&[CITY]);
        run(&conn).unwrap();

        conn.execute(
            "UPDATE hospital_profiles SET profile_data = ?1",
            params![r#"{ "name": "City Hospital", "contact": { "email": "x@y.com" },
                        "doctors": [ { "name": "Dr. A" }, { "name": "Dr. B" } ] }"#],
        )
        .unwrap();

        let report = run(&conn).unwrap();
        assert_eq!(report.doctors_created, 1);
        assert_eq!(count(&conn, "doctors"), 2);
        assert_eq!(count(&conn, "hospital_details"), 1);
    }

    #[test]
    fn test_unreadable_and_nameless_profiles_skipped() {
        let conn = legacy_db(&["not json", r#"{ "name": "!!!" }"#, CITY]);
        let report = run(&conn).unwrap();

        assert_eq!(report.profiles_seen, 3);
        assert_eq!(report.profiles_skipped, 2);
        assert_eq!(report.hospitals_created, 1);
        assert!(matches!(report.outcomes[0], ProfileOutcome::Skipped { legacy_id: 1, .. }));
    }

    #[test]
    fn test_missing_legacy_table_aborts() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(run(&conn).is_err());
    }

    #[test]
    fn test_report_display() {
        let conn = legacy_db(&[CITY]);
        let report = run(&conn).unwrap();
        let text = report.to_string();
        assert!(text.contains("Hospitals created:  1"));
        assert_eq!(
            report.outcomes[0].to_string(),
            "[1] city-hospital: hospital created, +1 doctors, +0 treatments, +0 packages"
        );
    }

    #[test]
    fn test_name_column_used_when_blob_has_none() {
        let conn = legacy_db(&[]);
        conn.execute(
            "INSERT INTO hospital_profiles (name, profile_data) VALUES (?1, ?2)",
            params!["City Hospital", r#"{ "contact": { "email": "x@y.com" }, "doctors": [ { "name": "Dr. A" } ] }"#],
        )
        .unwrap();

        let report = run(&conn).unwrap();
        assert_eq!(report.profiles_skipped, 0);
        assert_eq!(counts(&conn), [1, 1, 1, 0, 0]);

        let (name, slug): (String, String) = conn
            .query_row("SELECT name, slug FROM hospital_details", [], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        assert_eq!(name, "City Hospital");
        assert_eq!(slug, "city-hospital");
    }

    #[test]
    fn test_blob_name_wins_over_column() {
        let conn = legacy_db(&[]);
        conn.execute(
            "INSERT INTO hospital_profiles (name, profile_data) VALUES (?1, ?2)",
            params!["Old Name", CITY],
        )
        .unwrap();

        run(&conn).unwrap();
        let slug: String = conn.query_row("SELECT slug FROM hospital_details", [], |row| row.get(0)).unwrap();
        assert_eq!(slug, "city-hospital");
    }

    #[test]
    fn test_table_without_name_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE hospital_profiles (id INTEGER PRIMARY KEY, profile_data TEXT)")
            .unwrap();
        conn.execute("INSERT INTO hospital_profiles (profile_data) VALUES (?1)", params![CITY])
            .unwrap();

        let report = run(&conn).unwrap();
        assert_eq!(report.hospitals_created, 1);
    }

    #[test]
    fn test_non_hospital_account_not_linked() {
        let conn = legacy_db(&[CITY]);
        schema::ensure_target_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (email, name, user_type) VALUES ('x@y.com', 'Pat', 'patient')",
            [],
        )
        .unwrap();

        let report = run(&conn).unwrap();
        assert_eq!(report.users_created, 0);
        assert_eq!(report.users_not_linked, 1);
        assert_eq!(report.hospitals_created, 1);
        assert_eq!(report.doctors_created, 1);

        let (user_type, linked): (String, Option<i64>) = conn
            .query_row("SELECT user_type, hospital_id FROM users", [], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        assert_eq!(user_type, "patient");
        assert_eq!(linked, None);
    }
}

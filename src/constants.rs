//! Application-wide constants
//!
//! Storage keys, endpoint paths and other string literals shared between the
//! config store, the CLI and the migration binary.

/// Settings file location
pub mod config {
    /// Directory under the platform config/data dir
    pub const APP_DIR: &str = "medtour-home";

    /// Settings filename inside APP_DIR
    pub const FILENAME: &str = "settings.json";

    /// Subdirectory of the data dir holding saved drafts
    pub const DRAFTS_DIR: &str = "drafts";
}

/// Environment variable names
pub mod env {
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const API_BASE_URL: &str = "MEDTOUR_API_BASE_URL";
    pub const FETCH_TIMEOUT_SECS: &str = "MEDTOUR_FETCH_TIMEOUT_SECS";
    pub const DRAFT_DIR: &str = "MEDTOUR_DRAFT_DIR";
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

/// Backend endpoints consumed by the store
pub mod api {
    /// Published page config, followed by the mode name
    pub const PUBLIC_PAGES_PATH: &str = "/api/public/pages/";

    pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
}

/// Draft cache keys
pub mod cache {
    /// Prefix of the per-mode draft key (`homeConfig_medical`)
    pub const KEY_PREFIX: &str = "homeConfig_";
}

/// Fetch timeout bounds (seconds)
pub mod timeout {
    pub const DEFAULT_FETCH_SECS: u64 = 5;
    pub const MIN_FETCH_SECS: u64 = 1;
    pub const MAX_FETCH_SECS: u64 = 120;
}

/// Migration defaults
pub mod migration {
    pub const DEFAULT_DATABASE_PATH: &str = "medtour.db";

    /// Domain used when a legacy profile carries no contact email
    pub const SYNTHETIC_EMAIL_DOMAIN: &str = "hospitals.medtour.local";

    /// `users.user_type` value for hospital logins
    pub const HOSPITAL_USER_TYPE: &str = "hospital";
}

/// Version stamped on bundled default documents
pub const DEFAULT_CONFIG_VERSION: &str = "1.0.0";

//! One-shot migration of legacy hospital profiles into normalized tables
//!
//! - **legacy**: the denormalized `profile_data` documents
//! - **slug**: hospital slugs used as the hospital natural key
//! - **schema**: target table DDL
//! - **transform**: the existence-checked, re-runnable copy

pub mod legacy;
pub mod schema;
pub mod slug;
pub mod transform;

pub use legacy::LegacyProfile;
pub use slug::slugify;
pub use transform::{MigrationReport, ProfileOutcome, run};

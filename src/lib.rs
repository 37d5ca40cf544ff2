#![forbid(unsafe_code)]

//! Home page configuration store and hospital data migration for the
//! medical-tourism site.

pub mod constants;
pub mod home;
pub mod logging;
pub mod migration;
pub mod settings;
pub mod store;

pub use home::{EditOutcome, HomePageConfig, Mode, SectionConfig, SectionType};
pub use settings::Settings;
pub use store::ConfigStore;

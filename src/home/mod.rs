//! Home page content model
//!
//! - **section**: typed section variants and their content records
//! - **page**: HomePageConfig and its editing operations
//! - **path**: dot-path writes used by content edits
//! - **defaults**: bundled documents per mode

pub mod defaults;
pub mod page;
pub mod path;
pub mod section;

// Re-export commonly used types
pub use defaults::default_config;
pub use page::{EditOutcome, HomePageConfig, Mode};
pub use path::PathError;
pub use section::{SectionBody, SectionConfig, SectionType};

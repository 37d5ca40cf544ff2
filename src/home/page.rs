//! Home page configuration: an ordered list of sections for one mode
//!
//! Every mutator works on the config in place, stamps `lastModified` and
//! reports what happened through [`EditOutcome`]. An unknown section id is not
//! an error; the editor may still be holding an id from before a reorder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::path::PathError;
use super::section::SectionConfig;
use crate::constants;

/// Which of the two independent page variants a config belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Medical,
    Wellness,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Medical, Mode::Wellness];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Medical => "medical",
            Mode::Wellness => "wellness",
        }
    }

    /// Draft cache key, e.g. `homeConfig_medical`
    pub fn cache_key(&self) -> String {
        format!("{}{}", constants::cache::KEY_PREFIX, self.as_str())
    }

    /// Published config endpoint, e.g. `/api/public/pages/medical`
    pub fn api_path(&self) -> String {
        format!("{}{}", constants::api::PUBLIC_PAGES_PATH, self.as_str())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "medical" => Ok(Mode::Medical),
            "wellness" => Ok(Mode::Wellness),
            other => Err(anyhow::anyhow!("unknown mode '{other}' (expected medical or wellness)")),
        }
    }
}

/// Result of a section edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// No section with that id; config left as is
    UnknownSection,
    /// Path or fields rejected; config left as is
    PathNotApplicable(PathError),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePageConfig {
    pub mode: Mode,
    pub version: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

impl HomePageConfig {
    pub fn new(mode: Mode, sections: Vec<SectionConfig>) -> Self {
        Self {
            mode,
            version: constants::DEFAULT_CONFIG_VERSION.to_string(),
            last_modified: Utc::now(),
            sections,
        }
    }

    pub fn section(&self, id: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Enabled sections in render order
    pub fn enabled_sections(&self) -> Vec<&SectionConfig> {
        let mut enabled: Vec<&SectionConfig> = self.sections.iter().filter(|s| s.enabled).collect();
        enabled.sort_by_key(|s| s.order);
        enabled
    }

    /// Check section ids are unique
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                anyhow::bail!("duplicate section id '{}' in {} config", section.id, self.mode);
            }
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Merge top-level fields (`enabled`, `order`, `content`, ...) into a section
    pub fn update_section(&mut self, id: &str, fields: &Map<String, Value>) -> EditOutcome {
        let Some(index) = self.position(id) else {
            warn!(mode = %self.mode, section = %id, "update for unknown section ignored");
            return EditOutcome::UnknownSection;
        };

        match self.sections[index].merged(fields) {
            Ok(updated) => {
                self.sections[index] = updated;
                self.touch();
                debug!(mode = %self.mode, section = %id, "section updated");
                EditOutcome::Applied
            }
            Err(reason) => {
                warn!(mode = %self.mode, section = %id, %reason, "section update rejected");
                EditOutcome::PathNotApplicable(reason)
            }
        }
    }

    /// Set one value addressed by a dot path, e.g. `content.title.line1`
    pub fn update_section_content(&mut self, id: &str, dot_path: &str, value: Value) -> EditOutcome {
        let Some(index) = self.position(id) else {
            warn!(mode = %self.mode, section = %id, path = %dot_path, "content update for unknown section ignored");
            return EditOutcome::UnknownSection;
        };

        match self.sections[index].patched(dot_path, value) {
            Ok(updated) => {
                self.sections[index] = updated;
                self.touch();
                debug!(mode = %self.mode, section = %id, path = %dot_path, "section content updated");
                EditOutcome::Applied
            }
            Err(reason) => {
                warn!(mode = %self.mode, section = %id, path = %dot_path, %reason, "content update rejected");
                EditOutcome::PathNotApplicable(reason)
            }
        }
    }

    /// Move the section at `from` to `to` (sequence positions, not `order`
    /// values) and renumber every `order` as 1..=N. Out-of-range indices are
    /// clamped to the last position.
    pub fn reorder_sections(&mut self, from: usize, to: usize) {
        if !self.sections.is_empty() {
            let last = self.sections.len() - 1;
            let (from_clamped, to_clamped) = (from.min(last), to.min(last));
            if (from_clamped, to_clamped) != (from, to) {
                warn!(mode = %self.mode, from, to, len = self.sections.len(), "reorder index out of range, clamping");
            }

            let moved = self.sections.remove(from_clamped);
            self.sections.insert(to_clamped, moved);
        }

        self.renumber();
        self.touch();
    }

    /// Dense 1-based `order` matching the sequence
    pub fn renumber(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.order = index as u32 + 1;
        }
    }

    /// Flip `enabled`; position is kept
    pub fn toggle_section(&mut self, id: &str) -> EditOutcome {
        let Some(section) = self.sections.iter_mut().find(|s| s.id == id) else {
            warn!(mode = %self.mode, section = %id, "toggle for unknown section ignored");
            return EditOutcome::UnknownSection;
        };

        section.enabled = !section.enabled;
        debug!(mode = %self.mode, section = %id, enabled = section.enabled, "section toggled");
        self.touch();
        EditOutcome::Applied
    }
}

//! Home page config store
//!
//! Holds the medical and wellness configs side by side. A store only exists
//! once hydration has finished: [`ConfigStore::load`] fetches the published
//! configs, overlays any saved drafts and only then hands the store out, so
//! nobody can read defaults that are about to be replaced.
//!
//! Edits stay in memory and mark the store dirty until [`ConfigStore::save_config`]
//! writes both drafts to the cache. Nothing here writes to the backend.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::home::{EditOutcome, HomePageConfig, Mode, default_config};

pub mod cache;
pub mod source;

pub use cache::{DraftCache, FileDraftCache, MemoryDraftCache};
pub use source::{HttpPublishedSource, PublishedSource};

pub struct ConfigStore<C: DraftCache> {
    cache: C,
    medical: HomePageConfig,
    wellness: HomePageConfig,
    mode: Mode,
    has_unsaved_changes: bool,
}

/// Fetch one published config; failures and timeouts are logged and read as
/// "nothing published"
async fn fetch_published<S: PublishedSource>(
    source: &S,
    mode: Mode,
    fetch_timeout: Duration,
) -> Option<HomePageConfig> {
    let fetched = match tokio::time::timeout(fetch_timeout, source.fetch(mode)).await {
        Ok(Ok(Some(config))) => config,
        Ok(Ok(None)) => {
            info!(mode = %mode, "No published config, using bundled default");
            return None;
        }
        Ok(Err(e)) => {
            warn!(mode = %mode, error = ?e, "Failed to fetch published config, using bundled default");
            return None;
        }
        Err(_) => {
            warn!(mode = %mode, timeout_ms = fetch_timeout.as_millis() as u64, "Published config fetch timed out, using bundled default");
            return None;
        }
    };

    match accept(fetched, mode) {
        Ok(config) => {
            info!(mode = %mode, sections = config.sections.len(), "Loaded published config");
            Some(config)
        }
        Err(e) => {
            warn!(mode = %mode, error = %e, "Ignoring invalid published config");
            None
        }
    }
}

/// Sanity checks shared by published configs and drafts
fn accept(config: HomePageConfig, mode: Mode) -> Result<HomePageConfig> {
    if config.mode != mode {
        anyhow::bail!("config is for mode '{}', expected '{}'", config.mode, mode);
    }
    config.validate()?;
    Ok(config)
}

impl<C: DraftCache> ConfigStore<C> {
    /// Hydrate a store: published config (or default) per mode, then drafts on top
    pub async fn load<S: PublishedSource>(source: &S, cache: C, fetch_timeout: Duration) -> Self {
        let (medical, wellness) = tokio::join!(
            fetch_published(source, Mode::Medical, fetch_timeout),
            fetch_published(source, Mode::Wellness, fetch_timeout),
        );

        let mut store = Self {
            cache,
            medical: medical.unwrap_or_else(|| default_config(Mode::Medical)),
            wellness: wellness.unwrap_or_else(|| default_config(Mode::Wellness)),
            mode: Mode::Medical,
            has_unsaved_changes: false,
        };

        // Drafts win over anything fetched
        for mode in Mode::ALL {
            if let Some(draft) = store.read_draft(mode) {
                info!(mode = %mode, "Restored local draft");
                *store.config_mut(mode) = draft;
            }
        }

        info!("Home page config hydrated");
        store
    }

    fn read_draft(&self, mode: Mode) -> Option<HomePageConfig> {
        let key = mode.cache_key();
        let contents = match self.cache.read(&key) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                error!(key = %key, error = ?e, "Failed to read draft");
                return None;
            }
        };

        let parsed = serde_json::from_str::<HomePageConfig>(&contents)
            .context("draft is not a valid home page config")
            .and_then(|config| accept(config, mode));

        match parsed {
            Ok(config) => Some(config),
            Err(e) => {
                error!(key = %key, error = %e, "Ignoring corrupt draft");
                None
            }
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "Switching mode");
            self.mode = mode;
        }
    }

    /// Config of the active mode
    pub fn current(&self) -> &HomePageConfig {
        self.config(self.mode)
    }

    pub fn config(&self, mode: Mode) -> &HomePageConfig {
        match mode {
            Mode::Medical => &self.medical,
            Mode::Wellness => &self.wellness,
        }
    }

    fn config_mut(&mut self, mode: Mode) -> &mut HomePageConfig {
        match mode {
            Mode::Medical => &mut self.medical,
            Mode::Wellness => &mut self.wellness,
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Apply an edit to the active config. The store is marked dirty whatever
    /// the outcome.
    fn edit<T>(&mut self, apply: impl FnOnce(&mut HomePageConfig) -> T) -> T {
        let mode = self.mode;
        let result = apply(self.config_mut(mode));
        self.has_unsaved_changes = true;
        result
    }

    pub fn update_section(&mut self, id: &str, fields: &Map<String, Value>) -> EditOutcome {
        self.edit(|config| config.update_section(id, fields))
    }

    pub fn update_section_content(&mut self, id: &str, dot_path: &str, value: Value) -> EditOutcome {
        self.edit(|config| config.update_section_content(id, dot_path, value))
    }

    pub fn reorder_sections(&mut self, from: usize, to: usize) {
        self.edit(|config| config.reorder_sections(from, to))
    }

    pub fn toggle_section(&mut self, id: &str) -> EditOutcome {
        self.edit(|config| config.toggle_section(id))
    }

    /// Write both configs to the draft cache and clear the dirty flag
    pub fn save_config(&mut self) -> Result<()> {
        for mode in Mode::ALL {
            let json = serde_json::to_string_pretty(self.config(mode))
                .with_context(|| format!("Failed to serialize {mode} config"))?;
            self.cache
                .write(&mode.cache_key(), &json)
                .with_context(|| format!("Failed to save {mode} draft"))?;
        }

        self.has_unsaved_changes = false;
        info!("Saved home page drafts");
        Ok(())
    }

    /// Back to bundled defaults; saved drafts are deleted
    pub fn reset_config(&mut self) -> Result<()> {
        for mode in Mode::ALL {
            *self.config_mut(mode) = default_config(mode);
        }
        for mode in Mode::ALL {
            self.cache
                .remove(&mode.cache_key())
                .with_context(|| format!("Failed to clear {mode} draft"))?;
        }

        self.has_unsaved_changes = false;
        info!("Reset home page config to defaults");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Clone)]
    enum Reply {
        Published(HomePageConfig),
        Missing,
        Fail,
        Hang,
    }

    struct FakeSource {
        replies: HashMap<Mode, Reply>,
    }

    impl FakeSource {
        fn new(medical: Reply, wellness: Reply) -> Self {
            Self {
                replies: HashMap::from([(Mode::Medical, medical), (Mode::Wellness, wellness)]),
            }
        }
    }

    impl PublishedSource for FakeSource {
        async fn fetch(&self, mode: Mode) -> Result<Option<HomePageConfig>> {
            match self.replies.get(&mode).cloned().unwrap_or(Reply::Missing) {
                Reply::Published(config) => Ok(Some(config)),
                Reply::Missing => Ok(None),
                Reply::Fail => Err(anyhow::anyhow!("connection refused")),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_millis(200);

    /// Default config with a recognisable hero badge
    fn published(mode: Mode, badge: &str) -> HomePageConfig {
        let mut config = default_config(mode);
        let outcome = config.update_section_content("hero", "content.badge", json!(badge));
        assert!(outcome.is_applied());
        config
    }

    fn badge(config: &HomePageConfig) -> Value {
        serde_json::to_value(config.section("hero").unwrap()).unwrap()["content"]["badge"].clone()
    }

    async fn empty_store() -> ConfigStore<MemoryDraftCache> {
        let source = FakeSource::new(Reply::Missing, Reply::Missing);
        ConfigStore::load(&source, MemoryDraftCache::new(), TIMEOUT).await
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_published() {
        let store = empty_store().await;
        assert_eq!(store.mode(), Mode::Medical);
        assert_eq!(store.current().sections, default_config(Mode::Medical).sections);
        assert_eq!(store.config(Mode::Wellness).sections, default_config(Mode::Wellness).sections);
        assert!(!store.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_published_replaces_default() {
        let source = FakeSource::new(Reply::Published(published(Mode::Medical, "server")), Reply::Missing);
        let store = ConfigStore::load(&source, MemoryDraftCache::new(), TIMEOUT).await;

        assert_eq!(badge(store.current()), "server");
        assert_eq!(store.config(Mode::Wellness).sections, default_config(Mode::Wellness).sections);
    }

    #[tokio::test]
    async fn test_one_failed_fetch_does_not_block_other() {
        let source = FakeSource::new(Reply::Fail, Reply::Published(published(Mode::Wellness, "calm")));
        let store = ConfigStore::load(&source, MemoryDraftCache::new(), TIMEOUT).await;

        assert_eq!(store.current().sections, default_config(Mode::Medical).sections);
        assert_eq!(badge(store.config(Mode::Wellness)), "calm");
    }

    #[tokio::test]
    async fn test_hanging_fetch_times_out() {
        let source = FakeSource::new(Reply::Hang, Reply::Published(published(Mode::Wellness, "calm")));
        let store = ConfigStore::load(&source, MemoryDraftCache::new(), TIMEOUT).await;

        assert_eq!(store.current().sections, default_config(Mode::Medical).sections);
        assert_eq!(badge(store.config(Mode::Wellness)), "calm");
    }

    #[tokio::test]
    async fn test_published_for_wrong_mode_ignored() {
        let source = FakeSource::new(Reply::Published(published(Mode::Wellness, "mixed up")), Reply::Missing);
        let store = ConfigStore::load(&source, MemoryDraftCache::new(), TIMEOUT).await;
        assert_eq!(store.current().sections, default_config(Mode::Medical).sections);
    }

    #[tokio::test]
    async fn test_draft_wins_over_published() {
        let server = published(Mode::Medical, "server");
        let draft = published(Mode::Medical, "draft");

        let cache = MemoryDraftCache::new();
        cache
            .write(&Mode::Medical.cache_key(), &serde_json::to_string(&draft).unwrap())
            .unwrap();

        let source = FakeSource::new(Reply::Published(server), Reply::Missing);
        let store = ConfigStore::load(&source, cache, TIMEOUT).await;

        assert_eq!(store.current(), &draft);
        assert!(!store.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_corrupt_draft_falls_through() {
        let cache = MemoryDraftCache::new();
        cache.write(&Mode::Medical.cache_key(), "{ not json").unwrap();

        let source = FakeSource::new(Reply::Published(published(Mode::Medical, "server")), Reply::Missing);
        let store = ConfigStore::load(&source, cache, TIMEOUT).await;
        assert_eq!(badge(store.current()), "server");
    }

    #[tokio::test]
    async fn test_switch_mode_keeps_contents() {
        let mut store = empty_store().await;
        store.toggle_section("hero");
        let medical = store.current().clone();

        store.switch_mode(Mode::Wellness);
        assert_eq!(store.mode(), Mode::Wellness);
        assert_eq!(store.current().mode, Mode::Wellness);
        assert!(store.current().section("hero").unwrap().enabled);

        store.switch_mode(Mode::Medical);
        assert_eq!(store.current(), &medical);
    }

    #[tokio::test]
    async fn test_edits_target_active_mode() {
        let mut store = empty_store().await;
        store.switch_mode(Mode::Wellness);
        store.reorder_sections(0, 1);

        assert_eq!(store.config(Mode::Wellness).sections[0].id, "treatments");
        assert_eq!(store.config(Mode::Medical).sections, default_config(Mode::Medical).sections);
    }

    #[tokio::test]
    async fn test_every_mutation_marks_dirty() {
        let mut store = empty_store().await;

        assert_eq!(store.toggle_section("missing"), EditOutcome::UnknownSection);
        assert!(store.has_unsaved_changes());
        store.save_config().unwrap();
        assert!(!store.has_unsaved_changes());

        store.update_section_content("hero", "content.subtitle", json!("Hello"));
        assert!(store.has_unsaved_changes());
        store.save_config().unwrap();

        let mut fields = Map::new();
        fields.insert("enabled".to_string(), json!(false));
        store.update_section("cta", &fields);
        assert!(store.has_unsaved_changes());
        store.save_config().unwrap();

        store.reorder_sections(1, 0);
        assert!(store.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_save_round_trips_both_modes() {
        let mut store = empty_store().await;
        store.update_section_content("hero", "content.title.line1", json!("Saved"));
        store.switch_mode(Mode::Wellness);
        store.toggle_section("cta");
        store.save_config().unwrap();

        let medical = store.config(Mode::Medical).clone();
        let wellness = store.config(Mode::Wellness).clone();

        let source = FakeSource::new(Reply::Missing, Reply::Missing);
        let reloaded = ConfigStore::load(&source, store.cache, TIMEOUT).await;
        assert_eq!(reloaded.config(Mode::Medical), &medical);
        assert_eq!(reloaded.config(Mode::Wellness), &wellness);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults_and_clears_drafts() {
        let mut store = empty_store().await;
        store.toggle_section("hero");
        store.save_config().unwrap();
        assert!(store.cache.contains("homeConfig_medical"));

        store.reorder_sections(0, 3);
        store.reset_config().unwrap();

        assert!(!store.has_unsaved_changes());
        assert!(!store.cache.contains("homeConfig_medical"));
        assert!(!store.cache.contains("homeConfig_wellness"));
        assert_eq!(store.current().sections, default_config(Mode::Medical).sections);
    }
}

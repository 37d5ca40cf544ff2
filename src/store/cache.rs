//! Local draft cache
//!
//! Key/value storage for unpublished drafts. The file-backed cache keeps one
//! JSON file per key; the in-memory cache is for tests and dry runs.

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait DraftCache {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, contents: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per draft inside a directory
pub struct FileDraftCache {
    dir: PathBuf,
}

impl FileDraftCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftCache for FileDraftCache {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read draft from {:?}", path)),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create draft directory {:?}", self.dir))?;

        let path = self.path(key);
        fs::write(&path, contents).with_context(|| format!("Failed to write draft to {:?}", path))?;
        info!(key = %key, path = %path.display(), "Saved draft");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove draft {:?}", path)),
        }
    }
}

#[derive(Default)]
pub struct MemoryDraftCache {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryDraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl DraftCache for MemoryDraftCache {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

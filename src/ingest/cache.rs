//! Parse cache: remembers which files have already been ingested.
//!
//! A flat JSON file mapping source paths to `true`. This is an idempotence
//! guard, not a correctness-critical cache: a stale or corrupted file only
//! causes redundant parsing. The map is written back once after a full
//! ingestion batch; there is no invalidation when a source file changes.

use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// On-disk cache of already-parsed source paths.
#[derive(Debug)]
pub struct ParseCache {
    path: PathBuf,
    entries: HashMap<String, bool>,
}

impl ParseCache {
    /// Load the cache from `path`.
    ///
    /// A missing file is the normal "no cache yet" case and yields an empty
    /// map. A file that exists but fails to parse is treated the same way,
    /// with a warning.
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, bool>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Ignoring malformed parse cache {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("Ignoring unreadable parse cache {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        debug!("Loaded parse cache with {} entries", entries.len());
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Whether `source_id` has already been parsed.
    pub fn is_done(&self, source_id: &str) -> bool {
        self.entries.get(source_id).copied().unwrap_or(false)
    }

    /// Mark `source_id` as parsed.
    pub fn mark_done(&mut self, source_id: &str) {
        self.entries.insert(source_id.to_string(), true);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the cache to its file, creating parent directories if needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        debug!("Saved parse cache with {} entries", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ParseCache::load(&dir.path().join("cache.json"));
        assert!(cache.is_empty());
        assert!(!cache.is_done("anything.txt"));
    }

    #[test]
    fn test_save_and_reload_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = ParseCache::load(&path);
        cache.mark_done("a.txt");
        cache.mark_done("sub/b.md");
        cache.save().unwrap();

        let reloaded = ParseCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.is_done("a.txt"));
        assert!(reloaded.is_done("sub/b.md"));
        assert!(!reloaded.is_done("c.txt"));
    }

    #[test]
    fn test_new_entries_union_pre_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, r#"{"old.txt": true}"#).unwrap();

        let mut cache = ParseCache::load(&path);
        assert!(cache.is_done("old.txt"));
        cache.mark_done("new.txt");
        cache.save().unwrap();

        let reloaded = ParseCache::load(&path);
        assert!(reloaded.is_done("old.txt"));
        assert!(reloaded.is_done("new.txt"));
    }

    #[test]
    fn test_malformed_cache_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = ParseCache::load(&path);
        assert!(cache.is_empty());
    }
}

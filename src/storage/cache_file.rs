//! Durable JSON cache file

use crate::error::Result;
use crate::metadata::{AppId, CachedItem};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Cache contents in insertion order
pub type CacheEntries = IndexMap<AppId, CachedItem>;

/// Reads and rewrites the whole cache file
///
/// Writes go to a `.tmp` sibling that is renamed over the real file, so an
/// interrupted save leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load the cache, starting fresh when the file is missing, empty or corrupt
    pub async fn load(&self) -> Result<CacheEntries> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No cache file yet, starting fresh");
                return Ok(CacheEntries::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(CacheEntries::new());
        }

        match serde_json::from_str::<CacheEntries>(&content) {
            Ok(entries) => {
                tracing::info!(
                    path = %self.path.display(),
                    entries = entries.len(),
                    "Loaded metadata cache"
                );
                Ok(entries)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cache file is corrupt, starting fresh"
                );
                Ok(CacheEntries::new())
            }
        }
    }

    /// Rewrite the cache file with the full mapping
    pub async fn save(&self, entries: &CacheEntries) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "Saved metadata cache"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: u64, name: &str) -> CachedItem {
        CachedItem {
            appid: AppId(id),
            name: Some(name.to_string()),
            collection: vec!["Favorites".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let temp = tempfile::tempdir().unwrap();
        let store = CacheStore::new(temp.path().join("cache.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cache.json");
        std::fs::write(&path, "{\"620\": {\"appid\": 620,").unwrap();

        let store = CacheStore::new(&path);
        assert!(store.load().await.unwrap().is_empty());

        std::fs::write(&path, "   \n").unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_keeps_order() {
        let temp = tempfile::tempdir().unwrap();
        let store = CacheStore::new(temp.path().join("nested/cache.json"));

        let mut entries = CacheEntries::new();
        entries.insert(AppId(730), game(730, "Counter-Strike 2"));
        entries.insert(AppId(99), CachedItem::unavailable(AppId(99)));
        entries.insert(AppId(10), game(10, "Counter-Strike"));
        store.save(&entries).await.unwrap();

        assert!(!store.temp_path().exists());

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["99"], serde_json::json!({"appid": 99, "status": "unavailable"}));

        let loaded = store.load().await.unwrap();
        let ids: Vec<u64> = loaded.keys().map(AppId::get).collect();
        assert_eq!(ids, vec![730, 99, 10]);
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn test_loads_cache_written_by_older_versions() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{
  "620": {
    "appid": 620,
    "name": "Portal 2",
    "type": "game",
    "release_date": "18 Apr, 2011",
    "developers": ["Valve"],
    "publishers": ["Valve"],
    "genres": ["Action", "Adventure"],
    "is_free": false,
    "header_image": "https://example.invalid/620.jpg",
    "collection": "Puzzle"
  },
  "99": {"appid": 99, "status": "unavailable"}
}"#,
        )
        .unwrap();

        let loaded = CacheStore::new(&path).load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&AppId(620)].collection, vec!["Puzzle".to_string()]);
        assert!(loaded[&AppId(99)].is_unavailable());
    }

    #[tokio::test]
    async fn test_null_list_fields_keep_whole_cache() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{
  "620": {"appid": 620, "name": "Portal 2", "developers": ["Valve"], "collection": ["Puzzle"]},
  "5": {"appid": 5, "name": "Tool", "developers": null, "genres": null}
}"#,
        )
        .unwrap();

        let loaded = CacheStore::new(&path).load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&AppId(620)].developers, vec!["Valve".to_string()]);
        assert!(loaded[&AppId(5)].developers.is_empty());
        assert_eq!(loaded[&AppId(5)].display_name(), "Tool");
    }
}

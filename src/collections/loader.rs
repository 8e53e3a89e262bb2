use crate::collections::types::{CollectionEntry, CollectionPayload, NamespaceEntry};
use crate::error::{Result, SteamCollectionsError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;

/// File name prefix of the Steam client's cloud-storage namespace files
pub const NAMESPACE_FILE_PREFIX: &str = "cloud-storage-namespace-";

/// Keys of user-created collections (excludes favorites, hidden, etc.)
static USER_COLLECTION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^user-collections\.uc-").expect("user collection key pattern is valid")
});

/// Load every user collection from the namespace files in `dir`
///
/// Unreadable or malformed files and entries are skipped; only a missing
/// directory is an error.
pub async fn load_collections(dir: &Path) -> Result<Vec<CollectionEntry>> {
    let files = namespace_files(dir).await?;
    tracing::debug!(dir = %dir.display(), files = files.len(), "Found namespace files");

    let mut collections = Vec::new();
    for file in files {
        let content = match fs::read_to_string(&file).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Cannot read namespace file, skipping");
                continue;
            }
        };

        match parse_namespace(&content) {
            Ok(found) => {
                tracing::debug!(
                    file = %file.display(),
                    collections = found.len(),
                    "Parsed namespace file"
                );
                collections.extend(found);
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Malformed namespace file, skipping");
            }
        }
    }

    Ok(collections)
}

/// Namespace files in `dir`, sorted by name
async fn namespace_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await.map_err(|e| {
        SteamCollectionsError::Config(format!(
            "Cannot read collection directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let is_namespace = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(NAMESPACE_FILE_PREFIX));
        if is_namespace && entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Extract user collections from the contents of one namespace file
///
/// Only a file that is not a list of `[key, entry]` pairs is an error; a
/// single undecodable entry is skipped on its own.
pub fn parse_namespace(content: &str) -> Result<Vec<CollectionEntry>> {
    let pairs: Vec<(String, serde_json::Value)> = serde_json::from_str(content)?;

    Ok(pairs
        .into_iter()
        .filter_map(|(key, raw)| parse_entry(&key, raw))
        .collect())
}

fn parse_entry(key: &str, raw: serde_json::Value) -> Option<CollectionEntry> {
    if !USER_COLLECTION_KEY.is_match(key) {
        return None;
    }

    let entry: NamespaceEntry = match serde_json::from_value(raw) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Skipping malformed namespace entry");
            return None;
        }
    };
    if entry.is_deleted {
        return None;
    }

    let value = entry.value.filter(|v| !v.is_empty())?;
    let payload: CollectionPayload = match serde_json::from_str(&value) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Skipping malformed collection value");
            return None;
        }
    };

    let added = payload.added.filter(|added| !added.is_empty())?;
    let id = payload.id.unwrap_or_else(|| key.trim_start_matches("user-collections.").to_string());
    let name = payload.name.unwrap_or_else(|| id.clone());

    Some(CollectionEntry { id, name, added })
}

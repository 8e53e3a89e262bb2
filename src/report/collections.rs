//! Per-collection game lists

use crate::collections::CollectionEntry;
use crate::error::Result;
use crate::metadata::CachedItem;
use crate::storage::CacheEntries;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

/// A collection with its resolved games attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionGames {
    pub id: String,
    pub name: String,
    pub games: Vec<CachedItem>,
}

#[derive(Serialize)]
struct CollectionsDocument<'a> {
    generated_at: String,
    collections: &'a [CollectionGames],
}

/// Attach cached games to each collection, keeping `added` order
///
/// Apps missing from the cache or marked unavailable are left out.
pub fn attach_games(collections: &[CollectionEntry], cache: &CacheEntries) -> Vec<CollectionGames> {
    collections
        .iter()
        .map(|collection| CollectionGames {
            id: collection.id.clone(),
            name: collection.name.clone(),
            games: collection
                .added
                .iter()
                .filter_map(|app_id| cache.get(app_id))
                .filter(|item| !item.is_unavailable())
                .cloned()
                .collect(),
        })
        .collect()
}

/// Write the attached collections as a JSON document
///
/// Written to a `.tmp` sibling first and renamed into place.
pub async fn write_collection_games(path: &Path, collections: &[CollectionGames]) -> Result<()> {
    let document = CollectionsDocument {
        generated_at: chrono::Utc::now().to_rfc3339(),
        collections,
    };
    let json = serde_json::to_string_pretty(&document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    fs::write(&temp_path, json).await?;
    fs::rename(&temp_path, path).await?;

    tracing::info!(
        path = %path.display(),
        collections = collections.len(),
        "Collections export saved"
    );
    Ok(())
}

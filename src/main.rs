use anyhow::Context;
use steam_collections::catalog::{CatalogClient, SteamStoreClient};
use steam_collections::collections::{CollectionEntry, load_collections};
use steam_collections::config::load_settings;
use steam_collections::logging::{self, Timer};
use steam_collections::metadata::MetadataCache;
use steam_collections::report::{attach_games, export_csv, write_collection_games};
use steam_collections::storage::{CacheStore, SteamLibrary};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("🚀 Starting Steam collections export");

    // Load configuration
    let settings = load_settings().context("Failed to load configuration")?;
    tracing::debug!(
        "Config: base_path={:?}, cache={:?}, report={:?}",
        settings.steam.base_path,
        settings.cache.path,
        settings.report.csv_path
    );

    let library =
        SteamLibrary::resolve(settings.steam.base_path.clone(), settings.steam.user_id.clone())
            .await?;
    let cloud_storage = library.cloud_storage_dir();

    // Load collections
    let collections = {
        let _timer = Timer::new("load_collections");
        load_collections(&cloud_storage).await?
    };
    let app_count: usize = collections.iter().map(|c| c.added.len()).sum();
    tracing::info!(
        user_id = %library.user_id(),
        collections = collections.len(),
        apps = app_count,
        "✅ Collections loaded"
    );

    // Resolve metadata, cache first
    let client = SteamStoreClient::new(&settings.steam)?;
    let mut cache = MetadataCache::open(
        client,
        CacheStore::new(&settings.cache.path),
        settings.fetch.clone().into(),
        settings.cache.save_every,
    )
    .await?;

    let interrupted = tokio::select! {
        _ = resolve_all(&mut cache, &collections) => false,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, saving progress before exit");
            true
        }
    };

    // Save cache at the end regardless of batch state
    cache
        .flush()
        .await
        .context("Failed to save metadata cache")?;
    tracing::info!(
        entries = cache.len(),
        path = %settings.cache.path.display(),
        "💾 Metadata cache saved"
    );

    if interrupted {
        cache.log_stats();
        return Ok(());
    }

    // Attach metadata to collections
    let attached = attach_games(&collections, cache.entries());
    for collection in &attached {
        tracing::debug!(
            collection = %collection.name,
            games = collection.games.len(),
            "Collection resolved"
        );
    }
    if let Some(path) = &settings.report.collections_path {
        write_collection_games(path, &attached)
            .await
            .context("Failed to write collections export")?;
    }

    let rows = export_csv(cache.store(), &settings.report.csv_path)
        .await
        .context("Failed to write CSV report")?;

    cache.log_stats();
    tracing::info!(
        rows = rows,
        path = %settings.report.csv_path.display(),
        "🏁 Export complete"
    );
    Ok(())
}

/// Resolve every app of every collection, one at a time
async fn resolve_all<C: CatalogClient>(
    cache: &mut MetadataCache<C>,
    collections: &[CollectionEntry],
) {
    let _timer = Timer::new("resolve_metadata");

    for collection in collections {
        tracing::info!(
            collection = %collection.name,
            apps = collection.added.len(),
            "Processing collection"
        );
        for &app_id in &collection.added {
            cache.resolve(app_id, &collection.name).await;
        }
    }
}

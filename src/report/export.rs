//! Flat CSV report of the metadata cache

use crate::error::{Result, SteamCollectionsError};
use crate::metadata::CachedItem;
use crate::storage::{CacheEntries, CacheStore};
use std::path::Path;
use tokio::fs;

pub const REPORT_HEADERS: [&str; 10] = [
    "appid",
    "name",
    "type",
    "release_date",
    "developers",
    "publishers",
    "genres",
    "is_free",
    "header_image",
    "collection",
];

/// Read the persisted cache and write the report to `csv_path`
///
/// Returns the number of data rows written.
pub async fn export_csv(cache: &CacheStore, csv_path: &Path) -> Result<usize> {
    let entries = cache.load().await?;
    write_report(&entries, csv_path).await
}

/// Write one row per available cache entry, in cache order
pub async fn write_report(entries: &CacheEntries, csv_path: &Path) -> Result<usize> {
    let (bytes, rows) = render_report(entries)?;

    if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let mut temp_path = csv_path.as_os_str().to_owned();
    temp_path.push(".tmp");
    fs::write(&temp_path, bytes).await?;
    fs::rename(&temp_path, csv_path).await?;

    tracing::info!(path = %csv_path.display(), rows = rows, "CSV report saved");
    Ok(rows)
}

/// Render the report into memory
pub fn render_report(entries: &CacheEntries) -> Result<(Vec<u8>, usize)> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADERS)?;

    let mut rows = 0;
    for item in entries.values().filter(|item| !item.is_unavailable()) {
        writer.write_record(report_row(item))?;
        rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SteamCollectionsError::Internal(format!("Cannot finish CSV report: {}", e)))?;
    Ok((bytes, rows))
}

fn report_row(item: &CachedItem) -> [String; 10] {
    [
        item.appid.to_string(),
        item.name.clone().unwrap_or_default(),
        item.app_type.clone().unwrap_or_default(),
        item.release_date.clone().unwrap_or_default(),
        item.developers.join(", "),
        item.publishers.join(", "),
        item.genres.join(", "),
        match item.is_free {
            Some(true) => "True".to_string(),
            Some(false) => "False".to_string(),
            None => String::new(),
        },
        item.header_image.clone().unwrap_or_default(),
        item.first_collection().unwrap_or_default().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::AppId;

    fn sample_entries() -> CacheEntries {
        let mut entries = CacheEntries::new();
        entries.insert(
            AppId(2280),
            CachedItem {
                appid: AppId(2280),
                name: Some("DOOM".to_string()),
                app_type: Some("game".to_string()),
                release_date: Some("3 Aug, 2007".to_string()),
                developers: vec!["Valve".to_string(), "Id".to_string()],
                publishers: vec!["Bethesda".to_string()],
                genres: vec!["Action".to_string()],
                is_free: Some(false),
                header_image: Some("https://cdn.example.invalid/2280.jpg".to_string()),
                collection: vec!["Shooters".to_string(), "Classics".to_string()],
                status: None,
            },
        );
        entries.insert(AppId(99), CachedItem::unavailable(AppId(99)));
        entries.insert(
            AppId(5),
            CachedItem {
                appid: AppId(5),
                name: Some("Sparse, Inc.".to_string()),
                ..Default::default()
            },
        );
        entries
    }

    fn rows(bytes: &[u8]) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_render_skips_unavailable() {
        let (bytes, count) = render_report(&sample_entries()).unwrap();
        let records = rows(&bytes);

        assert_eq!(count, 2);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].iter().collect::<Vec<_>>(), REPORT_HEADERS.to_vec());
        assert_eq!(
            records[1].iter().collect::<Vec<_>>(),
            vec![
                "2280",
                "DOOM",
                "game",
                "3 Aug, 2007",
                "Valve, Id",
                "Bethesda",
                "Action",
                "False",
                "https://cdn.example.invalid/2280.jpg",
                "Shooters",
            ]
        );
        assert_eq!(
            records[2].iter().collect::<Vec<_>>(),
            vec!["5", "Sparse, Inc.", "", "", "", "", "", "", "", ""]
        );
    }

    #[test]
    fn test_list_fields_are_quoted() {
        let (bytes, _) = render_report(&sample_entries()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"Valve, Id\""));
        assert!(text.starts_with("appid,name,type,release_date,developers,publishers,genres,is_free,header_image,collection\n"));
    }

    #[tokio::test]
    async fn test_export_from_cache_file() {
        let temp = tempfile::tempdir().unwrap();
        let store = CacheStore::new(temp.path().join("cache.json"));
        store.save(&sample_entries()).await.unwrap();

        let csv_path = temp.path().join("out/report.csv");
        let count = export_csv(&store, &csv_path).await.unwrap();

        assert_eq!(count, 2);
        let records = rows(&std::fs::read(&csv_path).unwrap());
        assert_eq!(records.len(), 3);
        assert_eq!(&records[1][0], "2280");
        assert_eq!(&records[2][0], "5");
    }

    #[tokio::test]
    async fn test_export_without_cache_writes_header_only() {
        let temp = tempfile::tempdir().unwrap();
        let store = CacheStore::new(temp.path().join("missing.json"));
        let csv_path = temp.path().join("report.csv");

        assert_eq!(export_csv(&store, &csv_path).await.unwrap(), 0);
        assert_eq!(rows(&std::fs::read(&csv_path).unwrap()).len(), 1);
    }
}

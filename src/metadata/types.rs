//! Cached app metadata types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Steam app id
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AppId(pub u64);

impl AppId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for AppId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lookup status recorded for apps the store cannot resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Unavailable,
}

/// One entry of the durable metadata cache
///
/// Serialized with the same field names the store API uses so cache files
/// stay readable by other tools. Empty fields are omitted, which makes a
/// sentinel serialize as `{"appid": 99, "status": "unavailable"}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CachedItem {
    pub appid: AppId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub developers: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub publishers: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub genres: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,

    /// Every collection this app was seen in, in first-seen order
    #[serde(
        default,
        deserialize_with = "string_or_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub collection: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl CachedItem {
    /// Sentinel for an app the store reported as missing
    pub fn unavailable(appid: AppId) -> Self {
        Self {
            appid,
            status: Some(ItemStatus::Unavailable),
            ..Default::default()
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.status == Some(ItemStatus::Unavailable)
    }

    /// Record membership in a collection
    ///
    /// Returns true when the name was not present before.
    pub fn add_collection(&mut self, collection: &str) -> bool {
        if self.collection.iter().any(|c| c == collection) {
            return false;
        }
        self.collection.push(collection.to_string());
        true
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn first_collection(&self) -> Option<&str> {
        self.collection.first().map(String::as_str)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Older caches stored the first collection as a bare string
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(()) => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentinel_serialization() {
        let sentinel = CachedItem::unavailable(AppId(99));

        assert!(sentinel.is_unavailable());
        assert_eq!(
            serde_json::to_value(&sentinel).unwrap(),
            json!({"appid": 99, "status": "unavailable"})
        );
    }

    #[test]
    fn test_legacy_string_collection() {
        let item: CachedItem = serde_json::from_value(json!({
            "appid": 620,
            "name": "Portal 2",
            "type": "game",
            "collection": "Puzzle",
            "is_free": false
        }))
        .unwrap();

        assert_eq!(item.collection, vec!["Puzzle".to_string()]);
        assert_eq!(item.app_type.as_deref(), Some("game"));
        assert!(!item.is_unavailable());
    }

    #[test]
    fn test_null_fields_tolerated() {
        let item: CachedItem = serde_json::from_value(json!({
            "appid": 10,
            "name": null,
            "collection": null,
            "developers": null,
            "publishers": null,
            "genres": null,
            "header_image": null
        }))
        .unwrap();

        assert!(item.collection.is_empty());
        assert!(item.developers.is_empty());
        assert!(item.publishers.is_empty());
        assert!(item.genres.is_empty());
        assert_eq!(item.display_name(), "Unknown");
    }

    #[test]
    fn test_add_collection_is_idempotent() {
        let mut item = CachedItem {
            appid: AppId(42),
            name: Some("X".to_string()),
            collection: vec!["A".to_string()],
            ..Default::default()
        };

        assert!(item.add_collection("B"));
        assert!(!item.add_collection("B"));
        assert!(!item.add_collection("A"));
        assert_eq!(item.collection, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(item.first_collection(), Some("A"));
    }
}

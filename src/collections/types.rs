use crate::metadata::AppId;
use serde::{Deserialize, Serialize};

/// A user-defined Steam collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEntry {
    /// Collection id (e.g., "uc-3bZ1yQ0fUxLq")
    pub id: String,

    /// Name shown in the Steam client
    pub name: String,

    /// App ids in the order they were added
    pub added: Vec<AppId>,
}

/// One `[key, entry]` pair value from a cloud-storage namespace file
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NamespaceEntry {
    #[serde(default)]
    pub is_deleted: bool,

    #[serde(default)]
    pub value: Option<String>,
}

/// JSON payload embedded in a collection entry's `value`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CollectionPayload {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub added: Option<Vec<AppId>>,
}

//! Steam library collections
//!
//! Collections live in the Steam client's cloud-storage namespace files as
//! `[key, entry]` pairs whose `value` is itself a JSON document.

mod loader;
mod types;

pub use loader::{NAMESPACE_FILE_PREFIX, load_collections, parse_namespace};
pub use types::CollectionEntry;

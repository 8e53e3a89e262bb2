mod cache_file;
mod library;

pub use cache_file::{CacheEntries, CacheStore};
pub use library::SteamLibrary;

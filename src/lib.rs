pub mod catalog;
pub mod collections;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod report;
pub mod storage;

pub use error::{Result, SteamCollectionsError};

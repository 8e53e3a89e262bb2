//! Remote app catalog lookups

mod steam;

use crate::error::Result;
use crate::metadata::AppId;
use std::future::Future;

pub use steam::SteamStoreClient;

/// Store metadata for one app
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppDetails {
    pub name: Option<String>,
    pub app_type: Option<String>,
    pub release_date: Option<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub genres: Vec<String>,
    pub is_free: Option<bool>,
    pub header_image: Option<String>,
}

/// Outcome of a lookup the store answered
#[derive(Debug, Clone, PartialEq)]
pub enum AppLookup {
    Found(AppDetails),
    /// The store does not know the app (or refuses to describe it)
    Unavailable,
}

/// Source of app metadata
///
/// `Err` means the lookup did not complete (network failure, rate limit,
/// undecodable body) and may be retried.
pub trait CatalogClient {
    fn app_details(&self, app_id: AppId) -> impl Future<Output = Result<AppLookup>> + Send;
}

use crate::catalog::{AppDetails, AppLookup, CatalogClient};
use crate::config::SteamConfig;
use crate::error::{Result, SteamCollectionsError};
use crate::metadata::AppId;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;

/// Steam store `appdetails` client
pub struct SteamStoreClient {
    client: Client,
    api_url: String,
    language: String,
}

/// Response body: one envelope per requested app id
type AppDetailsResponse = HashMap<String, AppDetailsEnvelope>;

#[derive(Debug, Deserialize)]
struct AppDetailsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<SteamAppDetails>,
}

#[derive(Debug, Deserialize, Default)]
struct SteamAppDetails {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    app_type: Option<String>,
    #[serde(default)]
    release_date: Option<SteamReleaseDate>,
    #[serde(default)]
    developers: Option<Vec<String>>,
    #[serde(default)]
    publishers: Option<Vec<String>>,
    #[serde(default)]
    genres: Option<Vec<SteamGenre>>,
    #[serde(default)]
    is_free: Option<bool>,
    #[serde(default)]
    header_image: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SteamReleaseDate {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SteamGenre {
    description: String,
}

impl From<SteamAppDetails> for AppDetails {
    fn from(details: SteamAppDetails) -> Self {
        Self {
            name: details.name,
            app_type: details.app_type,
            release_date: details.release_date.and_then(|r| r.date),
            developers: details.developers.unwrap_or_default(),
            publishers: details.publishers.unwrap_or_default(),
            genres: details
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.description)
                .collect(),
            is_free: details.is_free,
            header_image: details.header_image,
        }
    }
}

impl SteamStoreClient {
    pub fn new(config: &SteamConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            api_url: config.store_api_url.clone(),
            language: config.language.clone(),
        })
    }

    async fn fetch(&self, app_id: AppId) -> Result<AppLookup> {
        let appids = app_id.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("appids", appids.as_str()), ("l", self.language.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SteamCollectionsError::RateLimited);
        }

        let body = response.error_for_status()?.text().await?;
        parse_app_details(app_id, &body)
    }
}

impl CatalogClient for SteamStoreClient {
    async fn app_details(&self, app_id: AppId) -> Result<AppLookup> {
        self.fetch(app_id).await
    }
}

/// Interpret an `appdetails` body for `app_id`
fn parse_app_details(app_id: AppId, body: &str) -> Result<AppLookup> {
    // The store answers `null` for requests it rejects outright
    let response: Option<AppDetailsResponse> = serde_json::from_str(body)?;
    let mut response = response.ok_or_else(|| {
        SteamCollectionsError::InvalidResponse(format!("null body for app {}", app_id))
    })?;

    let Some(envelope) = response.remove(&app_id.to_string()) else {
        return Ok(AppLookup::Unavailable);
    };

    if !envelope.success {
        return Ok(AppLookup::Unavailable);
    }

    envelope
        .data
        .map(|data| AppLookup::Found(data.into()))
        .ok_or_else(|| {
            SteamCollectionsError::InvalidResponse(format!("no data for app {}", app_id))
        })
}

use crate::error::{Result, SteamCollectionsError};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_STORE_API_URL: &str = "https://store.steampowered.com/api/appdetails";

#[derive(Debug, Clone)]
pub struct Settings {
    pub steam: SteamConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct SteamConfig {
    pub base_path: PathBuf,
    /// Account directory under `userdata`; detected when not set
    pub user_id: Option<String>,
    pub language: String,
    pub store_api_url: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub delay_first_attempt: bool,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub path: PathBuf,
    pub save_every: usize,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub csv_path: PathBuf,
    pub collections_path: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            delay_first_attempt: true,
        }
    }
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    Settings::from_lookup(|key| std::env::var(key).ok())
}

impl Settings {
    /// Build settings from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let steam = SteamConfig {
            base_path: lookup("STEAM_BASE_PATH")
                .unwrap_or_else(|| {
                    let home = lookup("HOME").unwrap_or_else(|| ".".to_string());
                    format!("{}/.steam/steam", home)
                })
                .into(),
            user_id: lookup("STEAM_USER_ID").filter(|id| !id.trim().is_empty()),
            language: lookup("STEAM_LANGUAGE").unwrap_or_else(|| "en".to_string()),
            store_api_url: lookup("STEAM_STORE_API_URL")
                .unwrap_or_else(|| DEFAULT_STORE_API_URL.to_string()),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?),
        };

        let fetch = FetchConfig {
            max_attempts: parse_or(&lookup, "FETCH_MAX_ATTEMPTS", 5)?,
            base_delay: Duration::from_millis(parse_or(&lookup, "FETCH_BASE_DELAY_MS", 500)?),
            delay_first_attempt: parse_bool_or(&lookup, "FETCH_DELAY_FIRST_ATTEMPT", true)?,
        };
        if fetch.max_attempts == 0 {
            return Err(SteamCollectionsError::Config(
                "FETCH_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let cache = CacheConfig {
            path: lookup("CACHE_FILE")
                .unwrap_or_else(|| "steam_app_cache.json".to_string())
                .into(),
            save_every: parse_or(&lookup, "CACHE_SAVE_EVERY", 5)?,
        };
        if cache.save_every == 0 {
            return Err(SteamCollectionsError::Config(
                "CACHE_SAVE_EVERY must be at least 1".to_string(),
            ));
        }

        let report = ReportConfig {
            csv_path: lookup("REPORT_FILE")
                .unwrap_or_else(|| "steam_app_data.csv".to_string())
                .into(),
            collections_path: lookup("COLLECTIONS_EXPORT_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(Self {
            steam,
            fetch,
            cache,
            report,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SteamCollectionsError::Config(format!("Invalid {}", key))),
        None => Ok(default),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(SteamCollectionsError::Config(format!("Invalid {}", key))),
        },
    }
}

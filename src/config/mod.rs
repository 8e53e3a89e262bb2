mod settings;

pub use settings::{
    CacheConfig, DEFAULT_STORE_API_URL, FetchConfig, ReportConfig, Settings, SteamConfig,
    load_settings,
};

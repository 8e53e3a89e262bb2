use thiserror::Error;

#[derive(Debug, Error)]
pub enum SteamCollectionsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Steam store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Steam store rate limit reached")]
    RateLimited,

    #[error("Invalid Steam store response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SteamCollectionsError {
    /// Errors worth another lookup attempt
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::RateLimited | Self::InvalidResponse(_) | Self::Serde(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SteamCollectionsError>;

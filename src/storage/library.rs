use crate::error::{Result, SteamCollectionsError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Location of one Steam account's data below the Steam base directory
pub struct SteamLibrary {
    base_path: PathBuf,
    user_id: String,
}

impl SteamLibrary {
    pub fn new(base_path: PathBuf, user_id: impl Into<String>) -> Self {
        Self {
            base_path,
            user_id: user_id.into(),
        }
    }

    /// Use the configured account, or the only account found under `userdata`
    pub async fn resolve(base_path: PathBuf, user_id: Option<String>) -> Result<Self> {
        match user_id {
            Some(user_id) => Ok(Self::new(base_path, user_id)),
            None => Self::detect(base_path).await,
        }
    }

    /// Pick the single numeric account directory under `{base}/userdata`
    pub async fn detect(base_path: PathBuf) -> Result<Self> {
        let userdata = base_path.join("userdata");
        let mut dir = fs::read_dir(&userdata).await.map_err(|e| {
            SteamCollectionsError::Config(format!(
                "Cannot read {}: {}; set STEAM_BASE_PATH",
                userdata.display(),
                e
            ))
        })?;

        let mut accounts = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // "0" is the anonymous account Steam creates before login
            if name != "0" && name.chars().all(|c| c.is_ascii_digit()) {
                accounts.push(name);
            }
        }
        accounts.sort();

        match accounts.as_slice() {
            [only] => {
                tracing::info!(user_id = %only, "Detected Steam account");
                Ok(Self::new(base_path, only.clone()))
            }
            [] => Err(SteamCollectionsError::Config(format!(
                "No Steam accounts found in {}; set STEAM_USER_ID",
                userdata.display()
            ))),
            many => Err(SteamCollectionsError::Config(format!(
                "Multiple Steam accounts found ({}); set STEAM_USER_ID",
                many.join(", ")
            ))),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns path to the account's cloud storage: {base}/userdata/{user_id}/config/cloudstorage
    pub fn cloud_storage_dir(&self) -> PathBuf {
        self.base_path
            .join("userdata")
            .join(&self.user_id)
            .join("config")
            .join("cloudstorage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_storage_dir() {
        let library = SteamLibrary::new(PathBuf::from("/home/foo/.steam/steam"), "123456789");

        assert_eq!(
            library.cloud_storage_dir(),
            PathBuf::from("/home/foo/.steam/steam/userdata/123456789/config/cloudstorage")
        );
        assert_eq!(library.user_id(), "123456789");
    }

    #[tokio::test]
    async fn test_detect_single_account() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("userdata/0")).unwrap();
        std::fs::create_dir_all(temp.path().join("userdata/42424242/config")).unwrap();
        std::fs::create_dir_all(temp.path().join("userdata/ac")).unwrap();

        let library = SteamLibrary::detect(temp.path().to_path_buf()).await.unwrap();
        assert_eq!(library.user_id(), "42424242");
    }

    #[tokio::test]
    async fn test_detect_ambiguous_accounts() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("userdata/111")).unwrap();
        std::fs::create_dir_all(temp.path().join("userdata/222")).unwrap();

        let result = SteamLibrary::detect(temp.path().to_path_buf()).await;
        assert!(matches!(result, Err(SteamCollectionsError::Config(msg)) if msg.contains("111, 222")));
    }

    #[tokio::test]
    async fn test_resolve_prefers_configured_user() {
        let library = SteamLibrary::resolve(PathBuf::from("/nowhere"), Some("7".to_string()))
            .await
            .unwrap();
        assert_eq!(library.user_id(), "7");
        assert_eq!(library.base_path(), Path::new("/nowhere"));
    }
}

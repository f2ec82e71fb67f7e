// src/repositories/json_file_repo.rs
use std::path::PathBuf;

use async_trait::async_trait;
use log::info;
use tokio::sync::Mutex;

use crate::models::profile::Profile;
use crate::repositories::profile_store::{seed_profile, ProfileStore, StoreError};

/// Keeps the profile as pretty-printed JSON in a single file.
pub struct JsonFileProfileStore {
    data_path: PathBuf,
    seed_path: Option<PathBuf>,
    /// Serializes writers so a save never interleaves with a seed.
    write_lock: Mutex<()>,
}

impl JsonFileProfileStore {
    pub fn new(data_path: impl Into<PathBuf>, seed_path: Option<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            seed_path,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Option<Profile>, StoreError> {
        match tokio::fs::read(&self.data_path).await {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file and renames it over the data file.
    async fn write(&self, profile: &Profile) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(profile)?;
        if let Some(parent) = self.data_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.data_path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.data_path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn fetch_or_seed(&self) -> Result<Profile, StoreError> {
        if let Some(profile) = self.read().await? {
            return Ok(profile);
        }

        let _guard = self.write_lock.lock().await;
        // Another request may have seeded while we waited.
        if let Some(profile) = self.read().await? {
            return Ok(profile);
        }

        let profile = seed_profile(self.seed_path.as_deref()).await;
        self.write(&profile).await?;
        info!("Seeded profile store at {}", self.data_path.display());
        Ok(profile)
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(profile).await
    }
}

// src/repositories/profile_store.rs
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::warn;
use thiserror::Error;

use crate::models::profile::Profile;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored profile is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("postgres pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed file {0} not found")]
    Missing(PathBuf),
    #[error("seed file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Storage for the single portfolio document.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the stored profile, seeding it first if the store is empty.
    async fn fetch_or_seed(&self) -> Result<Profile, StoreError>;

    /// Replaces the stored profile with `profile`.
    async fn save(&self, profile: &Profile) -> Result<(), StoreError>;
}

/// Reads the bootstrap profile from `path`.
pub async fn load_seed(path: &Path) -> Result<Profile, SeedError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SeedError::Missing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&raw)?)
}

/// Seed profile for an empty store. A missing or broken seed file yields an
/// empty profile.
pub async fn seed_profile(seed_path: Option<&Path>) -> Profile {
    let Some(path) = seed_path else {
        return Profile::default();
    };
    match load_seed(path).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Seeding empty profile: {}", e);
            Profile::default()
        }
    }
}

// src/repositories/profile_pg_repo.rs
use std::path::PathBuf;

use async_trait::async_trait;
use deadpool_postgres::Pool;
use log::info;
use tokio_postgres::types::Json;

use crate::models::profile::Profile;
use crate::repositories::profile_store::{seed_profile, ProfileStore, StoreError};

/// Fixed primary key of the only row in `portfolio_profile`.
const PROFILE_ROW_ID: i16 = 1;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS portfolio_profile (
        id SMALLINT PRIMARY KEY CHECK (id = 1),
        document JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )";

const SELECT_PROFILE: &str = "SELECT document FROM portfolio_profile WHERE id = $1";

const INSERT_SEED: &str = "
    INSERT INTO portfolio_profile (id, document) VALUES ($1, $2)
    ON CONFLICT (id) DO NOTHING";

const UPSERT_PROFILE: &str = "
    INSERT INTO portfolio_profile (id, document) VALUES ($1, $2)
    ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document, updated_at = now()";

/// Keeps the profile as a JSONB document in a one-row Postgres table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: Pool,
    seed_path: Option<PathBuf>,
}

impl PgProfileStore {
    /// Wraps `pool` and makes sure the table exists.
    pub async fn connect(pool: Pool, seed_path: Option<PathBuf>) -> Result<Self, StoreError> {
        let client = pool.get().await?;
        client.batch_execute(CREATE_TABLE).await?;
        Ok(Self { pool, seed_path })
    }

    async fn select(&self, client: &deadpool_postgres::Client) -> Result<Option<Profile>, StoreError> {
        let row = client.query_opt(SELECT_PROFILE, &[&PROFILE_ROW_ID]).await?;
        match row {
            Some(row) => {
                let Json(profile): Json<Profile> = row.try_get(0)?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn fetch_or_seed(&self) -> Result<Profile, StoreError> {
        let client = self.pool.get().await?;
        if let Some(profile) = self.select(&client).await? {
            return Ok(profile);
        }

        let seed = seed_profile(self.seed_path.as_deref()).await;
        let inserted = client
            .execute(INSERT_SEED, &[&PROFILE_ROW_ID, &Json(&seed)])
            .await?;
        if inserted > 0 {
            info!("Seeded portfolio_profile row");
        }

        // Re-read so concurrent seeders all return the row that won.
        Ok(self.select(&client).await?.unwrap_or(seed))
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client
            .execute(UPSERT_PROFILE, &[&PROFILE_ROW_ID, &Json(profile)])
            .await?;
        Ok(())
    }
}

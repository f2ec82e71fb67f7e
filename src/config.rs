use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

const DEFAULT_ADMIN_PASSWORD: &str = "admin";
/// Upper bound for `SESSION_TTL_MINUTES`: one year.
const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Settings for the Postgres-backed profile store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
    pub pool_size: usize,
}

/// Process configuration, read once at startup and shared through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub admin_password: String,
    pub data_file: PathBuf,
    pub seed_file: Option<PathBuf>,
    pub public_dir: PathBuf,
    pub session_ttl_minutes: i64,
    /// When set, the profile lives in Postgres instead of `data_file`.
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {p}"))?,
            None => 3000,
        };

        let session_ttl_minutes = match var("SESSION_TTL_MINUTES") {
            Some(t) => t
                .parse::<i64>()
                .with_context(|| format!("SESSION_TTL_MINUTES is not a number: {t}"))?,
            None => 24 * 60,
        };
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&session_ttl_minutes) {
            anyhow::bail!(
                "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {session_ttl_minutes}"
            );
        }

        let database = match var("PG_HOST") {
            Some(host) => Some(DatabaseConfig {
                host,
                port: var("PG_PORT")
                    .map(|p| p.parse::<u16>().context("PG_PORT is not a valid port"))
                    .transpose()?,
                user: var("PG_USER").context("PG_USER not set")?,
                password: var("PG_PASS"),
                dbname: var("PG_DB").context("PG_DB not set")?,
                pool_size: var("PG_POOL_SIZE")
                    .map(|s| s.parse::<usize>().context("PG_POOL_SIZE is not a number"))
                    .transpose()?
                    .unwrap_or(16),
            }),
            None => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            admin_password: var("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            data_file: var("DATA_FILE").unwrap_or_else(|| "data.json".into()).into(),
            seed_file: Some(var("SEED_FILE").unwrap_or_else(|| "data.seed.json".into()).into()),
            public_dir: var("PUBLIC_DIR").unwrap_or_else(|| "public".into()).into(),
            session_ttl_minutes,
            database,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

pub fn get_pg_pool(db: &DatabaseConfig) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(db.host.clone());
    cfg.port = db.port;
    cfg.user = Some(db.user.clone());
    cfg.password = db.password.clone();
    cfg.dbname = Some(db.dbname.clone());

    let mut pool = cfg.pool.take().unwrap_or_default();
    pool.max_size = db.pool_size;
    cfg.pool = Some(pool);

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_address(), "0.0.0.0:3000");
        assert_eq!(cfg.admin_password, "admin");
        assert!(cfg.uses_default_password());
        assert_eq!(cfg.data_file, PathBuf::from("data.json"));
        assert_eq!(cfg.session_ttl_minutes, 1440);
        assert!(cfg.database.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("PUBLIC_DIR", "/srv/public"),
            ("PG_HOST", "db"),
            ("PG_USER", "cms"),
            ("PG_DB", "portfolio"),
        ]))
        .unwrap();

        assert_eq!(cfg.port, 8080);
        assert!(!cfg.uses_default_password());
        assert_eq!(cfg.public_dir, PathBuf::from("/srv/public"));
        let db = cfg.database.unwrap();
        assert_eq!(db.dbname, "portfolio");
        assert_eq!(db.pool_size, 16);
        assert!(db.password.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
    }

    #[test]
    fn session_ttl_must_be_positive_and_at_most_a_year() {
        for bad in ["0", "-5", "525601", "1000000000000"] {
            assert!(
                AppConfig::from_lookup(lookup(&[("SESSION_TTL_MINUTES", bad)])).is_err(),
                "accepted {bad}"
            );
        }

        let cfg = AppConfig::from_lookup(lookup(&[("SESSION_TTL_MINUTES", "525600")])).unwrap();
        assert_eq!(cfg.session_ttl_minutes, 525_600);
        let cfg = AppConfig::from_lookup(lookup(&[("SESSION_TTL_MINUTES", "1")])).unwrap();
        assert_eq!(cfg.session_ttl_minutes, 1);
    }

    #[test]
    fn postgres_requires_user_and_db() {
        assert!(AppConfig::from_lookup(lookup(&[("PG_HOST", "db")])).is_err());
    }
}

// src/main.rs
mod config;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;
mod views;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::{info, warn};

use crate::config::AppConfig;
use crate::repositories::json_file_repo::JsonFileProfileStore;
use crate::repositories::profile_pg_repo::PgProfileStore;
use crate::repositories::profile_store::ProfileStore;
use crate::services::auth_services::AuthService;
use crate::services::session_services::SessionStore;
use crate::services::upload_services::UploadService;
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub uploads: UploadService,
    pub views: Arc<Views>,
}

async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ProfileStore>> {
    match &config.database {
        Some(db) => {
            let pool = config::get_pg_pool(db)?;
            let store = PgProfileStore::connect(pool, config.seed_file.clone())
                .await
                .context("failed to prepare postgres profile store")?;
            info!("Profile store: postgres {}/{}", db.host, db.dbname);
            Ok(Arc::new(store))
        }
        None => {
            info!("Profile store: {}", config.data_file.display());
            Ok(Arc::new(JsonFileProfileStore::new(
                &config.data_file,
                config.seed_file.clone(),
            )))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.uses_default_password() {
        warn!("ADMIN_PASSWORD is not set; using the built-in default password");
    }

    let store = build_store(&config).await?;
    let uploads = UploadService::new(&config.public_dir);
    tokio::fs::create_dir_all(uploads.upload_dir())
        .await
        .with_context(|| format!("cannot create {}", uploads.upload_dir().display()))?;

    let state = web::Data::new(AppState {
        store,
        uploads,
        views: Arc::new(Views::new().context("failed to compile templates")?),
    });

    let sessions = SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes));
    let auth_data = web::Data::new(AuthService::new(config.admin_password.clone(), sessions));

    let bind_address = config.bind_address();
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_data.clone())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}

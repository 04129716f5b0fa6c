use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use env_logger::Env;

use crate::credentials::{BcryptHasher, CredentialHasher};
use crate::settings::Settings;
use crate::store::{EntityStore, MemoryStore, PgStore};

mod catalog;
mod credentials;
mod error;
mod favorites;
mod handlers;
mod model;
mod schema;
mod settings;
mod store;
mod views;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let settings = Settings::from_env()?;
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.clone()));

    let store: Arc<dyn EntityStore> = match &settings.database_url {
        Some(database_url) => {
            log::info!("Using Postgres store (pool size {})", settings.pool_size);
            Arc::new(PgStore::connect(database_url, settings.pool_size)?)
        }
        None => {
            log::warn!("DATABASE_URL is not set, data will only be kept in memory");
            Arc::new(MemoryStore::new())
        }
    };
    let hasher: Arc<dyn CredentialHasher> = Arc::new(BcryptHasher::new(settings.bcrypt_cost));

    let store = web::Data::from(store);
    let hasher = web::Data::from(hasher);

    log::info!("Listening on {}:{}", settings.host, settings.port);
    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(hasher.clone())
            .configure(handlers::configure)
    })
    .bind(settings.bind_address())?
    .run()
    .await?;

    Ok(())
}

//! Library entrypoint for coinwatch.
//!
//! `main.rs` only wires settings, the database and the router together;
//! everything else lives here so integration tests under `tests/` can build
//! the app state and drive controllers directly.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod models;

#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

pub mod controllers;
pub mod routes;

pub mod client;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub users: Arc<dyn services::user_store::UserStore>,
    pub sessions: Arc<dyn auth::UserLookup>,
    pub alerts: Arc<dyn services::alerts_service::AlertStore>,
    pub chats: Arc<dyn services::chat_service::ChatStore>,
    pub benchmarks: Arc<dyn services::benchmark_service::BenchmarkStore>,
    pub prices: Arc<dyn services::price_feed::PriceSource>,
}

impl AppState {
    /// Production wiring: Mongo-backed stores, JWT sessions, CoinGecko prices.
    pub fn new(db: mongodb::Database, settings: config::Settings) -> Self {
        let users: Arc<dyn services::user_store::UserStore> =
            Arc::new(services::user_store::MongoUserStore::new(db.clone()));
        let sessions: Arc<dyn auth::UserLookup> =
            Arc::new(auth::JwtUserLookup::new(settings.jwt_secret.clone(), users.clone()));
        let prices = Arc::new(services::price_feed::PriceFeed::new(settings.price_api_url.clone()));

        Self {
            alerts: Arc::new(services::alerts_service::MongoAlertStore::new(db.clone())),
            chats: Arc::new(services::chat_service::MongoChatStore::new(db.clone())),
            benchmarks: Arc::new(services::benchmark_service::MongoBenchmarkStore::new(db.clone())),
            db,
            settings,
            users,
            sessions,
            prices,
        }
    }
}

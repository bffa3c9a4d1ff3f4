pub mod price_feed;
pub mod db_init;
pub mod alert_monitor;

pub mod user_store;
pub mod auth_service;
pub mod user_service;
pub mod alerts_service;
pub mod chat_service;
pub mod benchmark_service;

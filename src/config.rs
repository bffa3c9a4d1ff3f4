use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub jwt_secret: String,
    pub jwt_cookie_name: String,
    pub jwt_ttl_days: i64,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,

    // CoinGecko-compatible base url, no trailing slash
    pub price_api_url: String,
    pub alert_interval_secs: u64,
}

pub const MAX_JWT_TTL_DAYS: i64 = 365;

/// Token lifetime is kept within one day and `MAX_JWT_TTL_DAYS`.
pub fn clamp_jwt_ttl_days(days: i64) -> i64 {
    days.clamp(1, MAX_JWT_TTL_DAYS)
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env_or("MONGODB_URI", "mongodb://localhost:27017");
    let mongodb_db = env_or("MONGODB_DB", "coinwatch");

    let host = env_or("HOST", "127.0.0.1");
    let port = env_parse("PORT", 3000u16);

    let jwt_secret = env_or("JWT_SECRET", "change-me-dev-secret");
    let jwt_cookie_name = env_or("JWT_COOKIE_NAME", "auth_token");
    let jwt_ttl_days = clamp_jwt_ttl_days(env_parse("JWT_TTL_DAYS", 7i64));
    let cookie_secure = env_parse("COOKIE_SECURE", false);
    let bcrypt_cost = env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST);

    let price_api_url = env_or("PRICE_API_URL", "https://api.coingecko.com/api/v3")
        .trim_end_matches('/')
        .to_string();
    let alert_interval_secs = env_parse("ALERT_INTERVAL_SECS", 60u64).max(1);

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        jwt_secret,
        jwt_cookie_name,
        jwt_ttl_days,
        cookie_secure,
        bcrypt_cost,
        price_api_url,
        alert_interval_secs,
    }
}

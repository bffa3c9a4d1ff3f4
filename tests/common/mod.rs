#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use coinwatch::{
    AppState,
    auth::{JwtUserLookup, UserLookup},
    config,
    error::{AppError, AppResult},
    models::{ChatMessage, PortfolioBenchmark, PriceAlert, User},
    services::{
        alerts_service::AlertStore, benchmark_service::BenchmarkStore, chat_service::ChatStore,
        price_feed::PriceSource, user_store::UserStore,
    },
};
use http_body_util::BodyExt;
use mongodb::{Client, bson::oid::ObjectId};

pub const TEST_SECRET: &str = "test-secret";

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<ObjectId, User>>,
}

impl MemoryUserStore {
    pub fn with_user(user: User) -> Self {
        let store = Self::default();
        store.users.lock().unwrap().insert(user.id, user);
        store
    }

    pub fn get(&self, id: ObjectId) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    pub fn remove(&self, id: ObjectId) {
        self.users.lock().unwrap().remove(&id);
    }

    fn update(&self, id: ObjectId, f: impl FnOnce(&mut User)) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id)?;
        f(user);
        Some(user.clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn set_display_name(&self, id: ObjectId, name: &str) -> AppResult<Option<User>> {
        Ok(self.update(id, |u| u.display_name = Some(name.to_string())))
    }

    async fn set_email_notifications(&self, id: ObjectId, enabled: bool) -> AppResult<Option<User>> {
        Ok(self.update(id, |u| u.email_notifications = enabled))
    }
}

/// Lookup that records every token it is asked about.
pub struct CountingLookup {
    outcome: Box<dyn Fn() -> AppResult<User> + Send + Sync>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl CountingLookup {
    pub fn resolving_to(user: User) -> Self {
        Self::with_outcome(move || Ok(user.clone()))
    }

    pub fn failing_with(make_err: impl Fn() -> AppError + Send + Sync + 'static) -> Self {
        Self::with_outcome(move || Err(make_err()))
    }

    fn with_outcome(f: impl Fn() -> AppResult<User> + Send + Sync + 'static) -> Self {
        Self {
            outcome: Box::new(f),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserLookup for CountingLookup {
    async fn user_for_token(&self, token: &str) -> AppResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(token.to_string());
        (self.outcome)()
    }
}

#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: Mutex<Vec<PriceAlert>>,
}

impl MemoryAlertStore {
    pub fn with_alerts(alerts: Vec<PriceAlert>) -> Self {
        Self {
            alerts: Mutex::new(alerts),
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<PriceAlert> {
        self.alerts.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn list_for_user(&self, user_id: ObjectId) -> AppResult<Vec<PriceAlert>> {
        let mut out: Vec<PriceAlert> = self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(out)
    }

    async fn insert(&self, alert: &PriceAlert) -> AppResult<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    async fn delete_owned(&self, user_id: ObjectId, alert_id: ObjectId) -> AppResult<bool> {
        let mut alerts = self.alerts.lock().unwrap();
        let before = alerts.len();
        alerts.retain(|a| !(a.id == alert_id && a.user_id == user_id));
        Ok(alerts.len() < before)
    }

    async fn list_active(&self) -> AppResult<Vec<PriceAlert>> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_active)
            .cloned()
            .collect())
    }

    async fn mark_triggered(&self, alert_id: ObjectId, price: f64, at: i64) -> AppResult<bool> {
        let mut alerts = self.alerts.lock().unwrap();
        match alerts.iter_mut().find(|a| a.id == alert_id && a.is_active) {
            Some(a) => {
                a.is_active = false;
                a.triggered_price = Some(price);
                a.triggered_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryChatStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl MemoryChatStore {
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn insert(&self, msg: &ChatMessage) -> AppResult<()> {
        self.messages.lock().unwrap().push(msg.clone());
        Ok(())
    }

    async fn newest(&self, user_id: ObjectId, session_id: Option<&str>, limit: i64) -> AppResult<Vec<ChatMessage>> {
        let mut out: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == Some(user_id))
            .filter(|m| session_id.is_none() || m.session_id.as_deref() == session_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        out.truncate(limit.max(0) as usize);
        Ok(out)
    }
}

/// Rows keyed by user id, the way the unique index keeps them.
#[derive(Default)]
pub struct MemoryBenchmarkStore {
    rows: Mutex<Vec<PortfolioBenchmark>>,
}

impl MemoryBenchmarkStore {
    pub fn rows_for(&self, user_id: ObjectId) -> usize {
        self.rows.lock().unwrap().iter().filter(|b| b.user_id == user_id).count()
    }
}

#[async_trait]
impl BenchmarkStore for MemoryBenchmarkStore {
    async fn find(&self, user_id: ObjectId) -> AppResult<Option<PortfolioBenchmark>> {
        Ok(self.rows.lock().unwrap().iter().find(|b| b.user_id == user_id).cloned())
    }

    async fn upsert(&self, user_id: ObjectId, value: f64, at: i64) -> AppResult<PortfolioBenchmark> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|b| b.user_id == user_id) {
            row.value = value;
            row.updated_at = at;
            return Ok(row.clone());
        }

        let row = PortfolioBenchmark {
            id: ObjectId::new(),
            user_id,
            value,
            updated_at: at,
        };
        rows.push(row.clone());
        Ok(row)
    }
}

/// Price source answering from a fixed table, or failing every request.
#[derive(Default)]
pub struct FixedPrices {
    prices: HashMap<String, f64>,
    fail: bool,
    requested: Mutex<Vec<Vec<String>>>,
}

impl FixedPrices {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices.iter().map(|(id, p)| (id.to_string(), *p)).collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requested(&self) -> Vec<Vec<String>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for FixedPrices {
    async fn usd_prices(&self, coin_ids: &[String]) -> AppResult<HashMap<String, f64>> {
        self.requested.lock().unwrap().push(coin_ids.to_vec());
        if self.fail {
            return Err(AppError::Upstream("price feed down".into()));
        }
        Ok(coin_ids
            .iter()
            .filter_map(|id| self.prices.get(id).map(|p| (id.clone(), *p)))
            .collect())
    }
}

pub fn sample_user(email: &str) -> User {
    User {
        id: ObjectId::new(),
        email: email.to_string(),
        display_name: None,
        picture: None,
        email_notifications: true,
        password_hash: String::new(),
        created_at: 0,
    }
}

pub fn test_settings() -> config::Settings {
    let mut settings = config::load();
    settings.jwt_secret = TEST_SECRET.to_string();
    settings.jwt_cookie_name = "auth_token".to_string();
    settings.jwt_ttl_days = 7;
    settings.bcrypt_cost = 4;
    settings
}

async fn lazy_db(settings: &config::Settings) -> mongodb::Database {
    // the driver connects lazily; tests here never reach the server
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    client.database(&settings.mongodb_db)
}

pub async fn state_with(users: Arc<dyn UserStore>, sessions: Arc<dyn UserLookup>) -> AppState {
    let settings = test_settings();
    let db = lazy_db(&settings).await;

    AppState {
        db,
        settings,
        users,
        sessions,
        alerts: Arc::new(MemoryAlertStore::default()),
        chats: Arc::new(MemoryChatStore::default()),
        benchmarks: Arc::new(MemoryBenchmarkStore::default()),
        prices: Arc::new(FixedPrices::default()),
    }
}

/// Like `state_with`, resolving every token to `user`.
pub async fn state_for(user: User) -> AppState {
    let lookup = Arc::new(CountingLookup::resolving_to(user));
    state_with(Arc::new(MemoryUserStore::default()), lookup).await
}

/// State with the real JWT lookup over an in-memory user store.
pub async fn jwt_state(users: Arc<MemoryUserStore>) -> AppState {
    let sessions = Arc::new(JwtUserLookup::new(TEST_SECRET, users.clone()));
    state_with(users, sessions).await
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(res: Response) -> serde_json::Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

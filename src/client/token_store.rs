use std::sync::Mutex;

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Where a client keeps its access token, plus the cookie copy of it that
/// routing middleware reads.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn store_token(&self, token: &str);

    fn clear_token(&self);

    /// Mirrors `token` into the session cookie; `None` removes the cookie.
    fn set_cookie(&self, token: Option<&str>);
}

#[derive(Debug, Default)]
struct Slots {
    token: Option<String>,
    cookie: Option<String>,
}

/// In-process token store. The cookie is kept as its rendered `Set-Cookie` value.
#[derive(Debug)]
pub struct MemoryTokenStore {
    cookie_name: String,
    slots: Mutex<Slots>,
}

impl MemoryTokenStore {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            slots: Mutex::new(Slots::default()),
        }
    }

    pub fn with_token(cookie_name: impl Into<String>, token: &str) -> Self {
        let store = Self::new(cookie_name);
        store.store_token(token);
        store
    }

    pub fn cookie(&self) -> Option<String> {
        self.lock().cookie.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        // a poisoned lock only means another holder panicked; the slots are still usable
        self.slots.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    fn store_token(&self, token: &str) {
        self.lock().token = Some(token.to_string());
    }

    fn clear_token(&self) {
        self.lock().token = None;
    }

    fn set_cookie(&self, token: Option<&str>) {
        let rendered = token.map(|t| {
            Cookie::build((self.cookie_name.clone(), t.to_string()))
                .path("/")
                .same_site(SameSite::Lax)
                .build()
                .to_string()
        });
        self.lock().cookie = rendered;
    }
}

//! Client-side session state.
//!
//! [`AuthContext`] owns the `{user, loading}` pair that every view of a client
//! reads. Observers subscribe to a `watch` channel and always see the latest
//! value. Network work is delegated to an [`AuthApi`]; the token lives in a
//! [`TokenStore`] and is mirrored into a cookie whenever it changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::client::{api::AuthApi, token_store::TokenStore};
use crate::models::UserProfile;

pub const SIGN_IN_FAILED: &str = "Sign in failed. Please check your email and password.";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInResult {
    pub success: bool,
    pub error: Option<String>,
}

/// Performs a full navigation, dropping any in-memory client state.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

pub struct AuthContext {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<AuthState>,
}

impl AuthContext {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            api,
            tokens,
            navigator,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn publish(&self, user: Option<UserProfile>, loading: bool) {
        self.state.send_replace(AuthState { user, loading });
    }

    /// Startup: copy any stored token into the cookie, then verify it.
    pub async fn mount(&self) {
        if let Some(token) = self.tokens.token() {
            self.tokens.set_cookie(Some(&token));
        }
        self.check_auth_status().await;
    }

    pub async fn check_auth_status(&self) {
        let Some(token) = self.tokens.token() else {
            self.publish(None, false);
            return;
        };

        match self.api.profile(&token).await {
            Ok(user) => self.publish(Some(user), false),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is no longer valid");
                self.tokens.clear_token();
                self.tokens.set_cookie(None);
                self.publish(None, false);
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> SignInResult {
        self.state.send_modify(|s| s.loading = true);

        match self.api.sign_in(email, password).await {
            Ok(session) => {
                self.tokens.store_token(&session.access_token);
                self.tokens.set_cookie(Some(&session.access_token));
                self.publish(Some(session.user), false);
                SignInResult {
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "sign in failed");
                self.state.send_modify(|s| s.loading = false);
                SignInResult {
                    success: false,
                    error: Some(SIGN_IN_FAILED.to_string()),
                }
            }
        }
    }

    pub async fn sign_out(&self) {
        if let Some(token) = self.tokens.token() {
            if let Err(e) = self.api.sign_out(&token).await {
                tracing::warn!(error = %e, "remote sign out failed");
            }
        }

        self.tokens.clear_token();
        self.tokens.set_cookie(None);
        self.publish(None, false);
        self.navigator.navigate("/");
    }
}

//! Request authentication.
//!
//! A credential token reaches us one of two ways: an `Authorization: Bearer`
//! header (API calls) or the auth cookie (the session probe used by page
//! routing). Each entry point reads exactly one of them. Turning a token into
//! a user is delegated to a [`UserLookup`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::User,
    services::user_store::UserStore,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    // user id as hex string
    pub sub: String,
    // expiry (unix timestamp seconds)
    pub exp: usize,
}

/// Resolves a raw token to the user it belongs to.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn user_for_token(&self, token: &str) -> AppResult<User>;
}

/// HS256 JWT whose `sub` is the user id, backed by the user store.
pub struct JwtUserLookup {
    secret: String,
    users: Arc<dyn UserStore>,
}

impl JwtUserLookup {
    pub fn new(secret: impl Into<String>, users: Arc<dyn UserStore>) -> Self {
        Self {
            secret: secret.into(),
            users,
        }
    }
}

#[async_trait]
impl UserLookup for JwtUserLookup {
    async fn user_for_token(&self, token: &str) -> AppResult<User> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        let user_id = ObjectId::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = raw.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

pub fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let value = jar.get(name)?.value().trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

pub async fn resolve_bearer(headers: &HeaderMap, lookup: &dyn UserLookup) -> AppResult<User> {
    let token = bearer_token(headers).ok_or_else(AppError::unauthorized)?;
    lookup.user_for_token(&token).await
}

pub async fn resolve_cookie(headers: &HeaderMap, cookie_name: &str, lookup: &dyn UserLookup) -> AppResult<User> {
    let token = cookie_token(headers, cookie_name).ok_or_else(AppError::unauthorized)?;
    lookup.user_for_token(&token).await
}

/// User authenticated by the `Authorization: Bearer` header.
pub struct BearerUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for BearerUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_bearer(&parts.headers, state.sessions.as_ref())
            .await
            .map(BearerUser)
    }
}

/// User authenticated by the auth cookie.
pub struct CookieUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for CookieUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_cookie(
            &parts.headers,
            &state.settings.jwt_cookie_name,
            state.sessions.as_ref(),
        )
        .await
        .map(CookieUser)
    }
}

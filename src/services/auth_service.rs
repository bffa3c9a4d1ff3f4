use std::sync::OnceLock;

use axum_extra::extract::cookie::{Cookie, SameSite};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use mongodb::bson::oid::ObjectId;
use regex::Regex;

use crate::{
    AppState,
    auth::Claims,
    config::Settings,
    error::{AppError, AppResult},
    models::User,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
        .is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks the shape of a credential pair before touching the store.
pub fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required.".into()));
    }
    if !is_valid_email(email) {
        return Err(AppError::BadRequest("Invalid email.".into()));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required.".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}

pub fn make_jwt(settings: &Settings, user_id: &ObjectId) -> AppResult<String> {
    let exp = Duration::try_days(settings.jwt_ttl_days)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("token lifetime out of range: {} days", settings.jwt_ttl_days)))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_hex(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
}

pub fn auth_cookie(settings: &Settings, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.jwt_cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}

pub fn clear_auth_cookie(settings: &Settings) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.jwt_cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

pub async fn register_user(
    state: &AppState,
    email: &str,
    password: &str,
    display_name: Option<String>,
) -> AppResult<User> {
    let email = normalize_email(email);
    validate_credentials(&email, password)?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email has already been taken!".into()));
    }

    let password_hash = hash(password, state.settings.bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user = User {
        id: ObjectId::new(),
        email,
        display_name: display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        picture: None,
        email_notifications: true,
        password_hash,
        created_at: Utc::now().timestamp(),
    };

    match state.users.insert(&user).await {
        Ok(()) => {}
        // lost a race against another registration with the same email
        Err(AppError::Database(e)) if e.to_string().contains("E11000") => {
            return Err(AppError::Conflict("Email has already been taken!".into()));
        }
        Err(e) => return Err(e),
    }

    tracing::info!(user_id = %user.id, "registered user");
    Ok(user)
}

pub async fn login_user(state: &AppState, email: &str, password: &str) -> AppResult<User> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required.".into()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email.".into()));
    }
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required.".into()));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password.".into());

    let user = state.users.find_by_email(&email).await?.ok_or_else(invalid)?;

    if !verify(password, &user.password_hash).unwrap_or(false) {
        tracing::info!(user_id = %user.id, "failed login attempt");
        return Err(invalid());
    }

    Ok(user)
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    auth::{BearerUser, CookieUser},
    error::AppResult,
    extract::ApiJson,
    models::{User, UserProfile},
    services::auth_service,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

fn issue_session(state: &AppState, jar: CookieJar, user: User) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let token = auth_service::make_jwt(&state.settings, &user.id)?;
    let jar = jar.add(auth_service::auth_cookie(&state.settings, token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            access_token: token,
            user: user.into(),
        }),
    ))
}

// POST /auth/register
pub async fn post_register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<RegisterBody>,
) -> AppResult<impl IntoResponse> {
    let user = auth_service::register_user(&state, &body.email, &body.password, body.display_name).await?;
    let (jar, res) = issue_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, res))
}

// POST /auth/login
pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginBody>,
) -> AppResult<impl IntoResponse> {
    let user = auth_service::login_user(&state, &body.email, &body.password).await?;
    issue_session(&state, jar, user)
}

// GET /auth/profile
pub async fn get_profile(BearerUser(u): BearerUser) -> Json<UserProfile> {
    Json(u.into())
}

// GET /auth/session
pub async fn get_session(CookieUser(u): CookieUser) -> Json<UserProfile> {
    Json(u.into())
}

// POST /auth/logout
pub async fn post_logout(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    jar: CookieJar,
) -> impl IntoResponse {
    tracing::info!(user_id = %u.id, "signed out");

    let jar = jar.add(auth_service::clear_auth_cookie(&state.settings));
    (jar, Json(json!({ "message": "Signed out" })))
}

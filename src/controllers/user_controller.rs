use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    auth::BearerUser,
    error::AppResult,
    extract::ApiJson,
    models::UserProfile,
    services::user_service,
};

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserProfile,
}

// GET /user
pub async fn get_user(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
) -> AppResult<Json<UserProfile>> {
    let user = user_service::get_user(&state, u.id).await?;
    Ok(Json(user.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNameBody {
    pub display_name: String,
}

// PATCH /user/display-name
pub async fn patch_display_name(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    ApiJson(body): ApiJson<DisplayNameBody>,
) -> AppResult<Json<UserEnvelope>> {
    let user = user_service::update_display_name(&state, u.id, &body.display_name).await?;

    Ok(Json(UserEnvelope {
        message: "Display name updated successfully".into(),
        user: user.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct EmailNotificationsBody {
    pub enabled: bool,
}

// PATCH /user/email-notifications
pub async fn patch_email_notifications(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    ApiJson(body): ApiJson<EmailNotificationsBody>,
) -> AppResult<Json<UserEnvelope>> {
    let user = user_service::update_email_notifications(&state, u.id, body.enabled).await?;

    Ok(Json(UserEnvelope {
        message: "Email notification preference updated successfully".into(),
        user: user.into(),
    }))
}

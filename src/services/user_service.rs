use mongodb::bson::oid::ObjectId;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::User,
};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

pub async fn get_user(state: &AppState, user_id: ObjectId) -> AppResult<User> {
    state.users.find_by_id(user_id).await?.ok_or_else(user_not_found)
}

pub async fn update_display_name(state: &AppState, user_id: ObjectId, name: &str) -> AppResult<User> {
    tracing::info!(user_id = %user_id, "updating display name");

    let user = state
        .users
        .set_display_name(user_id, name)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %user_id, display_name = %name, "display name updated");
    Ok(user)
}

pub async fn update_email_notifications(state: &AppState, user_id: ObjectId, enabled: bool) -> AppResult<User> {
    tracing::info!(user_id = %user_id, enabled, "updating email notification preference");

    let user = state
        .users
        .set_email_notifications(user_id, enabled)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %user_id, enabled, "email notification preference updated");
    Ok(user)
}

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::BearerUser,
    error::AppResult,
    extract::{ApiJson, ApiQuery},
    models::{ChatMessageView, ChatRole},
    services::chat_service,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageBody {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

// GET /chat/messages
pub async fn get_messages(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> AppResult<Json<Vec<ChatMessageView>>> {
    let limit = chat_service::clamp_limit(q.limit);
    let messages = chat_service::list_messages(&state, u.id, q.session_id.as_deref(), limit).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

// POST /chat/messages
pub async fn post_message(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    ApiJson(body): ApiJson<NewMessageBody>,
) -> AppResult<(StatusCode, Json<ChatMessageView>)> {
    let msg = chat_service::append_message(&state, u.id, body.session_id, body.role, &body.content).await?;
    Ok((StatusCode::CREATED, Json(msg.into())))
}

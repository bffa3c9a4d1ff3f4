use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use mongodb::bson::doc;
use serde_json::json;

use crate::{AppState, error::AppError};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn health_db(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.run_command(doc! { "ping": 1 }, None).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "mongo": "ok" }))).into_response(),
        Err(e) => AppError::Database(e).into_response(),
    }
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Cannot find {}", uri.path()))
}

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    AppState,
    auth::BearerUser,
    error::{AppError, AppResult},
    extract::ApiJson,
    models::BenchmarkView,
    services::benchmark_service,
};

#[derive(Debug, Deserialize)]
pub struct BenchmarkBody {
    pub value: f64,
}

// GET /portfolio/benchmark
pub async fn get_benchmark(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
) -> AppResult<Json<BenchmarkView>> {
    let found = benchmark_service::get_benchmark(&state, u.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No benchmark recorded".into()))?;
    Ok(Json(found.into()))
}

// PUT /portfolio/benchmark
pub async fn put_benchmark(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    ApiJson(body): ApiJson<BenchmarkBody>,
) -> AppResult<Json<BenchmarkView>> {
    let saved = benchmark_service::set_benchmark(&state, u.id, body.value).await?;
    Ok(Json(saved.into()))
}

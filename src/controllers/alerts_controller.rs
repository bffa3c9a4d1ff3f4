use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::{
    AppState,
    auth::BearerUser,
    error::{AppError, AppResult},
    extract::ApiJson,
    models::{AlertCondition, PriceAlertView},
    services::alerts_service,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertBody {
    pub coin_id: String,
    pub condition: AlertCondition,
    pub target_price: f64,
}

// GET /alerts
pub async fn get_alerts(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
) -> AppResult<Json<Vec<PriceAlertView>>> {
    let alerts = alerts_service::list_user_alerts(&state, u.id).await?;
    Ok(Json(alerts.into_iter().map(Into::into).collect()))
}

// POST /alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    ApiJson(body): ApiJson<CreateAlertBody>,
) -> AppResult<(StatusCode, Json<PriceAlertView>)> {
    let alert =
        alerts_service::create_alert(&state, u.id, &body.coin_id, body.condition, body.target_price).await?;
    Ok((StatusCode::CREATED, Json(alert.into())))
}

// DELETE /alerts/:id
pub async fn delete_alert(
    State(state): State<AppState>,
    BearerUser(u): BearerUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let alert_id = ObjectId::parse_str(&id).map_err(|_| AppError::BadRequest("Invalid alert id".into()))?;
    alerts_service::delete_alert(&state, u.id, alert_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

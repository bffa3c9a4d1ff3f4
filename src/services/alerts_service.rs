use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
    options::FindOptions,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{AlertCondition, PriceAlert},
};

pub const COLLECTION: &str = "price_alerts";

/// Persistence seam for `price_alerts`.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// The user's alerts, newest first.
    async fn list_for_user(&self, user_id: ObjectId) -> AppResult<Vec<PriceAlert>>;

    async fn insert(&self, alert: &PriceAlert) -> AppResult<()>;

    /// Deletes the alert only if `user_id` owns it. Returns whether a row went away.
    async fn delete_owned(&self, user_id: ObjectId, alert_id: ObjectId) -> AppResult<bool>;

    async fn list_active(&self) -> AppResult<Vec<PriceAlert>>;

    /// Flips the alert to triggered if it is still active. Returns whether
    /// this call did the flip.
    async fn mark_triggered(&self, alert_id: ObjectId, price: f64, at: i64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct MongoAlertStore {
    db: Database,
}

impl MongoAlertStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn alerts(&self) -> mongodb::Collection<PriceAlert> {
        self.db.collection::<PriceAlert>(COLLECTION)
    }

    async fn collect(&self, filter: mongodb::bson::Document, opts: Option<FindOptions>) -> AppResult<Vec<PriceAlert>> {
        let mut cursor = self.alerts().find(filter, opts).await?;

        let mut items: Vec<PriceAlert> = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }
        Ok(items)
    }
}

#[async_trait]
impl AlertStore for MongoAlertStore {
    async fn list_for_user(&self, user_id: ObjectId) -> AppResult<Vec<PriceAlert>> {
        let find_opts = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": -1 })
            .build();
        self.collect(doc! { "user_id": user_id }, Some(find_opts)).await
    }

    async fn insert(&self, alert: &PriceAlert) -> AppResult<()> {
        self.alerts().insert_one(alert, None).await?;
        Ok(())
    }

    async fn delete_owned(&self, user_id: ObjectId, alert_id: ObjectId) -> AppResult<bool> {
        let res = self
            .alerts()
            .delete_one(doc! { "_id": alert_id, "user_id": user_id }, None)
            .await?;
        Ok(res.deleted_count > 0)
    }

    async fn list_active(&self) -> AppResult<Vec<PriceAlert>> {
        self.collect(doc! { "is_active": true }, None).await
    }

    async fn mark_triggered(&self, alert_id: ObjectId, price: f64, at: i64) -> AppResult<bool> {
        let res = self
            .alerts()
            .update_one(
                doc! { "_id": alert_id, "is_active": true },
                doc! { "$set": { "is_active": false, "triggered_price": price, "triggered_at": at } },
                None,
            )
            .await?;
        Ok(res.modified_count > 0)
    }
}

pub fn normalize_coin_id(coin_id: &str) -> String {
    coin_id.trim().to_lowercase()
}

pub fn validate_new_alert(coin_id: &str, target_price: f64) -> AppResult<()> {
    if coin_id.is_empty() {
        return Err(AppError::BadRequest("coinId is required.".into()));
    }
    if !target_price.is_finite() || target_price <= 0.0 {
        return Err(AppError::BadRequest("targetPrice must be bigger than zero.".into()));
    }
    Ok(())
}

pub async fn list_user_alerts(state: &AppState, user_id: ObjectId) -> AppResult<Vec<PriceAlert>> {
    state.alerts.list_for_user(user_id).await
}

pub async fn create_alert(
    state: &AppState,
    user_id: ObjectId,
    coin_id: &str,
    condition: AlertCondition,
    target_price: f64,
) -> AppResult<PriceAlert> {
    let coin_id = normalize_coin_id(coin_id);
    validate_new_alert(&coin_id, target_price)?;

    let alert = PriceAlert {
        id: ObjectId::new(),
        user_id,
        coin_id,
        condition,
        target_price,
        is_active: true,
        triggered_price: None,
        triggered_at: None,
        created_at: Utc::now().timestamp(),
    };

    state.alerts.insert(&alert).await?;

    tracing::info!(
        user_id = %user_id,
        coin = %alert.coin_id,
        condition = alert.condition.as_str(),
        target = alert.target_price,
        "price alert created"
    );

    Ok(alert)
}

/// Another user's alert id is reported the same as an unknown one.
pub async fn delete_alert(state: &AppState, user_id: ObjectId, alert_id: ObjectId) -> AppResult<()> {
    if !state.alerts.delete_owned(user_id, alert_id).await? {
        return Err(AppError::NotFound("Alert not found".into()));
    }

    tracing::debug!(user_id = %user_id, alert_id = %alert_id, "price alert deleted");
    Ok(())
}

/// Flips an active alert to triggered. Returns false if it was already
/// triggered (or removed) by the time we got to it.
pub async fn mark_triggered(state: &AppState, alert_id: ObjectId, price: f64) -> AppResult<bool> {
    state
        .alerts
        .mark_triggered(alert_id, price, Utc::now().timestamp())
        .await
}

pub async fn list_active_alerts(state: &AppState) -> AppResult<Vec<PriceAlert>> {
    state.alerts.list_active().await
}

use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    Database,
    bson::{doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::PortfolioBenchmark,
};

pub const COLLECTION: &str = "portfolio_benchmarks";

/// Persistence seam for `portfolio_benchmarks`.
#[async_trait]
pub trait BenchmarkStore: Send + Sync {
    async fn find(&self, user_id: ObjectId) -> AppResult<Option<PortfolioBenchmark>>;

    /// Insert-or-replace keyed by user id. Returns the stored row.
    async fn upsert(&self, user_id: ObjectId, value: f64, at: i64) -> AppResult<PortfolioBenchmark>;
}

#[derive(Clone)]
pub struct MongoBenchmarkStore {
    db: Database,
}

impl MongoBenchmarkStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn benchmarks(&self) -> mongodb::Collection<PortfolioBenchmark> {
        self.db.collection::<PortfolioBenchmark>(COLLECTION)
    }
}

#[async_trait]
impl BenchmarkStore for MongoBenchmarkStore {
    async fn find(&self, user_id: ObjectId) -> AppResult<Option<PortfolioBenchmark>> {
        Ok(self.benchmarks().find_one(doc! { "user_id": user_id }, None).await?)
    }

    // with the unique index on user_id this keeps one row per user
    async fn upsert(&self, user_id: ObjectId, value: f64, at: i64) -> AppResult<PortfolioBenchmark> {
        let opts = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        self.benchmarks()
            .find_one_and_update(
                doc! { "user_id": user_id },
                doc! { "$set": { "value": value, "updated_at": at } },
                opts,
            )
            .await?
            .ok_or_else(|| AppError::Internal("benchmark upsert returned nothing".into()))
    }
}

pub async fn get_benchmark(state: &AppState, user_id: ObjectId) -> AppResult<Option<PortfolioBenchmark>> {
    state.benchmarks.find(user_id).await
}

pub async fn set_benchmark(state: &AppState, user_id: ObjectId, value: f64) -> AppResult<PortfolioBenchmark> {
    if !value.is_finite() {
        return Err(AppError::BadRequest("value must be a finite number.".into()));
    }

    let saved = state
        .benchmarks
        .upsert(user_id, value, Utc::now().timestamp())
        .await?;

    tracing::debug!(user_id = %user_id, value, "portfolio benchmark updated");
    Ok(saved)
}

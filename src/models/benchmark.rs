use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

// one row per user, enforced by a unique index on user_id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioBenchmark {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub value: f64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkView {
    pub value: f64,
    pub updated_at: i64,
}

impl From<PortfolioBenchmark> for BenchmarkView {
    fn from(b: PortfolioBenchmark) -> Self {
        Self {
            value: b.value,
            updated_at: b.updated_at,
        }
    }
}

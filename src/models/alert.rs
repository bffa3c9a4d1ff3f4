use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AlertCondition {
    /// Whether `price` crosses `target` in this direction. Touching the target counts.
    pub fn is_met(self, price: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => price >= target,
            AlertCondition::Below => price <= target,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    // asset id as known by the price feed, e.g. "bitcoin"
    pub coin_id: String,

    pub condition: AlertCondition,
    pub target_price: f64,

    pub is_active: bool,
    #[serde(default)]
    pub triggered_price: Option<f64>,
    #[serde(default)]
    pub triggered_at: Option<i64>,

    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlertView {
    pub id: String,
    pub coin_id: String,
    pub condition: AlertCondition,
    pub target_price: f64,
    pub is_active: bool,
    pub triggered_price: Option<f64>,
    pub triggered_at: Option<i64>,
    pub created_at: i64,
}

impl From<PriceAlert> for PriceAlertView {
    fn from(a: PriceAlert) -> Self {
        Self {
            id: a.id.to_hex(),
            coin_id: a.coin_id,
            condition: a.condition,
            target_price: a.target_price,
            is_active: a.is_active,
            triggered_price: a.triggered_price,
            triggered_at: a.triggered_at,
            created_at: a.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_fires_at_or_over_target() {
        assert!(AlertCondition::Above.is_met(100.0, 100.0));
        assert!(AlertCondition::Above.is_met(100.5, 100.0));
        assert!(!AlertCondition::Above.is_met(99.99, 100.0));
    }

    #[test]
    fn below_fires_at_or_under_target() {
        assert!(AlertCondition::Below.is_met(100.0, 100.0));
        assert!(AlertCondition::Below.is_met(42.0, 100.0));
        assert!(!AlertCondition::Below.is_met(100.01, 100.0));
    }

    #[test]
    fn condition_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AlertCondition::Above).unwrap(), "\"above\"");
        let c: AlertCondition = serde_json::from_str("\"below\"").unwrap();
        assert_eq!(c, AlertCondition::Below);
    }
}

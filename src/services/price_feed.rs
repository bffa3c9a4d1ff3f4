use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, AppResult};

/// Where the alert monitor gets its quotes from.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// USD prices for the given coin ids. Ids the source doesn't know are
    /// absent from the result.
    async fn usd_prices(&self, coin_ids: &[String]) -> AppResult<HashMap<String, f64>>;
}

/// Spot price client for a CoinGecko-compatible API.
#[derive(Clone)]
pub struct PriceFeed {
    http: Client,
    base_url: String,
}

// {"bitcoin": {"usd": 65000.0}, "ethereum": {"usd": 3200.5}}
type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

impl PriceFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for PriceFeed {
    async fn usd_prices(&self, coin_ids: &[String]) -> AppResult<HashMap<String, f64>> {
        if coin_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/simple/price", self.base_url);
        let ids = coin_ids.join(",");

        let res = self
            .http
            .get(&url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("price request failed: {status} {body}")));
        }

        let body = res
            .json::<SimplePriceResponse>()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        Ok(extract_usd(body))
    }
}

fn extract_usd(body: SimplePriceResponse) -> HashMap<String, f64> {
    body.into_iter()
        .filter_map(|(id, quotes)| quotes.get("usd").copied().map(|p| (id, p)))
        .collect()
}

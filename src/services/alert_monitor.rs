use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use mongodb::bson::oid::ObjectId;
use tokio::time;

use crate::{
    AppState,
    error::AppResult,
    format::format_price,
    models::PriceAlert,
    services::alerts_service,
};

pub fn spawn_price_alert_monitor(state: AppState) -> tokio::task::JoinHandle<()> {
    let every = Duration::from_secs(state.settings.alert_interval_secs);

    tokio::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if let Err(e) = run_tick(&state).await {
                tracing::warn!(error = %e, "alert monitor tick failed");
            }
        }
    })
}

/// Alerts whose condition holds at the current prices, paired with that price.
/// Alerts for coins without a usable quote are skipped.
pub fn due_alerts<'a>(alerts: &'a [PriceAlert], prices: &HashMap<String, f64>) -> Vec<(&'a PriceAlert, f64)> {
    alerts
        .iter()
        .filter(|a| a.is_active)
        .filter_map(|a| {
            let price = *prices.get(&a.coin_id)?;
            if !price.is_finite() || price <= 0.0 {
                return None;
            }
            a.condition.is_met(price, a.target_price).then_some((a, price))
        })
        .collect()
}

/// One evaluation pass over the active alerts. Returns how many alerts this
/// pass flipped to triggered.
pub async fn run_tick(state: &AppState) -> AppResult<usize> {
    let alerts = alerts_service::list_active_alerts(state).await?;
    if alerts.is_empty() {
        return Ok(0);
    }

    let coin_ids: Vec<String> = alerts
        .iter()
        .map(|a| a.coin_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let prices = state.prices.usd_prices(&coin_ids).await?;

    let due: Vec<(ObjectId, String, f64, f64)> = due_alerts(&alerts, &prices)
        .into_iter()
        .map(|(a, p)| (a.id, a.coin_id.clone(), a.target_price, p))
        .collect();

    let mut triggered = 0;
    for (id, coin, target, price) in due {
        match alerts_service::mark_triggered(state, id, price).await {
            Ok(true) => {
                triggered += 1;
                tracing::info!(
                    alert_id = %id,
                    coin = %coin,
                    target = %format_price(target),
                    price = %format_price(price),
                    "price alert triggered"
                );
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(alert_id = %id, error = %e, "failed to mark alert triggered"),
        }
    }

    Ok(triggered)
}

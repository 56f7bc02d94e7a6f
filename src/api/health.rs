use axum::extract::State;
use axum::Json;

use super::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once the ledger is loaded; also reports whether BTC prices have
/// been fetched at least once.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let rates = state.rates.rates().await;
    Json(serde_json::json!({
        "status": "ready",
        "ratesLoaded": rates.btc_usd.is_positive(),
    }))
}

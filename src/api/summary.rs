use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::engine::Summary;
use crate::rates::RateSnapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: Summary,
    pub rates: RateSnapshot,
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let rates = state.rates.snapshot().await;
    let summary = state.ledger.summary(&rates.rates, rates.reduction).await;
    Json(SummaryResponse { summary, rates })
}

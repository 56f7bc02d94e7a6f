use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::engine::{miner_cards, MinerCard};

#[derive(Debug, Serialize)]
pub struct MinersResponse {
    pub miners: Vec<MinerCard>,
}

/// Miner cards: current attributes plus total cost including upgrades.
pub async fn get_miners(State(state): State<AppState>) -> Json<MinersResponse> {
    let rows = state.ledger.rows().await;
    Json(MinersResponse {
        miners: miner_cards(&rows.miners, &rows.investments),
    })
}

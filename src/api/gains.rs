use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::{AppState, ConfirmQuery};
use crate::domain::{Gain, GainInput};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct GainsResponse {
    pub gains: Vec<Gain>,
}

pub async fn list_gains(State(state): State<AppState>) -> Json<GainsResponse> {
    Json(GainsResponse {
        gains: state.ledger.rows().await.gains,
    })
}

/// Record a harvest, valued at the current rates.
pub async fn create_gain(
    State(state): State<AppState>,
    Json(input): Json<GainInput>,
) -> Result<(StatusCode, Json<Gain>), AppError> {
    let rates = state.rates.rates().await;
    let gain = state.ledger.add_gain(input, &rates).await?;
    Ok((StatusCode::CREATED, Json(gain)))
}

pub async fn update_gain(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(input): Json<GainInput>,
) -> Result<Json<Gain>, AppError> {
    let rates = state.rates.rates().await;
    let gain = state.ledger.update_gain(id, input, &rates).await?;
    Ok(Json(gain))
}

pub async fn delete_gain(
    Path(id): Path<i64>,
    Query(confirm): Query<ConfirmQuery>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    confirm.require("Deleting a gain")?;
    state.ledger.delete_gain(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

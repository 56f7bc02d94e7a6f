use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Decimal, RateSet};
use crate::error::AppError;
use crate::rates::RateSnapshot;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    #[serde(flatten)]
    pub snapshot: RateSnapshot,
    /// BTC in EUR through the USD cross rate, for comparison with the quoted price.
    pub btc_eur_cross: Decimal,
    pub reduction_percent: Decimal,
}

impl From<RateSnapshot> for RatesResponse {
    fn from(snapshot: RateSnapshot) -> Self {
        Self {
            btc_eur_cross: snapshot.rates.btc_eur_cross(),
            reduction_percent: snapshot.reduction * Decimal::hundred(),
            snapshot,
        }
    }
}

/// Operator-typed number: either a JSON number or text such as "5,25".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    fn as_text(&self) -> String {
        match self {
            RawNumber::Number(n) => n.to_string(),
            RawNumber::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenPriceRequest {
    pub price: RawNumber,
}

#[derive(Debug, Deserialize)]
pub struct ReductionRequest {
    pub percent: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    /// False when the input was rejected and the previous value kept.
    pub applied: bool,
    #[serde(flatten)]
    pub rates: RatesResponse,
}

pub async fn get_rates(State(state): State<AppState>) -> Json<RatesResponse> {
    Json(state.rates.snapshot().await.into())
}

/// Fetch BTC prices now. A provider failure is reported, the last known
/// rates are kept.
pub async fn refresh_rates(State(state): State<AppState>) -> Result<Json<RateSet>, AppError> {
    let rates = state.rates.refresh(state.provider.as_ref()).await?;
    Ok(Json(rates))
}

pub async fn set_token_price(
    State(state): State<AppState>,
    Json(request): Json<TokenPriceRequest>,
) -> Result<Json<SettingResponse>, AppError> {
    let applied = state
        .rates
        .set_manual_token_price(&request.price.as_text())
        .await?;
    Ok(Json(SettingResponse {
        applied,
        rates: state.rates.snapshot().await.into(),
    }))
}

pub async fn clear_token_price(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.rates.clear_manual_token_price().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_reduction(
    State(state): State<AppState>,
    Json(request): Json<ReductionRequest>,
) -> Result<Json<SettingResponse>, AppError> {
    let applied = state.rates.set_reduction_percent(request.percent).await?;
    Ok(Json(SettingResponse {
        applied,
        rates: state.rates.snapshot().await.into(),
    }))
}

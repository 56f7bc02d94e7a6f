use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{AppState, ConfirmQuery};
use crate::domain::Investment;
use crate::error::AppError;
use crate::ledger::{InvestmentEdit, InvestmentFilter, NewInvestment};

#[derive(Debug, Deserialize)]
pub struct InvestmentsQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvestmentsResponse {
    pub investments: Vec<Investment>,
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteInvestmentResponse {
    pub deleted_miners: Vec<i64>,
    pub deleted_investments: Vec<i64>,
}

impl InvestmentsQuery {
    fn to_filter(&self) -> Result<InvestmentFilter, AppError> {
        let year = match self.year.as_deref() {
            Some("") | None => None,
            Some(y) => Some(
                y.parse::<i32>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid year: {}", y)))?,
            ),
        };
        let month = match self.month.as_deref() {
            Some("") | None => None,
            Some(m) => match m.parse::<u32>() {
                Ok(m) if (1..=12).contains(&m) => Some(m),
                _ => return Err(AppError::BadRequest(format!("Invalid month: {}", m))),
            },
        };
        Ok(InvestmentFilter { year, month })
    }
}

pub async fn list_investments(
    Query(params): Query<InvestmentsQuery>,
    State(state): State<AppState>,
) -> Result<Json<InvestmentsResponse>, AppError> {
    let filter = params.to_filter()?;
    let (investments, years) = state.ledger.investments(&filter).await;
    Ok(Json(InvestmentsResponse { investments, years }))
}

pub async fn create_investment(
    State(state): State<AppState>,
    Json(request): Json<NewInvestment>,
) -> Result<(StatusCode, Json<Investment>), AppError> {
    let investment = state.ledger.create_investment(request).await?;
    Ok((StatusCode::CREATED, Json(investment)))
}

pub async fn update_investment(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(edit): Json<InvestmentEdit>,
) -> Result<Json<Investment>, AppError> {
    let investment = state.ledger.update_investment(id, edit).await?;
    Ok(Json(investment))
}

pub async fn delete_investment(
    Path(id): Path<i64>,
    Query(confirm): Query<ConfirmQuery>,
    State(state): State<AppState>,
) -> Result<Json<DeleteInvestmentResponse>, AppError> {
    confirm.require("Deleting an investment")?;
    let removed = state.ledger.delete_investment(id).await?;
    Ok(Json(DeleteInvestmentResponse {
        deleted_miners: removed.miners,
        deleted_investments: removed.investments,
    }))
}

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::{AppState, ConfirmQuery};
use crate::domain::{Sale, SaleInput};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub sales: Vec<Sale>,
}

pub async fn list_sales(State(state): State<AppState>) -> Json<SalesResponse> {
    Json(SalesResponse {
        sales: state.ledger.rows().await.sales,
    })
}

pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<SaleInput>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    let sale = state.ledger.add_sale(input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update_sale(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(input): Json<SaleInput>,
) -> Result<Json<Sale>, AppError> {
    Ok(Json(state.ledger.update_sale(id, input).await?))
}

pub async fn delete_sale(
    Path(id): Path<i64>,
    Query(confirm): Query<ConfirmQuery>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    confirm.require("Deleting a sale")?;
    state.ledger.delete_sale(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

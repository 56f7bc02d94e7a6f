use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::{AppState, ConfirmQuery};
use crate::domain::LedgerRows;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

/// The whole ledger as `{miners, investissements, gains, ventes}`.
pub async fn export(State(state): State<AppState>) -> Json<LedgerRows> {
    Json(state.ledger.rows().await)
}

/// Overwrite the ledger with a previously exported document.
///
/// The body is taken as raw JSON so a document missing a collection is
/// reported with the collection name instead of a generic decode error.
pub async fn import(
    Query(confirm): Query<ConfirmQuery>,
    State(state): State<AppState>,
    Json(document): Json<serde_json::Value>,
) -> Result<Json<ImportResponse>, AppError> {
    confirm.require("Import")?;
    let imported = state.ledger.import(&document).await?;
    Ok(Json(ImportResponse { imported }))
}

pub async fn purge(
    Query(confirm): Query<ConfirmQuery>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    confirm.require("Purge")?;
    state.ledger.purge().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub mod data;
pub mod gains;
pub mod health;
pub mod investments;
pub mod miners;
pub mod rates;
pub mod sales;
pub mod summary;

use crate::error::AppError;
use crate::ledger::LedgerService;
use crate::rates::{RateBook, RateProvider};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub rates: Arc<RateBook>,
    pub provider: Arc<dyn RateProvider>,
}

impl AppState {
    pub fn new(
        ledger: Arc<LedgerService>,
        rates: Arc<RateBook>,
        provider: Arc<dyn RateProvider>,
    ) -> Self {
        Self {
            ledger,
            rates,
            provider,
        }
    }
}

/// `?confirm=true`, required by every destructive endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl ConfirmQuery {
    pub fn require(&self, action: &str) -> Result<(), AppError> {
        if self.confirm {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "{} requires confirm=true",
                action
            )))
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/summary", get(summary::get_summary))
        .route("/v1/miners", get(miners::get_miners))
        .route(
            "/v1/investments",
            get(investments::list_investments).post(investments::create_investment),
        )
        .route(
            "/v1/investments/:id",
            put(investments::update_investment).delete(investments::delete_investment),
        )
        .route("/v1/gains", get(gains::list_gains).post(gains::create_gain))
        .route(
            "/v1/gains/:id",
            put(gains::update_gain).delete(gains::delete_gain),
        )
        .route("/v1/sales", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/v1/sales/:id",
            put(sales::update_sale).delete(sales::delete_sale),
        )
        .route("/v1/rates", get(rates::get_rates))
        .route("/v1/rates/refresh", post(rates::refresh_rates))
        .route(
            "/v1/rates/token",
            put(rates::set_token_price).delete(rates::clear_token_price),
        )
        .route("/v1/settings/reduction", put(rates::set_reduction))
        .route("/v1/export", get(data::export))
        .route("/v1/import", post(data::import))
        .route("/v1/data", delete(data::purge))
        .layer(cors)
        .with_state(state)
}

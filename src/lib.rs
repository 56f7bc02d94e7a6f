pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod rates;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Decimal, Gain, Investment, InvestmentCategory, LedgerDate, LedgerRows, Miner, RateSet, Sale,
};
pub use engine::{compute_summary, LedgerView, Summary};
pub use error::AppError;
pub use ledger::{LedgerError, LedgerService};
pub use rates::{CoinGeckoRateProvider, MockRateProvider, RateBook, RateError, RateProvider};

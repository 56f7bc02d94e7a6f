//! Domain types for the mining ledger.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - LedgerDate with legacy-format parsing
//! - The four ledger records: Miner, Investment, Gain, Sale
//! - RateSet, the exchange rates the metrics engine prices against

pub mod decimal;
pub mod gain;
pub mod investment;
pub mod miner;
pub mod primitives;
pub mod rates;
pub mod rows;
pub mod sale;

pub use decimal::Decimal;
pub use gain::{sats_to_fiat, Gain, GainInput, SATS_PER_BTC};
pub use investment::{CategoryParseError, Investment, InvestmentCategory};
pub use miner::{Miner, NewMiner};
pub use primitives::{DateParseError, LedgerDate};
pub use rates::RateSet;
pub use rows::LedgerRows;
pub use sale::{Sale, SaleInput};

//! Ledger service: the in-memory snapshot of the four collections, mirrored to
//! the store on every mutation.
//!
//! Every mutation holds the snapshot lock across its store round trip, so
//! mutations are applied one at a time and the snapshot never diverges from
//! what was committed.

pub mod filter;
pub mod transfer;

use crate::db::Repository;
use crate::domain::{
    Decimal, Gain, GainInput, Investment, InvestmentCategory, LedgerDate, LedgerRows, Miner,
    NewMiner, RateSet, Sale, SaleInput,
};
use crate::engine::{compute_summary, LedgerView, Summary};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

pub use filter::{investment_years, InvestmentFilter};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0} {1} not found")]
    NotFound(&'static str, i64),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("creation investments cannot be edited; delete the miner instead")]
    CreationImmutable,
    #[error("incompatible or incomplete file: {0}")]
    Import(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// A new investment, by what it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "target", rename_all = "camelCase")]
pub enum NewInvestment {
    /// Acquire a new miner; its creation investment is recorded with it.
    #[serde(rename_all = "camelCase")]
    NewMiner {
        date: LedgerDate,
        power: Decimal,
        eff: Decimal,
        cost: Decimal,
    },
    /// Upgrade an existing miner's capacity or efficiency.
    #[serde(rename_all = "camelCase")]
    Upgrade {
        date: LedgerDate,
        miner_id: i64,
        cat: InvestmentCategory,
        qty: Decimal,
        cost: Decimal,
    },
    /// Buy maintenance tokens.
    #[serde(rename_all = "camelCase")]
    Token {
        date: LedgerDate,
        qty: Decimal,
        cost: Decimal,
    },
}

/// Replacement values for an existing investment.
///
/// `cat` only applies to upgrades (switching between capacity and
/// efficiency); when absent the current category is kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InvestmentEdit {
    pub date: LedgerDate,
    #[serde(default)]
    pub cat: Option<InvestmentCategory>,
    pub qty: Decimal,
    pub cost: Decimal,
}

/// What a deletion removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Removed {
    pub miners: Vec<i64>,
    pub investments: Vec<i64>,
}

pub struct LedgerService {
    repo: Arc<Repository>,
    rows: Mutex<LedgerRows>,
}

impl LedgerService {
    /// Build the service from the current store contents.
    pub async fn load(repo: Arc<Repository>) -> Result<Self, sqlx::Error> {
        let rows = repo.load_all().await?;
        info!(
            miners = rows.miners.len(),
            investments = rows.investments.len(),
            gains = rows.gains.len(),
            sales = rows.sales.len(),
            "Ledger loaded"
        );
        Ok(Self {
            repo,
            rows: Mutex::new(rows),
        })
    }

    /// Copy of the whole ledger (also the export document).
    pub async fn rows(&self) -> LedgerRows {
        self.rows.lock().await.clone()
    }

    /// Compute every aggregate for the current ledger.
    pub async fn summary(&self, rates: &RateSet, reduction: Decimal) -> Summary {
        let rows = self.rows.lock().await;
        compute_summary(
            LedgerView {
                miners: &rows.miners,
                investments: &rows.investments,
                gains: &rows.gains,
                sales: &rows.sales,
            },
            rates,
            reduction,
        )
    }

    pub async fn investments(&self, filter: &InvestmentFilter) -> (Vec<Investment>, Vec<i32>) {
        let rows = self.rows.lock().await;
        (
            filter.apply(&rows.investments),
            investment_years(&rows.investments),
        )
    }

    // =========================================================================
    // Investments (and miners through them)
    // =========================================================================

    pub async fn create_investment(&self, request: NewInvestment) -> Result<Investment, LedgerError> {
        let mut rows = self.rows.lock().await;

        match request {
            NewInvestment::NewMiner {
                date,
                power,
                eff,
                cost,
            } => {
                ensure_amounts(&[("power", power), ("eff", eff), ("cost", cost)])?;
                let (miner, creation) = self
                    .repo
                    .create_miner(&NewMiner {
                        power,
                        eff,
                        cost,
                        date,
                    })
                    .await?;
                info!(miner_id = miner.id, power = %miner.power, "Miner created");
                rows.miners.push(miner);
                rows.investments.push(creation.clone());
                Ok(creation)
            }
            NewInvestment::Upgrade {
                date,
                miner_id,
                cat,
                qty,
                cost,
            } => {
                ensure_upgrade(cat)?;
                ensure_amounts(&[("qty", qty), ("cost", cost)])?;
                let idx = miner_index(&rows, miner_id)?;

                let mut miner = rows.miners[idx].clone();
                miner.apply_investment(cat, qty);
                ensure_power_bound(&miner)?;
                let mut investment = Investment {
                    id: 0,
                    date,
                    miner_id: Some(miner_id),
                    cat,
                    qty,
                    cost,
                };
                investment.id = self.repo.save_upgrade(&investment, &miner).await?;

                rows.miners[idx] = miner;
                rows.investments.push(investment.clone());
                Ok(investment)
            }
            NewInvestment::Token { date, qty, cost } => {
                ensure_amounts(&[("qty", qty), ("cost", cost)])?;
                let mut investment = Investment {
                    id: 0,
                    date,
                    miner_id: None,
                    cat: InvestmentCategory::TokenPurchase,
                    qty,
                    cost,
                };
                investment.id = self.repo.insert_investment(&investment).await?;
                rows.investments.push(investment.clone());
                Ok(investment)
            }
        }
    }

    /// Edit an investment.
    ///
    /// For upgrades the old effect on the miner is reverted before the new one
    /// is applied, so repeated edits never accumulate drift.
    pub async fn update_investment(
        &self,
        id: i64,
        edit: InvestmentEdit,
    ) -> Result<Investment, LedgerError> {
        ensure_amounts(&[("qty", edit.qty), ("cost", edit.cost)])?;
        let mut rows = self.rows.lock().await;
        let inv_idx = investment_index(&rows, id)?;
        let current = rows.investments[inv_idx].clone();

        match current.cat {
            InvestmentCategory::Creation => Err(LedgerError::CreationImmutable),
            InvestmentCategory::TokenPurchase => {
                let updated = Investment {
                    date: edit.date,
                    qty: edit.qty,
                    cost: edit.cost,
                    ..current
                };
                self.repo.update_investment(&updated).await?;
                rows.investments[inv_idx] = updated.clone();
                Ok(updated)
            }
            InvestmentCategory::Capacity | InvestmentCategory::Efficiency => {
                let cat = edit.cat.unwrap_or(current.cat);
                ensure_upgrade(cat)?;
                let miner_id = current
                    .miner_id
                    .ok_or_else(|| LedgerError::Invalid(format!("investment {} has no miner", id)))?;
                let miner_idx = miner_index(&rows, miner_id)?;

                let mut miner = rows.miners[miner_idx].clone();
                miner.revert_investment(current.cat, current.qty);
                miner.apply_investment(cat, edit.qty);
                ensure_power_bound(&miner)?;

                let updated = Investment {
                    date: edit.date,
                    cat,
                    qty: edit.qty,
                    cost: edit.cost,
                    ..current
                };
                self.repo.save_upgrade(&updated, &miner).await?;

                rows.miners[miner_idx] = miner;
                rows.investments[inv_idx] = updated.clone();
                Ok(updated)
            }
        }
    }

    /// Delete an investment.
    ///
    /// Deleting a creation investment deletes its miner and every investment
    /// attached to it. Deleting an upgrade reverts its effect on the miner.
    pub async fn delete_investment(&self, id: i64) -> Result<Removed, LedgerError> {
        let mut rows = self.rows.lock().await;
        let inv_idx = investment_index(&rows, id)?;
        let investment = rows.investments[inv_idx].clone();

        match (investment.cat, investment.miner_id) {
            (InvestmentCategory::Creation, Some(miner_id)) => {
                self.repo.delete_miner_cascade(miner_id).await?;

                let removed = Removed {
                    miners: vec![miner_id],
                    investments: rows
                        .investments
                        .iter()
                        .filter(|i| i.belongs_to(miner_id))
                        .map(|i| i.id)
                        .collect(),
                };
                rows.miners.retain(|m| m.id != miner_id);
                rows.investments.retain(|i| !i.belongs_to(miner_id));
                info!(miner_id, investments = removed.investments.len(), "Miner deleted");
                Ok(removed)
            }
            (cat, Some(miner_id)) if cat.is_upgrade() => {
                match rows.miners.iter().position(|m| m.id == miner_id) {
                    Some(miner_idx) => {
                        let mut miner = rows.miners[miner_idx].clone();
                        miner.revert_investment(cat, investment.qty);
                        self.repo.delete_upgrade(id, &miner).await?;
                        rows.miners[miner_idx] = miner;
                    }
                    None => {
                        self.repo.delete_investment(id).await?;
                    }
                }
                rows.investments.remove(inv_idx);
                Ok(Removed {
                    miners: Vec::new(),
                    investments: vec![id],
                })
            }
            _ => {
                self.repo.delete_investment(id).await?;
                rows.investments.remove(inv_idx);
                Ok(Removed {
                    miners: Vec::new(),
                    investments: vec![id],
                })
            }
        }
    }

    // =========================================================================
    // Gains
    // =========================================================================

    /// Record a harvest, pricing it at `rates`.
    pub async fn add_gain(&self, input: GainInput, rates: &RateSet) -> Result<Gain, LedgerError> {
        ensure_gain(&input)?;
        let mut rows = self.rows.lock().await;
        let mut gain = Gain::priced(0, input, rates);
        gain.id = self.repo.insert_gain(&gain).await?;
        rows.gains.push(gain.clone());
        Ok(gain)
    }

    /// Replace a harvest; its fiat values are re-priced at `rates`.
    pub async fn update_gain(
        &self,
        id: i64,
        input: GainInput,
        rates: &RateSet,
    ) -> Result<Gain, LedgerError> {
        ensure_gain(&input)?;
        let mut rows = self.rows.lock().await;
        let idx = rows
            .gains
            .iter()
            .position(|g| g.id == id)
            .ok_or(LedgerError::NotFound("gain", id))?;

        let gain = Gain::priced(id, input, rates);
        self.repo.update_gain(&gain).await?;
        rows.gains[idx] = gain.clone();
        Ok(gain)
    }

    pub async fn delete_gain(&self, id: i64) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().await;
        if !rows.gains.iter().any(|g| g.id == id) {
            return Err(LedgerError::NotFound("gain", id));
        }
        self.repo.delete_gain(id).await?;
        rows.gains.retain(|g| g.id != id);
        Ok(())
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub async fn add_sale(&self, input: SaleInput) -> Result<Sale, LedgerError> {
        ensure_sale(&input)?;
        let mut rows = self.rows.lock().await;
        let mut sale = Sale::from_input(0, input);
        sale.id = self.repo.insert_sale(&sale).await?;
        rows.sales.push(sale.clone());
        Ok(sale)
    }

    pub async fn update_sale(&self, id: i64, input: SaleInput) -> Result<Sale, LedgerError> {
        ensure_sale(&input)?;
        let mut rows = self.rows.lock().await;
        let idx = rows
            .sales
            .iter()
            .position(|s| s.id == id)
            .ok_or(LedgerError::NotFound("sale", id))?;

        let sale = Sale::from_input(id, input);
        self.repo.update_sale(&sale).await?;
        rows.sales[idx] = sale.clone();
        Ok(sale)
    }

    pub async fn delete_sale(&self, id: i64) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().await;
        if !rows.sales.iter().any(|s| s.id == id) {
            return Err(LedgerError::NotFound("sale", id));
        }
        self.repo.delete_sale(id).await?;
        rows.sales.retain(|s| s.id != id);
        Ok(())
    }

    // =========================================================================
    // Whole-ledger operations
    // =========================================================================

    /// Delete every ledger row. Settings are kept.
    pub async fn purge(&self) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().await;
        self.repo.clear_all().await?;
        *rows = LedgerRows::default();
        info!("Ledger purged");
        Ok(())
    }

    /// Overwrite the ledger with an exported document.
    ///
    /// The document is fully validated before anything is written; on success
    /// the snapshot is reloaded from the store. Returns the number of rows
    /// imported.
    pub async fn import(&self, document: &serde_json::Value) -> Result<usize, LedgerError> {
        let incoming = transfer::parse_document(document).map_err(LedgerError::Import)?;

        let mut rows = self.rows.lock().await;
        self.repo.replace_all(&incoming).await?;
        *rows = self.repo.load_all().await?;

        let count = rows.row_count();
        info!(rows = count, "Ledger imported");
        Ok(count)
    }
}

fn miner_index(rows: &LedgerRows, miner_id: i64) -> Result<usize, LedgerError> {
    rows.miners
        .iter()
        .position(|m| m.id == miner_id)
        .ok_or(LedgerError::NotFound("miner", miner_id))
}

fn investment_index(rows: &LedgerRows, id: i64) -> Result<usize, LedgerError> {
    rows.investments
        .iter()
        .position(|i| i.id == id)
        .ok_or(LedgerError::NotFound("investment", id))
}

fn ensure_upgrade(cat: InvestmentCategory) -> Result<(), LedgerError> {
    if cat.is_upgrade() {
        Ok(())
    } else {
        Err(LedgerError::Invalid(format!(
            "category {} cannot upgrade a miner",
            cat
        )))
    }
}

/// Largest amount, quantity or price accepted on input.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;
/// Largest satoshi count accepted on input: the whole bitcoin supply.
pub const MAX_SATS: i64 = 2_100_000_000_000_000;

/// Check that `value` lies in `[0, MAX_AMOUNT]`.
pub(crate) fn check_amount(name: &str, value: Decimal) -> Result<(), String> {
    if value < Decimal::zero() {
        Err(format!("{} must be >= 0, got {}", name, value))
    } else if value > Decimal::from(MAX_AMOUNT) {
        Err(format!("{} must be <= {}, got {}", name, MAX_AMOUNT, value))
    } else {
        Ok(())
    }
}

/// Check that `sats` lies in `[0, MAX_SATS]`.
pub(crate) fn check_sats(sats: i64) -> Result<(), String> {
    if (0..=MAX_SATS).contains(&sats) {
        Ok(())
    } else {
        Err(format!("sats must be between 0 and {}, got {}", MAX_SATS, sats))
    }
}

fn ensure_amounts(values: &[(&str, Decimal)]) -> Result<(), LedgerError> {
    values
        .iter()
        .try_for_each(|(name, v)| check_amount(name, *v))
        .map_err(LedgerError::Invalid)
}

fn ensure_power_bound(miner: &Miner) -> Result<(), LedgerError> {
    if miner.power > Decimal::from(MAX_AMOUNT) {
        return Err(LedgerError::Invalid(format!(
            "miner {} power would exceed {}",
            miner.id, MAX_AMOUNT
        )));
    }
    Ok(())
}

fn ensure_gain(input: &GainInput) -> Result<(), LedgerError> {
    check_sats(input.sats).map_err(LedgerError::Invalid)?;
    ensure_amounts(&[("service", input.service), ("elec", input.elec)])
}

fn ensure_sale(input: &SaleInput) -> Result<(), LedgerError> {
    check_sats(input.sats).map_err(LedgerError::Invalid)?;
    ensure_amounts(&[("montant", input.montant)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn date() -> LedgerDate {
        LedgerDate::from_ymd(2024, 9, 1).unwrap()
    }

    async fn setup() -> (LedgerService, Arc<Repository>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        let repo = Arc::new(Repository::new(pool));
        let service = LedgerService::load(repo.clone()).await.unwrap();
        (service, repo, temp_dir)
    }

    async fn new_miner(service: &LedgerService, power: &str, eff: &str) -> Investment {
        service
            .create_investment(NewInvestment::NewMiner {
                date: date(),
                power: d(power),
                eff: d(eff),
                cost: d("1000"),
            })
            .await
            .unwrap()
    }

    async fn upgrade(
        service: &LedgerService,
        miner_id: i64,
        cat: InvestmentCategory,
        qty: &str,
    ) -> Investment {
        service
            .create_investment(NewInvestment::Upgrade {
                date: date(),
                miner_id,
                cat,
                qty: d(qty),
                cost: d("100"),
            })
            .await
            .unwrap()
    }

    fn edit(cat: Option<InvestmentCategory>, qty: &str) -> InvestmentEdit {
        InvestmentEdit {
            date: date(),
            cat,
            qty: d(qty),
            cost: d("100"),
        }
    }

    #[tokio::test]
    async fn test_snapshot_matches_store_after_mutations() {
        let (service, repo, _temp) = setup().await;
        let creation = new_miner(&service, "100", "20").await;
        let miner_id = creation.miner_id.unwrap();
        upgrade(&service, miner_id, InvestmentCategory::Capacity, "10").await;
        service
            .create_investment(NewInvestment::Token {
                date: date(),
                qty: d("50"),
                cost: d("25"),
            })
            .await
            .unwrap();

        assert_eq!(service.rows().await, repo.load_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_upgrade_of_unknown_miner_is_rejected() {
        let (service, _repo, _temp) = setup().await;
        let result = service
            .create_investment(NewInvestment::Upgrade {
                date: date(),
                miner_id: 42,
                cat: InvestmentCategory::Capacity,
                qty: d("1"),
                cost: d("1"),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::NotFound("miner", 42))));
    }

    #[tokio::test]
    async fn test_upgrade_with_non_upgrade_category_is_rejected() {
        let (service, _repo, _temp) = setup().await;
        let miner_id = new_miner(&service, "100", "20").await.miner_id.unwrap();
        let result = service
            .create_investment(NewInvestment::Upgrade {
                date: date(),
                miner_id,
                cat: InvestmentCategory::TokenPurchase,
                qty: d("1"),
                cost: d("1"),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_edit_capacity_reverses_old_delta() {
        let (service, _repo, _temp) = setup().await;
        let miner_id = new_miner(&service, "100", "20").await.miner_id.unwrap();
        let inv = upgrade(&service, miner_id, InvestmentCategory::Capacity, "10").await;
        assert_eq!(service.rows().await.miners[0].power, d("110"));

        service
            .update_investment(inv.id, edit(None, "4"))
            .await
            .unwrap();

        // 110 - 10 + 4: six less than before the edit
        assert_eq!(service.rows().await.miners[0].power, d("104"));
    }

    #[tokio::test]
    async fn test_edit_switches_capacity_to_efficiency() {
        let (service, _repo, _temp) = setup().await;
        let miner_id = new_miner(&service, "100", "20").await.miner_id.unwrap();
        let inv = upgrade(&service, miner_id, InvestmentCategory::Capacity, "10").await;

        let updated = service
            .update_investment(inv.id, edit(Some(InvestmentCategory::Efficiency), "3"))
            .await
            .unwrap();
        assert_eq!(updated.cat, InvestmentCategory::Efficiency);

        let miner = service.rows().await.miners[0].clone();
        assert_eq!(miner.power, d("100"));
        assert_eq!(miner.eff, d("17"));
    }

    #[tokio::test]
    async fn test_efficiency_floor() {
        let (service, _repo, _temp) = setup().await;
        let miner_id = new_miner(&service, "100", "5").await.miner_id.unwrap();
        upgrade(&service, miner_id, InvestmentCategory::Efficiency, "10").await;
        assert_eq!(service.rows().await.miners[0].eff, d("1"));
    }

    #[tokio::test]
    async fn test_edit_creation_is_rejected() {
        let (service, _repo, _temp) = setup().await;
        let creation = new_miner(&service, "100", "20").await;
        let result = service.update_investment(creation.id, edit(None, "50")).await;
        assert!(matches!(result, Err(LedgerError::CreationImmutable)));
    }

    #[tokio::test]
    async fn test_edit_token_purchase_touches_no_miner() {
        let (service, _repo, _temp) = setup().await;
        new_miner(&service, "100", "20").await;
        let token = service
            .create_investment(NewInvestment::Token {
                date: date(),
                qty: d("50"),
                cost: d("25"),
            })
            .await
            .unwrap();

        let updated = service
            .update_investment(token.id, edit(Some(InvestmentCategory::Capacity), "70"))
            .await
            .unwrap();
        assert_eq!(updated.cat, InvestmentCategory::TokenPurchase);
        assert_eq!(updated.qty, d("70"));
        assert_eq!(service.rows().await.miners[0].power, d("100"));
    }

    #[tokio::test]
    async fn test_delete_upgrade_reverts_miner() {
        let (service, _repo, _temp) = setup().await;
        let miner_id = new_miner(&service, "100", "20").await.miner_id.unwrap();
        let inv = upgrade(&service, miner_id, InvestmentCategory::Capacity, "25").await;

        let removed = service.delete_investment(inv.id).await.unwrap();
        assert_eq!(removed.investments, vec![inv.id]);
        assert!(removed.miners.is_empty());
        assert_eq!(service.rows().await.miners[0].power, d("100"));
    }

    #[tokio::test]
    async fn test_delete_creation_cascades() {
        let (service, repo, _temp) = setup().await;
        let keep = new_miner(&service, "50", "20").await.miner_id.unwrap();
        let creation = new_miner(&service, "100", "20").await;
        let gone = creation.miner_id.unwrap();
        upgrade(&service, gone, InvestmentCategory::Capacity, "10").await;
        upgrade(&service, gone, InvestmentCategory::Efficiency, "2").await;

        let removed = service.delete_investment(creation.id).await.unwrap();
        assert_eq!(removed.miners, vec![gone]);
        assert_eq!(removed.investments.len(), 3);

        for rows in [service.rows().await, repo.load_all().await.unwrap()] {
            assert_eq!(rows.miners.len(), 1);
            assert_eq!(rows.miners[0].id, keep);
            assert!(rows.investments.iter().all(|i| !i.belongs_to(gone)));
        }
    }

    #[tokio::test]
    async fn test_gain_is_priced_at_entry() {
        let (service, _repo, _temp) = setup().await;
        let mut rates = RateSet::default();
        rates.apply_market(d("50000"), d("40000"));
        rates.set_token_usd(d("5"));

        let input = GainInput {
            date: date(),
            sats: 100_000,
            service: d("1"),
            elec: d("1"),
        };
        let gain = service.add_gain(input.clone(), &rates).await.unwrap();
        assert_eq!(gain.valeur_eur, d("40"));
        assert_eq!(gain.cout_entretien_eur, d("8"));

        // Later rate moves do not revalue stored rows.
        rates.apply_market(d("100000"), d("80000"));
        assert_eq!(service.rows().await.gains[0].valeur_eur, d("40"));

        // An edit re-prices at the rates of the edit.
        let edited = service.update_gain(gain.id, input, &rates).await.unwrap();
        assert_eq!(edited.valeur_eur, d("80"));
    }

    #[tokio::test]
    async fn test_sale_crud_and_missing_ids() {
        let (service, _repo, _temp) = setup().await;
        let sale = service
            .add_sale(SaleInput {
                date: date(),
                sats: 10_000,
                montant: d("5"),
            })
            .await
            .unwrap();

        let updated = service
            .update_sale(
                sale.id,
                SaleInput {
                    date: date(),
                    sats: 12_000,
                    montant: d("6"),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.sats, 12_000);

        service.delete_sale(sale.id).await.unwrap();
        assert!(matches!(
            service.delete_sale(sale.id).await,
            Err(LedgerError::NotFound("sale", _))
        ));
        assert!(matches!(
            service.delete_gain(99).await,
            Err(LedgerError::NotFound("gain", 99))
        ));
    }

    #[tokio::test]
    async fn test_negative_inputs_rejected() {
        let (service, _repo, _temp) = setup().await;
        let result = service
            .create_investment(NewInvestment::NewMiner {
                date: date(),
                power: d("-1"),
                eff: d("20"),
                cost: d("10"),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Invalid(_))));

        let result = service
            .add_sale(SaleInput {
                date: date(),
                sats: -5,
                montant: d("1"),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_oversized_inputs_rejected() {
        let (service, repo, _temp) = setup().await;
        let result = service
            .create_investment(NewInvestment::NewMiner {
                date: date(),
                power: d("10000000000000000000000000000"),
                eff: d("20"),
                cost: d("10"),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Invalid(_))));

        let creation = new_miner(&service, "999999999999999", "20").await;
        let result = service
            .create_investment(NewInvestment::Upgrade {
                date: date(),
                miner_id: creation.miner_id.unwrap(),
                cat: InvestmentCategory::Capacity,
                qty: d("10"),
                cost: d("1"),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Invalid(_))));

        let result = service
            .add_gain(
                GainInput {
                    date: date(),
                    sats: i64::MAX,
                    service: d("0"),
                    elec: d("0"),
                },
                &RateSet::default(),
            )
            .await;
        assert!(matches!(result, Err(LedgerError::Invalid(_))));

        let rows = repo.load_all().await.unwrap();
        assert_eq!(rows.miners.len(), 1);
        assert_eq!(rows.miners[0].power, d("999999999999999"));
        assert!(rows.gains.is_empty());
    }

    #[tokio::test]
    async fn test_failed_import_leaves_store_untouched() {
        let (service, repo, _temp) = setup().await;
        new_miner(&service, "100", "20").await;
        let before = repo.load_all().await.unwrap();

        let doc = serde_json::json!({"miners": [], "investissements": [], "gains": []});
        assert!(matches!(
            service.import(&doc).await,
            Err(LedgerError::Import(_))
        ));

        assert_eq!(repo.load_all().await.unwrap(), before);
        assert_eq!(service.rows().await, before);
    }

    #[tokio::test]
    async fn test_import_replaces_and_reloads() {
        let (service, _repo, _temp) = setup().await;
        new_miner(&service, "100", "20").await;

        let doc = serde_json::json!({
            "miners": [{"id": 7, "power": 60, "eff": 18, "cost": 700, "date": "2023-05-01"}],
            "investissements": [
                {"id": 20, "date": "2023-05-01", "minerId": 7, "cat": "CREATION", "qty": 60, "cost": 700}
            ],
            "gains": [{"id": 2, "date": "01-06-2023", "sats": 4000, "service": 0.1, "elec": 0.2}],
            "ventes": []
        });
        let count = service.import(&doc).await.unwrap();
        assert_eq!(count, 3);

        let rows = service.rows().await;
        assert_eq!(rows.miners.len(), 1);
        assert_eq!(rows.miners[0].id, 7);
        assert_eq!(rows.investments[0].id, 20);
        assert_eq!(rows.gains[0].date, LedgerDate::from_ymd(2023, 6, 1).unwrap());

        // New miners continue after the imported ids.
        let next = new_miner(&service, "10", "20").await;
        assert!(next.miner_id.unwrap() > 7);
    }

    #[tokio::test]
    async fn test_purge_empties_ledger() {
        let (service, repo, _temp) = setup().await;
        new_miner(&service, "100", "20").await;
        service.purge().await.unwrap();
        assert!(service.rows().await.is_empty());
        assert!(repo.load_all().await.unwrap().is_empty());
    }
}

//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules by collection:
//! - `miners.rs` - Miner rows, including the paired creation investment
//! - `investments.rs` - Investment rows and the miner updates that go with them
//! - `gains.rs` - Harvest rows
//! - `sales.rs` - Sale rows
//!
//! Decimals are stored as canonical TEXT so no precision is lost to SQLite REAL.

mod gains;
mod investments;
mod miners;
mod sales;

use crate::domain::{Decimal, LedgerDate, LedgerRows};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, warn};

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    // =========================================================================
    // Whole-ledger operations
    // =========================================================================

    /// Load all four collections, each ordered by id.
    ///
    /// # Errors
    /// Returns an error if any of the queries fails.
    pub async fn load_all(&self) -> Result<LedgerRows, sqlx::Error> {
        let (miners, investments, gains, sales) = futures::try_join!(
            self.list_miners(),
            self.list_investments(),
            self.list_gains(),
            self.list_sales(),
        )?;

        Ok(LedgerRows {
            miners,
            investments,
            gains,
            sales,
        })
    }

    /// Delete every row of the four collections as one unit.
    ///
    /// Settings are not touched.
    pub async fn clear_all(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        clear_collections(&mut tx).await?;
        tx.commit().await?;
        debug!("Cleared all ledger collections");
        Ok(())
    }

    /// Replace the whole ledger with `rows`, keeping every row's id.
    ///
    /// Runs in a single transaction: on failure the previous contents remain.
    pub async fn replace_all(&self, rows: &LedgerRows) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        clear_collections(&mut tx).await?;

        for miner in &rows.miners {
            miners::insert_miner_row(&mut tx, miner).await?;
        }
        for investment in &rows.investments {
            investments::insert_investment_row(&mut tx, investment).await?;
        }
        for gain in &rows.gains {
            gains::insert_gain_row(&mut tx, gain).await?;
        }
        for sale in &rows.sales {
            sales::insert_sale_row(&mut tx, sale).await?;
        }

        tx.commit().await?;
        debug!(rows = rows.row_count(), "Replaced ledger contents");
        Ok(())
    }

    // =========================================================================
    // Settings operations
    // =========================================================================

    /// Read a persisted setting.
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Insert or overwrite a persisted setting.
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a persisted setting. Returns whether it existed.
    pub async fn remove_setting(&self, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn clear_collections(conn: &mut sqlx::SqliteConnection) -> Result<(), sqlx::Error> {
    for table in ["miners", "investments", "gains", "sales"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Read a TEXT decimal column; unparseable values are logged and read as 0.
fn decimal_col(row: &SqliteRow, column: &str) -> Decimal {
    let raw: String = row.get(column);
    Decimal::from_str(&raw).unwrap_or_else(|e| {
        warn!(
            column = %column,
            value = %raw,
            error = %e,
            "Failed to parse stored decimal, using default"
        );
        Decimal::default()
    })
}

fn date_col(row: &SqliteRow, column: &str) -> Result<LedgerDate, sqlx::Error> {
    let raw: String = row.get(column);
    LedgerDate::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::setup_test_db;
    use super::*;
    use crate::domain::{Gain, Investment, InvestmentCategory, Miner, NewMiner, Sale};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn date() -> LedgerDate {
        LedgerDate::from_ymd(2024, 2, 1).unwrap()
    }

    fn sample_rows() -> LedgerRows {
        LedgerRows {
            miners: vec![Miner {
                id: 5,
                power: d("100"),
                eff: d("20"),
                cost: d("1000"),
                date: date(),
            }],
            investments: vec![
                Investment {
                    id: 11,
                    date: date(),
                    miner_id: Some(5),
                    cat: InvestmentCategory::Creation,
                    qty: d("100"),
                    cost: d("1000"),
                },
                Investment {
                    id: 12,
                    date: date(),
                    miner_id: None,
                    cat: InvestmentCategory::TokenPurchase,
                    qty: d("50"),
                    cost: d("20"),
                },
            ],
            gains: vec![Gain {
                id: 3,
                date: date(),
                sats: 12_000,
                service: d("0.4"),
                elec: d("1.1"),
                valeur_eur: d("6.6"),
                cout_entretien_eur: d("5.52"),
            }],
            sales: vec![Sale {
                id: 9,
                date: date(),
                sats: 5_000,
                montant: d("2.75"),
            }],
        }
    }

    #[tokio::test]
    async fn test_replace_all_preserves_ids() {
        let (repo, _temp) = setup_test_db().await;
        let rows = sample_rows();

        repo.replace_all(&rows).await.unwrap();
        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded, rows);
    }

    #[tokio::test]
    async fn test_replace_all_discards_previous_rows() {
        let (repo, _temp) = setup_test_db().await;
        repo.create_miner(&NewMiner {
            power: d("10"),
            eff: d("30"),
            cost: d("200"),
            date: date(),
        })
        .await
        .unwrap();

        let rows = sample_rows();
        repo.replace_all(&rows).await.unwrap();
        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded.miners.len(), 1);
        assert_eq!(loaded.miners[0].id, 5);
        assert_eq!(loaded.investments.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_all_keeps_settings() {
        let (repo, _temp) = setup_test_db().await;
        repo.replace_all(&sample_rows()).await.unwrap();
        repo.set_setting("reduc", "0.2").await.unwrap();

        repo.clear_all().await.unwrap();

        assert!(repo.load_all().await.unwrap().is_empty());
        assert_eq!(repo.get_setting("reduc").await.unwrap().as_deref(), Some("0.2"));
    }

    #[tokio::test]
    async fn test_settings_upsert_and_remove() {
        let (repo, _temp) = setup_test_db().await;
        assert_eq!(repo.get_setting("manual_gmt_usd").await.unwrap(), None);

        repo.set_setting("manual_gmt_usd", "5").await.unwrap();
        repo.set_setting("manual_gmt_usd", "7").await.unwrap();
        assert_eq!(
            repo.get_setting("manual_gmt_usd").await.unwrap().as_deref(),
            Some("7")
        );

        assert!(repo.remove_setting("manual_gmt_usd").await.unwrap());
        assert!(!repo.remove_setting("manual_gmt_usd").await.unwrap());
        assert_eq!(repo.get_setting("manual_gmt_usd").await.unwrap(), None);
    }
}

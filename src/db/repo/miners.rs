//! Miner operations.

use super::investments::{insert_new_investment, update_investment_row};
use super::{date_col, decimal_col, Repository};
use crate::domain::{Investment, InvestmentCategory, Miner, NewMiner};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

impl Repository {
    /// Insert a miner together with its creation investment.
    ///
    /// The creation investment carries the miner's power as quantity and its
    /// cost, dated like the miner. Both rows are written in one transaction.
    ///
    /// # Errors
    /// Returns an error if either insert fails; nothing is written in that case.
    pub async fn create_miner(&self, new: &NewMiner) -> Result<(Miner, Investment), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO miners (power, eff, cost, date)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.power.to_canonical_string())
        .bind(new.eff.to_canonical_string())
        .bind(new.cost.to_canonical_string())
        .bind(new.date.to_string())
        .execute(&mut *tx)
        .await?;

        let miner = Miner {
            id: result.last_insert_rowid(),
            power: new.power,
            eff: new.eff,
            cost: new.cost,
            date: new.date,
        };

        let mut creation = Investment {
            id: 0,
            date: new.date,
            miner_id: Some(miner.id),
            cat: InvestmentCategory::Creation,
            qty: new.power,
            cost: new.cost,
        };
        creation.id = insert_new_investment(&mut tx, &creation).await?;

        tx.commit().await?;
        Ok((miner, creation))
    }

    /// List all miners ordered by id.
    pub async fn list_miners(&self) -> Result<Vec<Miner>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, power, eff, cost, date FROM miners ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(miner_from_row).collect()
    }

    /// Overwrite a miner's attributes. Returns whether the miner exists.
    pub async fn update_miner(&self, miner: &Miner) -> Result<bool, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        update_miner_row(&mut conn, miner).await
    }

    /// Delete a miner and every investment that references it.
    ///
    /// Returns the number of investments removed with it.
    pub async fn delete_miner_cascade(&self, miner_id: i64) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM investments WHERE miner_id = ?")
            .bind(miner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM miners WHERE id = ?")
            .bind(miner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(removed)
    }

    /// Write an upgrade investment and the miner it modified in one transaction.
    ///
    /// Inserts the investment when its id is 0, updates it otherwise. Returns
    /// the investment id.
    pub async fn save_upgrade(
        &self,
        investment: &Investment,
        miner: &Miner,
    ) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        update_miner_row(&mut tx, miner).await?;
        let id = if investment.id == 0 {
            insert_new_investment(&mut tx, investment).await?
        } else {
            update_investment_row(&mut tx, investment).await?;
            investment.id
        };

        tx.commit().await?;
        Ok(id)
    }

    /// Delete an upgrade investment and write the miner it no longer modifies.
    pub async fn delete_upgrade(&self, investment_id: i64, miner: &Miner) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        update_miner_row(&mut tx, miner).await?;
        sqlx::query("DELETE FROM investments WHERE id = ?")
            .bind(investment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

pub(super) async fn insert_miner_row(
    conn: &mut SqliteConnection,
    miner: &Miner,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO miners (id, power, eff, cost, date)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(miner.id)
    .bind(miner.power.to_canonical_string())
    .bind(miner.eff.to_canonical_string())
    .bind(miner.cost.to_canonical_string())
    .bind(miner.date.to_string())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn update_miner_row(conn: &mut SqliteConnection, miner: &Miner) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE miners SET power = ?, eff = ?, cost = ?, date = ?
        WHERE id = ?
        "#,
    )
    .bind(miner.power.to_canonical_string())
    .bind(miner.eff.to_canonical_string())
    .bind(miner.cost.to_canonical_string())
    .bind(miner.date.to_string())
    .bind(miner.id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn miner_from_row(row: &SqliteRow) -> Result<Miner, sqlx::Error> {
    Ok(Miner {
        id: row.get("id"),
        power: decimal_col(row, "power"),
        eff: decimal_col(row, "eff"),
        cost: decimal_col(row, "cost"),
        date: date_col(row, "date")?,
    })
}

//! Investment operations.

use super::{date_col, decimal_col, Repository};
use crate::domain::{Investment, InvestmentCategory};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

impl Repository {
    /// Insert an investment that touches no miner (token purchase). The id
    /// field of `investment` is ignored; the assigned id is returned.
    pub async fn insert_investment(&self, investment: &Investment) -> Result<i64, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        insert_new_investment(&mut conn, investment).await
    }

    /// List all investments ordered by id.
    pub async fn list_investments(&self) -> Result<Vec<Investment>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, miner_id, cat, qty, cost
            FROM investments
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(investment_from_row).collect()
    }

    /// Overwrite an investment. Returns whether it exists.
    pub async fn update_investment(&self, investment: &Investment) -> Result<bool, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        update_investment_row(&mut conn, investment).await
    }

    /// Delete an investment by id. Returns whether it existed.
    pub async fn delete_investment(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM investments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(super) async fn insert_new_investment(
    conn: &mut SqliteConnection,
    investment: &Investment,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO investments (date, miner_id, cat, qty, cost)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(investment.date.to_string())
    .bind(investment.miner_id)
    .bind(investment.cat.as_str())
    .bind(investment.qty.to_canonical_string())
    .bind(investment.cost.to_canonical_string())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub(super) async fn insert_investment_row(
    conn: &mut SqliteConnection,
    investment: &Investment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO investments (id, date, miner_id, cat, qty, cost)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(investment.id)
    .bind(investment.date.to_string())
    .bind(investment.miner_id)
    .bind(investment.cat.as_str())
    .bind(investment.qty.to_canonical_string())
    .bind(investment.cost.to_canonical_string())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(super) async fn update_investment_row(
    conn: &mut SqliteConnection,
    investment: &Investment,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE investments SET date = ?, miner_id = ?, cat = ?, qty = ?, cost = ?
        WHERE id = ?
        "#,
    )
    .bind(investment.date.to_string())
    .bind(investment.miner_id)
    .bind(investment.cat.as_str())
    .bind(investment.qty.to_canonical_string())
    .bind(investment.cost.to_canonical_string())
    .bind(investment.id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn investment_from_row(row: &SqliteRow) -> Result<Investment, sqlx::Error> {
    let cat: String = row.get("cat");
    let cat = cat
        .parse::<InvestmentCategory>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "cat".to_string(),
            source: Box::new(e),
        })?;

    Ok(Investment {
        id: row.get("id"),
        date: date_col(row, "date")?,
        miner_id: row.get::<Option<i64>, _>("miner_id").filter(|id| *id != 0),
        cat,
        qty: decimal_col(row, "qty"),
        cost: decimal_col(row, "cost"),
    })
}

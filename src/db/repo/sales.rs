//! Sale operations.

use super::{date_col, decimal_col, Repository};
use crate::domain::Sale;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

impl Repository {
    /// Insert a sale, ignoring its id field. Returns the assigned id.
    pub async fn insert_sale(&self, sale: &Sale) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO sales (date, sats, montant) VALUES (?, ?, ?)")
            .bind(sale.date.to_string())
            .bind(sale.sats)
            .bind(sale.montant.to_canonical_string())
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// List all sales ordered by id.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, sqlx::Error> {
        let rows = sqlx::query("SELECT id, date, sats, montant FROM sales ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(sale_from_row).collect()
    }

    /// Overwrite a sale. Returns whether it exists.
    pub async fn update_sale(&self, sale: &Sale) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE sales SET date = ?, sats = ?, montant = ? WHERE id = ?")
            .bind(sale.date.to_string())
            .bind(sale.sats)
            .bind(sale.montant.to_canonical_string())
            .bind(sale.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a sale by id. Returns whether it existed.
    pub async fn delete_sale(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(super) async fn insert_sale_row(conn: &mut SqliteConnection, sale: &Sale) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sales (id, date, sats, montant) VALUES (?, ?, ?, ?)")
        .bind(sale.id)
        .bind(sale.date.to_string())
        .bind(sale.sats)
        .bind(sale.montant.to_canonical_string())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

fn sale_from_row(row: &SqliteRow) -> Result<Sale, sqlx::Error> {
    Ok(Sale {
        id: row.get("id"),
        date: date_col(row, "date")?,
        sats: row.get("sats"),
        montant: decimal_col(row, "montant"),
    })
}

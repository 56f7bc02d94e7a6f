//! Gain operations.

use super::{date_col, decimal_col, Repository};
use crate::domain::Gain;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;

impl Repository {
    /// Insert a gain, ignoring its id field. Returns the assigned id.
    pub async fn insert_gain(&self, gain: &Gain) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO gains (date, sats, service, elec, valeur_eur, cout_entretien_eur)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(gain.date.to_string())
        .bind(gain.sats)
        .bind(gain.service.to_canonical_string())
        .bind(gain.elec.to_canonical_string())
        .bind(gain.valeur_eur.to_canonical_string())
        .bind(gain.cout_entretien_eur.to_canonical_string())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List all gains ordered by id.
    pub async fn list_gains(&self) -> Result<Vec<Gain>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, sats, service, elec, valeur_eur, cout_entretien_eur
            FROM gains
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(gain_from_row).collect()
    }

    /// Overwrite a gain. Returns whether it exists.
    pub async fn update_gain(&self, gain: &Gain) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE gains
            SET date = ?, sats = ?, service = ?, elec = ?, valeur_eur = ?, cout_entretien_eur = ?
            WHERE id = ?
            "#,
        )
        .bind(gain.date.to_string())
        .bind(gain.sats)
        .bind(gain.service.to_canonical_string())
        .bind(gain.elec.to_canonical_string())
        .bind(gain.valeur_eur.to_canonical_string())
        .bind(gain.cout_entretien_eur.to_canonical_string())
        .bind(gain.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a gain by id. Returns whether it existed.
    pub async fn delete_gain(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gains WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub(super) async fn insert_gain_row(conn: &mut SqliteConnection, gain: &Gain) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO gains (id, date, sats, service, elec, valeur_eur, cout_entretien_eur)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(gain.id)
    .bind(gain.date.to_string())
    .bind(gain.sats)
    .bind(gain.service.to_canonical_string())
    .bind(gain.elec.to_canonical_string())
    .bind(gain.valeur_eur.to_canonical_string())
    .bind(gain.cout_entretien_eur.to_canonical_string())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn gain_from_row(row: &SqliteRow) -> Result<Gain, sqlx::Error> {
    Ok(Gain {
        id: row.get("id"),
        date: date_col(row, "date")?,
        sats: row.get("sats"),
        service: decimal_col(row, "service"),
        elec: decimal_col(row, "elec"),
        valeur_eur: decimal_col(row, "valeur_eur"),
        cout_entretien_eur: decimal_col(row, "cout_entretien_eur"),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::setup_test_db;
    use crate::domain::{Decimal, Gain, LedgerDate};

    #[tokio::test]
    async fn test_gain_crud() {
        let (repo, _temp) = setup_test_db().await;
        let mut gain = Gain {
            id: 0,
            date: LedgerDate::from_ymd(2024, 8, 8).unwrap(),
            sats: 21_000,
            service: Decimal::from_str_canonical("0.25").unwrap(),
            elec: Decimal::from_str_canonical("0.75").unwrap(),
            valeur_eur: Decimal::from_str_canonical("11.55").unwrap(),
            cout_entretien_eur: Decimal::from_str_canonical("4").unwrap(),
        };

        gain.id = repo.insert_gain(&gain).await.unwrap();
        assert_eq!(repo.list_gains().await.unwrap(), vec![gain.clone()]);

        gain.sats = 22_000;
        assert!(repo.update_gain(&gain).await.unwrap());
        assert_eq!(repo.list_gains().await.unwrap()[0].sats, 22_000);

        assert!(repo.delete_gain(gain.id).await.unwrap());
        assert!(repo.list_gains().await.unwrap().is_empty());
    }
}

//! Validation of imported ledger documents.

use super::{check_amount, check_sats};
use crate::domain::LedgerRows;
use serde_json::Value;

/// Check that `document` carries all four collections as arrays, then decode it.
///
/// Returns a human-readable reason on failure; nothing is written by this
/// function, so a rejected document leaves the store untouched.
pub fn parse_document(document: &Value) -> Result<LedgerRows, String> {
    let Some(object) = document.as_object() else {
        return Err("expected a JSON object".to_string());
    };

    for name in LedgerRows::COLLECTIONS {
        match object.get(name) {
            Some(Value::Array(_)) => {}
            Some(_) => return Err(format!("\"{}\" is not an array", name)),
            None => return Err(format!("missing \"{}\"", name)),
        }
    }

    let rows: LedgerRows =
        serde_json::from_value(document.clone()).map_err(|e| format!("malformed row: {}", e))?;
    check_ranges(&rows)?;
    Ok(rows)
}

fn in_row(collection: &'static str, id: i64) -> impl Fn(String) -> String {
    move |e| format!("{} {}: {}", collection, id, e)
}

/// Apply the same bounds as operator input to every imported row.
fn check_ranges(rows: &LedgerRows) -> Result<(), String> {
    for m in &rows.miners {
        [("power", m.power), ("eff", m.eff), ("cost", m.cost)]
            .into_iter()
            .try_for_each(|(name, v)| check_amount(name, v))
            .map_err(in_row("miner", m.id))?;
    }
    for i in &rows.investments {
        [("qty", i.qty), ("cost", i.cost)]
            .into_iter()
            .try_for_each(|(name, v)| check_amount(name, v))
            .map_err(in_row("investment", i.id))?;
    }
    for g in &rows.gains {
        check_sats(g.sats).map_err(in_row("gain", g.id))?;
        [
            ("service", g.service),
            ("elec", g.elec),
            ("valeur_eur", g.valeur_eur),
            ("cout_entretien_eur", g.cout_entretien_eur),
        ]
        .into_iter()
        .try_for_each(|(name, v)| check_amount(name, v))
        .map_err(in_row("gain", g.id))?;
    }
    for s in &rows.sales {
        check_sats(s.sats).map_err(in_row("sale", s.id))?;
        check_amount("montant", s.montant).map_err(in_row("sale", s.id))?;
    }
    Ok(())
}

//! Time needed for projected profit to pay back the total investment.

use crate::domain::Decimal;
use serde::Serialize;

const MONTHS_PER_YEAR: i64 = 12;
/// Simplified calendar: every month is 30 days.
const DAYS_PER_MONTH: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BreakEven {
    /// Yearly profit is zero or negative: the investment never pays back.
    Never,
    #[serde(rename_all = "camelCase")]
    After {
        years: i64,
        months: i64,
        days: i64,
        /// Undecomposed horizon, in years.
        total_years: Decimal,
    },
}

impl BreakEven {
    pub fn is_never(&self) -> bool {
        matches!(self, BreakEven::Never)
    }
}

/// Decompose `total_investment / yearly_profit` years into whole years, whole
/// months and rounded days.
pub fn break_even(total_investment: Decimal, yearly_profit: Decimal) -> BreakEven {
    if !yearly_profit.is_positive() {
        return BreakEven::Never;
    }

    let total_years = total_investment.div_or_zero(yearly_profit);
    let years = total_years.floor();
    let month_span = (total_years - years) * Decimal::from(MONTHS_PER_YEAR);
    let months = month_span.floor();
    let days = ((month_span - months) * Decimal::from(DAYS_PER_MONTH)).round_half_up();

    BreakEven::After {
        years: years.to_i64_saturating(),
        months: months.to_i64_saturating(),
        days: days.to_i64_saturating(),
        total_years,
    }
}

/// Yearly profit as a percentage of the total investment; 0 with nothing invested.
pub fn annualized_roi_pct(total_investment: Decimal, yearly_profit: Decimal) -> Decimal {
    yearly_profit.div_or_zero(total_investment) * Decimal::hundred()
}

//! Year/month filtering of the investment list.

use crate::domain::Investment;
use serde::Deserialize;

/// Restrict investments to a calendar year and/or month of any year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct InvestmentFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl InvestmentFilter {
    pub fn matches(&self, investment: &Investment) -> bool {
        self.year.map_or(true, |y| investment.date.year() == y)
            && self.month.map_or(true, |m| investment.date.month() == m)
    }

    pub fn apply(&self, investments: &[Investment]) -> Vec<Investment> {
        investments
            .iter()
            .filter(|i| self.matches(i))
            .cloned()
            .collect()
    }
}

/// Distinct years with at least one investment, ascending.
pub fn investment_years(investments: &[Investment]) -> Vec<i32> {
    let mut years: Vec<i32> = investments.iter().map(|i| i.date.year()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, InvestmentCategory, LedgerDate};

    fn inv(id: i64, y: i32, m: u32) -> Investment {
        Investment {
            id,
            date: LedgerDate::from_ymd(y, m, 10).unwrap(),
            miner_id: None,
            cat: InvestmentCategory::TokenPurchase,
            qty: Decimal::one(),
            cost: Decimal::one(),
        }
    }

    #[test]
    fn test_filter_by_year_and_month() {
        let all = vec![inv(1, 2023, 3), inv(2, 2024, 3), inv(3, 2024, 5)];

        let ids = |f: InvestmentFilter| f.apply(&all).iter().map(|i| i.id).collect::<Vec<_>>();
        assert_eq!(ids(InvestmentFilter::default()), vec![1, 2, 3]);
        assert_eq!(ids(InvestmentFilter { year: Some(2024), month: None }), vec![2, 3]);
        assert_eq!(ids(InvestmentFilter { year: None, month: Some(3) }), vec![1, 2]);
        assert_eq!(
            ids(InvestmentFilter {
                year: Some(2024),
                month: Some(5)
            }),
            vec![3]
        );
    }

    #[test]
    fn test_investment_years_sorted_unique() {
        let all = vec![inv(1, 2024, 1), inv(2, 2022, 6), inv(3, 2024, 9)];
        assert_eq!(investment_years(&all), vec![2022, 2024]);
        assert!(investment_years(&[]).is_empty());
    }
}

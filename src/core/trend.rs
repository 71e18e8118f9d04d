//! Monthly income/expense trend.

use crate::{
    core::category::CategoryIndex,
    models::{Category, CategoryKind, Transaction},
};
use chrono::Datelike;
use serde::Serialize;

/// Short month labels, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// 1-based month number
    pub month: u32,
    /// Short month name
    pub label: &'static str,
    /// Income booked in the month
    pub income: f64,
    /// Expenses booked in the month
    pub expenses: f64,
}

/// Twelve monthly buckets for one year, or nothing at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlyTrend {
    /// Calendar year
    pub year: i32,
    /// Twelve entries, or none when the year has no dated transactions
    pub months: Vec<MonthlyTotals>,
}

impl MonthlyTrend {
    /// True when there was nothing to bucket. The presentation layer should show an empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// The trailing `n` months of the year (the dashboard chart uses six).
    #[must_use]
    pub fn last(&self, n: usize) -> &[MonthlyTotals] {
        let start = self.months.len().saturating_sub(n);
        &self.months[start..]
    }
}

/// Buckets `transactions` into the twelve months of `year`.
///
/// An empty transaction list gives an empty series; no placeholder figures are ever produced.
/// Transactions without a date, or dated in another year, are left out of the buckets.
#[must_use]
pub fn monthly_trend(transactions: &[Transaction], categories: &[Category], year: i32) -> MonthlyTrend {
    if transactions.is_empty() {
        return MonthlyTrend {
            year,
            months: Vec::new(),
        };
    }

    let index = CategoryIndex::new(categories);
    let mut months: Vec<MonthlyTotals> = (1..=12u32)
        .zip(MONTH_LABELS)
        .map(|(month, label)| MonthlyTotals {
            month,
            label,
            income: 0.0,
            expenses: 0.0,
        })
        .collect();

    for tx in transactions {
        let Some(date) = tx.date else { continue };
        if date.year() != year {
            continue;
        }
        let bucket = &mut months[date.month0() as usize];
        match index.kind_of(tx.category_id) {
            CategoryKind::Income => bucket.income += tx.amount,
            CategoryKind::Expense => bucket.expenses += tx.amount,
        }
    }

    MonthlyTrend { year, months }
}

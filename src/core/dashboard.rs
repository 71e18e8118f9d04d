//! Dashboard view - every derived figure the dashboard page shows, computed in one pass.

use crate::{
    config::settings::AggregationSettings,
    core::{
        aggregate::{
            self, AttentionItem, BudgetProgress, CategorySpending, FinancialSummary,
        },
        snapshot::Snapshot,
        trend::{self, MonthlyTrend},
    },
};
use serde::Serialize;

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Headline totals
    pub summary: FinancialSummary,
    /// One row per budget
    pub budgets: Vec<BudgetProgress>,
    /// Monthly income and expenses for the year
    pub trend: MonthlyTrend,
    /// Expenses grouped by category name
    pub breakdown: Vec<CategorySpending>,
    /// Budgets past the attention threshold, most used first
    pub attention: Vec<AttentionItem>,
}

impl Dashboard {
    /// Derives the dashboard from `snapshot` for calendar year `year`.
    #[must_use]
    pub fn compute(snapshot: &Snapshot, settings: &AggregationSettings, year: i32) -> Self {
        let categories = snapshot.categories();
        let transactions = snapshot.transactions();
        let budgets = snapshot.budgets();

        Self {
            summary: aggregate::summarize(budgets, transactions, categories),
            budgets: aggregate::budget_progress(budgets, categories, &settings.thresholds),
            trend: trend::monthly_trend(transactions, categories, year),
            breakdown: aggregate::category_breakdown(transactions, categories),
            attention: aggregate::upcoming_attention(
                budgets,
                categories,
                settings.attention_threshold,
                settings.attention_top_n,
            ),
        }
    }

    /// The trend window the dashboard chart displays.
    #[must_use]
    pub fn chart_months<'a>(&'a self, settings: &AggregationSettings) -> &'a [trend::MonthlyTotals] {
        self.trend.last(settings.trend_months)
    }
}

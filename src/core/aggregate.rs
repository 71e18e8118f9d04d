//! Aggregation engine - the figures shown on the dashboard.
//!
//! Every function here is pure: it reads a snapshot of categories, transactions, and budgets and
//! returns new values without touching its inputs, so calling it twice on the same snapshot gives
//! the same answer. A transaction's kind always comes from [`CategoryIndex`], including the
//! expense fallback for unknown categories.

use crate::{
    core::category::CategoryIndex,
    models::{Budget, BudgetId, Category, CategoryId, CategoryKind, Transaction},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Percent-used boundaries for classifying a budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetThresholds {
    /// Above this a budget is near its limit
    pub near_limit_percent: f64,
    /// Above this a budget is over budget
    pub over_budget_percent: f64,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            near_limit_percent: 80.0,
            over_budget_percent: 100.0,
        }
    }
}

impl BudgetThresholds {
    /// `<= near` is normal, `(near, over]` is near limit, `> over` is over budget.
    #[must_use]
    pub fn classify(&self, percentage: f64) -> BudgetStatus {
        if percentage > self.over_budget_percent {
            BudgetStatus::OverBudget
        } else if percentage > self.near_limit_percent {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::Normal
        }
    }
}

/// How close a budget is to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Within the comfortable range
    Normal,
    /// Above the near-limit threshold
    NearLimit,
    /// Above the over-budget threshold
    OverBudget,
}

impl BudgetStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::NearLimit => "near limit",
            Self::OverBudget => "over budget",
        }
    }
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FinancialSummary {
    /// Sum of income transactions
    pub total_income: f64,
    /// Sum of expense transactions
    pub total_expenses: f64,
    /// Income minus expenses
    pub balance: f64,
    /// Percent of income kept; 0 when there is no income
    pub savings_rate: f64,
    /// Sum of all budget limits
    pub total_budget_limit: f64,
    /// Sum of spending across budgets
    pub total_spent: f64,
    /// Percent of the combined limit still unspent. Negative when over budget; display code is
    /// expected to clamp.
    pub budget_health: f64,
}

/// Usage of a single budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// Budget this row describes
    pub budget_id: BudgetId,
    /// Budgeted category
    pub category_id: CategoryId,
    /// Resolved category name
    pub category_name: String,
    /// Spent so far
    pub spent: f64,
    /// Configured limit
    pub limit: f64,
    /// `spent / limit * 100`, 0 for a zero limit
    pub percentage: f64,
    /// Classification of `percentage`
    pub status: BudgetStatus,
}

/// Expense total for one category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    /// Category name
    pub name: String,
    /// Expense total
    pub total: f64,
}

/// A budget that has crossed the attention threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttentionItem {
    /// Budget needing attention
    pub budget_id: BudgetId,
    /// Category name
    pub name: String,
    /// Spent so far
    pub spent: f64,
    /// Configured limit
    pub limit: f64,
    /// Share of the limit used, in percent
    pub percentage_used: f64,
}

/// Returns copies of `budgets` with `spent` recomputed from `transactions`.
///
/// No date filtering is applied: `spent` covers every transaction in the snapshot regardless of the
/// budget's period.
#[must_use]
pub fn with_spent(
    budgets: &[Budget],
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<Budget> {
    let index = CategoryIndex::new(categories);
    let mut spent_by_category: HashMap<CategoryId, f64> = HashMap::new();
    for tx in transactions {
        if index.kind_of(tx.category_id) == CategoryKind::Expense {
            *spent_by_category.entry(tx.category_id).or_insert(0.0) += tx.amount;
        }
    }

    budgets
        .iter()
        .map(|budget| Budget {
            spent: spent_by_category
                .get(&budget.category_id)
                .copied()
                .unwrap_or(0.0),
            ..budget.clone()
        })
        .collect()
}

/// Income and expense totals, in that order.
#[must_use]
pub fn income_and_expenses(transactions: &[Transaction], categories: &[Category]) -> (f64, f64) {
    let index = CategoryIndex::new(categories);
    transactions
        .iter()
        .fold((0.0, 0.0), |(income, expenses), tx| {
            match index.kind_of(tx.category_id) {
                CategoryKind::Income => (income + tx.amount, expenses),
                CategoryKind::Expense => (income, expenses + tx.amount),
            }
        })
}

/// Sum of amounts whose category resolves to income.
#[must_use]
pub fn total_income(transactions: &[Transaction], categories: &[Category]) -> f64 {
    income_and_expenses(transactions, categories).0
}

/// Sum of amounts whose category resolves to expense, including unknown categories.
#[must_use]
pub fn total_expenses(transactions: &[Transaction], categories: &[Category]) -> f64 {
    income_and_expenses(transactions, categories).1
}

/// `(income - expenses) / income * 100`, or 0 without income.
#[must_use]
pub fn savings_rate(total_income: f64, total_expenses: f64) -> f64 {
    if total_income > 0.0 {
        (total_income - total_expenses) / total_income * 100.0
    } else {
        0.0
    }
}

/// `(limit - spent) / limit * 100`, or 0 without any limit. Not clamped.
#[must_use]
pub fn budget_health(total_budget_limit: f64, total_spent: f64) -> f64 {
    if total_budget_limit > 0.0 {
        (total_budget_limit - total_spent) / total_budget_limit * 100.0
    } else {
        0.0
    }
}

/// `spent / limit * 100`, or 0 for a non-positive limit.
#[must_use]
pub fn budget_percentage(budget: &Budget) -> f64 {
    if budget.limit > 0.0 {
        budget.spent / budget.limit * 100.0
    } else {
        0.0
    }
}

/// Computes the headline figures. `budgets` must already carry their derived `spent`.
#[must_use]
pub fn summarize(
    budgets: &[Budget],
    transactions: &[Transaction],
    categories: &[Category],
) -> FinancialSummary {
    let (total_income, total_expenses) = income_and_expenses(transactions, categories);
    let total_budget_limit: f64 = budgets.iter().map(|b| b.limit).sum();
    let total_spent: f64 = budgets.iter().map(|b| b.spent).sum();

    FinancialSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        savings_rate: savings_rate(total_income, total_expenses),
        total_budget_limit,
        total_spent,
        budget_health: budget_health(total_budget_limit, total_spent),
    }
}

/// Per-budget usage and status, in budget order.
#[must_use]
pub fn budget_progress(
    budgets: &[Budget],
    categories: &[Category],
    thresholds: &BudgetThresholds,
) -> Vec<BudgetProgress> {
    let index = CategoryIndex::new(categories);
    budgets
        .iter()
        .map(|budget| {
            let percentage = budget_percentage(budget);
            BudgetProgress {
                budget_id: budget.id,
                category_id: budget.category_id,
                category_name: index.resolve(budget.category_id).name.into_owned(),
                spent: budget.spent,
                limit: budget.limit,
                percentage,
                status: thresholds.classify(percentage),
            }
        })
        .collect()
}

/// Expense totals grouped by resolved category name.
///
/// Groups come out in order of first appearance, but callers should treat the list as unordered.
#[must_use]
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategorySpending> {
    let index = CategoryIndex::new(categories);
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut breakdown: Vec<CategorySpending> = Vec::new();

    for tx in transactions {
        let resolved = index.resolve(tx.category_id);
        if resolved.kind != CategoryKind::Expense {
            continue;
        }
        let name = resolved.name.into_owned();
        match positions.get(&name) {
            Some(&pos) => breakdown[pos].total += tx.amount,
            None => {
                positions.insert(name.clone(), breakdown.len());
                breakdown.push(CategorySpending {
                    name,
                    total: tx.amount,
                });
            }
        }
    }

    breakdown
}

/// Budgets whose `spent / limit` exceeds `threshold`, highest ratio first, at most `top_n`.
///
/// Budgets with a non-positive limit are skipped. Equal ratios keep their input order.
#[must_use]
pub fn upcoming_attention(
    budgets: &[Budget],
    categories: &[Category],
    threshold: f64,
    top_n: usize,
) -> Vec<AttentionItem> {
    let index = CategoryIndex::new(categories);
    let mut flagged: Vec<(f64, &Budget)> = budgets
        .iter()
        .filter(|b| b.limit > 0.0)
        .map(|b| (b.spent / b.limit, b))
        .filter(|(ratio, _)| *ratio > threshold)
        .collect();

    flagged.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    flagged
        .into_iter()
        .take(top_n)
        .map(|(ratio, budget)| AttentionItem {
            budget_id: budget.id,
            name: index.resolve(budget.category_id).name.into_owned(),
            spent: budget.spent,
            limit: budget.limit,
            percentage_used: ratio * 100.0,
        })
        .collect()
}

//! The in-memory copy of categories, transactions, and budgets.
//!
//! A [`Snapshot`] is immutable once built. Building one always recomputes every budget's `spent`
//! from the transactions it holds, so the derived figure can never drift from its source.

use crate::{
    core::{aggregate, normalize},
    entities::{RawBudget, RawCategory, RawTransaction},
    models::{Budget, BudgetId, Category, Transaction, TransactionId},
};

/// One consistent view of categories, transactions, and budgets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl Snapshot {
    /// Builds a snapshot from typed values, deriving `spent` on every budget.
    #[must_use]
    pub fn new(
        categories: Vec<Category>,
        transactions: Vec<Transaction>,
        budgets: Vec<Budget>,
    ) -> Self {
        let budgets = aggregate::with_spent(&budgets, &transactions, &categories);
        Self {
            categories,
            transactions,
            budgets,
        }
    }

    /// Normalizes backend records and builds a snapshot from them.
    #[must_use]
    pub fn from_raw(
        categories: &[RawCategory],
        transactions: &[RawTransaction],
        budgets: &[RawBudget],
    ) -> Self {
        Self::new(
            normalize::normalize_categories(categories),
            normalize::normalize_transactions(transactions),
            normalize::normalize_budgets(budgets),
        )
    }

    /// Categories as loaded.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Transactions as loaded.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Budgets with `spent` derived from [`Self::transactions`].
    #[must_use]
    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Looks up one transaction by id.
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Looks up one budget by id.
    #[must_use]
    pub fn budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    /// True when nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.transactions.is_empty() && self.budgets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{
        budget, raw_budget, raw_category, raw_transaction, sample_categories, sample_transactions,
    };

    #[test]
    fn test_new_derives_spent() {
        let snapshot = Snapshot::new(
            sample_categories(),
            sample_transactions(),
            vec![budget(1, 2, 200.0)],
        );
        assert_eq!(snapshot.budgets()[0].spent, 250.0);
        assert_eq!(snapshot.budget(1).map(|b| b.spent), Some(250.0));
        assert!(snapshot.budget(2).is_none());
    }

    #[test]
    fn test_from_raw_normalizes_and_derives() {
        let snapshot = Snapshot::from_raw(
            &[raw_category(1, "Salary", "income"), raw_category(2, "Food", "expense")],
            &[
                raw_transaction(1, 1, "1000.00"),
                raw_transaction(2, 2, "200.00"),
                raw_transaction(3, 2, "50.00"),
            ],
            &[raw_budget(1, 2, "200.00")],
        );

        assert_eq!(snapshot.categories().len(), 2);
        assert_eq!(snapshot.transaction(3).map(|t| t.amount), Some(50.0));
        assert_eq!(snapshot.budgets()[0].limit, 200.0);
        assert_eq!(snapshot.budgets()[0].spent, 250.0);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Snapshot::default().is_empty());
        assert!(!Snapshot::new(sample_categories(), vec![], vec![]).is_empty());
    }
}

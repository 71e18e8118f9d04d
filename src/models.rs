//! Typed domain values produced by `core::normalize`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category identifier
pub type CategoryId = i64;
/// Transaction identifier
pub type TransactionId = i64;
/// Budget identifier
pub type BudgetId = i64;

/// Whether money in a category comes in or goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl CategoryKind {
    /// Parses the backend's `type` string. Anything but `income` is treated as an expense.
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("income") => Self::Income,
            _ => Self::Expense,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.write_str("income"),
            Self::Expense => f.write_str("expense"),
        }
    }
}

/// A named bucket transactions and budgets belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Backend id
    pub id: CategoryId,
    /// Display name
    pub name: String,
    /// Income or expense
    pub kind: CategoryKind,
    /// Free-form priority label, passed through untouched
    pub priority: Option<String>,
}

/// A recorded movement of money. Its kind is resolved through the category when read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Backend id
    pub id: TransactionId,
    /// Owning category
    pub category_id: CategoryId,
    /// Non-negative amount
    pub amount: f64,
    /// Free text
    pub description: String,
    /// Booking date, `None` when the backend sent nothing parseable
    pub date: Option<NaiveDate>,
    /// Server-side creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Payment status, e.g. `Success`
    pub status: String,
    /// Payment reference (`tx_ref` on the wire)
    pub reference: String,
    /// How it was paid
    pub payment_method: String,
    /// Owner, when the backend reports one
    pub user: Option<String>,
}

/// A spending limit on one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Backend id
    pub id: BudgetId,
    /// Category the limit applies to
    pub category_id: CategoryId,
    /// Spending limit
    pub limit: f64,
    /// Derived from the transaction set, never read from the backend
    pub spent: f64,
    /// Period label, e.g. the month the budget applies to
    pub period: Option<String>,
    /// Optional due date
    pub due_date: Option<NaiveDate>,
    /// Linked transaction, if any
    pub transaction: Option<TransactionId>,
    /// Owner, when the backend reports one
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_kind_from_wire() {
        assert_eq!(CategoryKind::from_wire(Some("income")), CategoryKind::Income);
        assert_eq!(CategoryKind::from_wire(Some(" Income ")), CategoryKind::Income);
        assert_eq!(CategoryKind::from_wire(Some("expense")), CategoryKind::Expense);
        assert_eq!(CategoryKind::from_wire(Some("savings")), CategoryKind::Expense);
        assert_eq!(CategoryKind::from_wire(None), CategoryKind::Expense);
    }

    #[test]
    fn test_category_kind_serializes_lowercase() -> serde_json::Result<()> {
        assert_eq!(serde_json::to_string(&CategoryKind::Income)?, "\"income\"");
        Ok(())
    }
}

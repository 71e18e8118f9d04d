//! Budget records - `GET /budgets/` and `POST /create-budget/`.
//!
//! On the wire the budget limit is called `amount`. Nothing the backend sends about spending is
//! trusted; `spent` is always derived from transactions.

use super::{RawAmount, RawId};
use serde::{Deserialize, Serialize};

/// Budget as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawBudget {
    /// Unique identifier
    #[serde(default)]
    pub id: Option<RawId>,
    /// Owning user
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    /// Category id
    #[serde(default)]
    pub category: Option<RawId>,
    /// Budget limit, usually a decimal string
    #[serde(default)]
    pub amount: Option<RawAmount>,
    /// Budget period label
    #[serde(default)]
    pub month: Option<String>,
    /// Optional due date
    #[serde(default)]
    pub due_date: Option<String>,
    /// Linked transaction id
    #[serde(default)]
    pub transaction: Option<RawId>,
}

/// Body of `POST /create-budget/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    /// Category id
    pub category: i64,
    /// Budget limit
    pub amount: f64,
}

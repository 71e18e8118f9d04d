//! Transaction records - `GET /transactions/` and `POST /create-transaction/`.
//!
//! The backend stores no income/expense flag on a transaction; the kind comes from its category.

use super::{RawAmount, RawId};
use serde::{Deserialize, Serialize};

/// Transaction as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Unique identifier
    #[serde(default)]
    pub id: Option<RawId>,
    /// Owning user, an id or a username depending on the backend serializer
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    /// Category id, null when the category was removed
    #[serde(default)]
    pub category: Option<RawId>,
    /// Decimal amount, usually a string
    #[serde(default)]
    pub amount: Option<RawAmount>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Payment reference
    #[serde(default)]
    pub tx_ref: Option<String>,
    /// Payment status, e.g. `"Success"`
    #[serde(default)]
    pub status: Option<String>,
    /// Booking date
    #[serde(default)]
    pub date: Option<String>,
    /// Server-side creation time
    #[serde(default)]
    pub created_at: Option<String>,
    /// Payment method, rarely present
    #[serde(default, alias = "paymentMethod")]
    pub payment_method: Option<String>,
}

/// Body of `POST /create-transaction/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Category id
    pub category: i64,
    /// Positive amount
    pub amount: f64,
    /// Free-text description
    pub description: String,
    /// Client-generated reference
    pub tx_ref: String,
    /// Payment status
    pub status: String,
}

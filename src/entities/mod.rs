//! Wire records exchanged with the finance backend.
//!
//! These mirror the JSON the REST API sends and accepts. They are deliberately loose: amounts
//! arrive as decimal strings (sometimes as numbers), most fields are optional, and nothing here
//! is validated. `core::normalize` turns them into the typed domain values in `models`.

pub mod auth;
pub mod budget;
pub mod category;
pub mod transaction;

use serde::{Deserialize, Serialize};

pub use auth::{
    ChangePasswordRequest, LoginRequest, PaymentCheckout, RefreshRequest, ResetPasswordConfirmRequest,
    ResetPasswordRequest, SignUpRequest, TokenPair,
};
pub use budget::{NewBudget, RawBudget};
pub use category::RawCategory;
pub use transaction::{NewTransaction, RawTransaction};

/// An id or foreign key as the backend sends it: normally a number, occasionally a numeric
/// string. Anything else is kept as-is so one odd record cannot fail a whole list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Plain JSON integer
    Number(i64),
    /// Id sent as a string, e.g. `"2"`
    Text(String),
    /// Any other JSON value
    Other(serde_json::Value),
}

impl RawId {
    /// The id as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Other(value) => value.as_i64(),
        }
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A decimal field as the backend sends it: normally a string such as `"12.50"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// Plain JSON number
    Number(f64),
    /// Decimal string
    Text(String),
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

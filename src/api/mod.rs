//! The finance backend as seen by the store.
//!
//! [`FinanceDataSource`] is the seam between the store and the network: the store only ever talks
//! to this trait, [`HttpClient`] implements it against the REST API, and tests swap in an
//! in-memory fake.

pub mod http;
pub mod session;

use crate::{
    entities::{NewBudget, NewTransaction, RawBudget, RawCategory, RawTransaction},
    errors::Result,
    models::TransactionId,
};
use async_trait::async_trait;

pub use http::HttpClient;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore, UserProfile};

/// Supplies raw categories, transactions, and budgets, and accepts writes.
#[async_trait]
pub trait FinanceDataSource: Send + Sync {
    /// `GET /view-categories/`
    async fn fetch_categories(&self) -> Result<Vec<RawCategory>>;
    /// `GET /transactions/`
    async fn fetch_transactions(&self) -> Result<Vec<RawTransaction>>;
    /// `GET /budgets/`
    async fn fetch_budgets(&self) -> Result<Vec<RawBudget>>;
    /// `POST /create-transaction/`
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()>;
    /// `POST /create-budget/`
    async fn create_budget(&self, budget: &NewBudget) -> Result<()>;
    /// `DELETE /transactions/{id}/`
    async fn delete_transaction(&self, id: TransactionId) -> Result<()>;
}

//! Shared test utilities for `finance-sync`.
//!
//! Builders for domain values and backend records with sensible defaults, plus
//! [`FakeDataSource`], an in-memory backend the store tests drive instead of the network.

#![allow(clippy::unwrap_used)]

use crate::{
    api::FinanceDataSource,
    core::normalize::DEFAULT_PAYMENT_METHOD,
    entities::{NewBudget, NewTransaction, RawBudget, RawCategory, RawId, RawTransaction},
    errors::{Error, Result},
    models::{Budget, Category, CategoryKind, Transaction, TransactionId},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")))
        .with_test_writer()
        .try_init();
}

/// Income category with no priority.
pub fn income_category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        kind: CategoryKind::Income,
        priority: None,
    }
}

/// Expense category with no priority.
pub fn expense_category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        kind: CategoryKind::Expense,
        priority: None,
    }
}

/// Undated transaction.
///
/// # Defaults
/// * description: "Transaction {id}"
/// * reference: "tx-{id}"
/// * status: "Success"
pub fn transaction(id: i64, category_id: i64, amount: f64) -> Transaction {
    Transaction {
        id,
        category_id,
        amount,
        description: format!("Transaction {id}"),
        date: None,
        created_at: None,
        status: "Success".to_string(),
        reference: format!("tx-{id}"),
        payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        user: None,
    }
}

/// Transaction booked on `date` (`YYYY-MM-DD`).
pub fn dated_transaction(id: i64, category_id: i64, amount: f64, date: &str) -> Transaction {
    Transaction {
        date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        ..transaction(id, category_id, amount)
    }
}

/// Budget with nothing spent yet.
pub fn budget(id: i64, category_id: i64, limit: f64) -> Budget {
    Budget {
        id,
        category_id,
        limit,
        spent: 0.0,
        period: None,
        due_date: None,
        transaction: None,
        user: None,
    }
}

/// Salary (income, id 1) and Food (expense, id 2).
pub fn sample_categories() -> Vec<Category> {
    vec![income_category(1, "Salary"), expense_category(2, "Food")]
}

/// 1000 of income and 250 of Food spending.
pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        transaction(1, 1, 1000.0),
        transaction(2, 2, 200.0),
        transaction(3, 2, 50.0),
    ]
}

/// Category record as the backend sends it.
pub fn raw_category(id: i64, name: &str, kind: &str) -> RawCategory {
    RawCategory {
        id: Some(id.into()),
        name: Some(name.to_string()),
        kind: Some(kind.to_string()),
        priority: None,
    }
}

/// Transaction record with a decimal-string amount.
pub fn raw_transaction(id: i64, category: i64, amount: &str) -> RawTransaction {
    RawTransaction {
        id: Some(id.into()),
        user: None,
        category: Some(category.into()),
        amount: Some(amount.into()),
        description: Some(format!("Transaction {id}")),
        tx_ref: Some(format!("tx-{id}")),
        status: Some("Success".to_string()),
        date: None,
        created_at: None,
        payment_method: None,
    }
}

/// Budget record with a decimal-string limit.
pub fn raw_budget(id: i64, category: i64, amount: &str) -> RawBudget {
    RawBudget {
        id: Some(id.into()),
        user: None,
        category: Some(category.into()),
        amount: Some(amount.into()),
        month: None,
        due_date: None,
        transaction: None,
    }
}

/// Backend calls [`FakeDataSource`] can fail or count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /view-categories/`
    Categories,
    /// `GET /transactions/`
    Transactions,
    /// `GET /budgets/`
    Budgets,
    /// `POST /create-transaction/`
    CreateTransaction,
    /// `POST /create-budget/`
    CreateBudget,
    /// `DELETE /transactions/{id}/`
    DeleteTransaction,
}

/// Keeps one budgets fetch pending until released.
#[derive(Debug, Clone, Default)]
pub struct FetchHold {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl FetchHold {
    /// Resolves once the held fetch has read its data and is waiting.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the held fetch return.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Debug, Default)]
struct FakeState {
    categories: Vec<RawCategory>,
    transactions: Vec<RawTransaction>,
    budgets: Vec<RawBudget>,
    failing: HashSet<Endpoint>,
    hold: Option<FetchHold>,
    calls: Vec<Endpoint>,
}

impl FakeState {
    fn check(&mut self, endpoint: Endpoint) -> Result<()> {
        self.calls.push(endpoint);
        if self.failing.contains(&endpoint) {
            return Err(Error::Network {
                message: format!("{endpoint:?} unavailable"),
            });
        }
        Ok(())
    }
}

/// In-memory backend. Writes change what later fetches return.
#[derive(Debug, Default)]
pub struct FakeDataSource {
    state: Mutex<FakeState>,
}

impl FakeDataSource {
    /// Backend serving exactly these records.
    pub fn new(
        categories: Vec<RawCategory>,
        transactions: Vec<RawTransaction>,
        budgets: Vec<RawBudget>,
    ) -> Self {
        Self {
            state: Mutex::new(FakeState {
                categories,
                transactions,
                budgets,
                ..FakeState::default()
            }),
        }
    }

    /// Backend holding the sample categories, transactions, and one Food budget of 200.
    pub fn sample() -> Self {
        Self::new(
            vec![raw_category(1, "Salary", "income"), raw_category(2, "Food", "expense")],
            vec![
                raw_transaction(1, 1, "1000.00"),
                raw_transaction(2, 2, "200.00"),
                raw_transaction(3, 2, "50.00"),
            ],
            vec![raw_budget(1, 2, "200.00")],
        )
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every call to `endpoint` fail with a network error.
    pub fn fail(&self, endpoint: Endpoint) {
        self.lock().failing.insert(endpoint);
    }

    /// Undoes [`Self::fail`].
    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().failing.remove(&endpoint);
    }

    /// Holds the next budgets fetch open after it has read its data.
    pub fn hold_next_budgets_fetch(&self) -> FetchHold {
        let hold = FetchHold::default();
        self.lock().hold = Some(hold.clone());
        hold
    }

    /// Replaces what `GET /transactions/` returns.
    pub fn set_transactions(&self, transactions: Vec<RawTransaction>) {
        self.lock().transactions = transactions;
    }

    /// Current transaction records.
    pub fn transactions(&self) -> Vec<RawTransaction> {
        self.lock().transactions.clone()
    }

    /// Current budget records.
    pub fn budgets(&self) -> Vec<RawBudget> {
        self.lock().budgets.clone()
    }

    /// How many times `endpoint` was called.
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.iter().filter(|c| **c == endpoint).count()
    }
}

fn next_id<'a>(ids: impl Iterator<Item = Option<&'a RawId>>) -> i64 {
    ids.filter_map(|id| id.and_then(RawId::as_i64)).max().unwrap_or(0) + 1
}

#[async_trait]
impl FinanceDataSource for FakeDataSource {
    async fn fetch_categories(&self) -> Result<Vec<RawCategory>> {
        let mut state = self.lock();
        state.check(Endpoint::Categories)?;
        Ok(state.categories.clone())
    }

    async fn fetch_transactions(&self) -> Result<Vec<RawTransaction>> {
        let mut state = self.lock();
        state.check(Endpoint::Transactions)?;
        Ok(state.transactions.clone())
    }

    async fn fetch_budgets(&self) -> Result<Vec<RawBudget>> {
        let (result, hold) = {
            let mut state = self.lock();
            let result = state
                .check(Endpoint::Budgets)
                .map(|()| state.budgets.clone());
            (result, state.hold.take())
        };
        if let Some(hold) = hold {
            hold.entered.notify_one();
            hold.release.notified().await;
        }
        result
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<()> {
        let mut state = self.lock();
        state.check(Endpoint::CreateTransaction)?;
        let id = next_id(state.transactions.iter().map(|t| t.id.as_ref()));
        state.transactions.push(RawTransaction {
            description: Some(transaction.description.clone()),
            tx_ref: Some(transaction.tx_ref.clone()),
            status: Some(transaction.status.clone()),
            ..raw_transaction(id, transaction.category, &format!("{:.2}", transaction.amount))
        });
        Ok(())
    }

    async fn create_budget(&self, budget: &NewBudget) -> Result<()> {
        let mut state = self.lock();
        state.check(Endpoint::CreateBudget)?;
        let id = next_id(state.budgets.iter().map(|b| b.id.as_ref()));
        state
            .budgets
            .push(raw_budget(id, budget.category, &format!("{:.2}", budget.amount)));
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let mut state = self.lock();
        state.check(Endpoint::DeleteTransaction)?;
        let before = state.transactions.len();
        state
            .transactions
            .retain(|t| t.id.as_ref().and_then(RawId::as_i64) != Some(id));
        if state.transactions.len() == before {
            return Err(Error::Api {
                status: 404,
                message: "Not found.".to_string(),
            });
        }
        Ok(())
    }
}

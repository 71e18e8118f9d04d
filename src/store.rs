//! The store facade: owns the current snapshot and keeps it in sync with the backend.
//!
//! All three collections are replaced wholesale on every successful [`FinanceStore::fetch_all`].
//! Writes go to the backend first and are followed by a full refetch; nothing is merged locally.
//!
//! Overlapping fetches are ordered by a generation counter. Each call takes the next generation
//! when it starts, and its response is applied only if no newer generation has been applied yet.
//! Only the most recently started fetch settles the load state, so a slow, superseded request can
//! neither overwrite fresher data nor flip the state back.

use crate::{
    api::FinanceDataSource,
    config::settings::AggregationSettings,
    core::{dashboard::Dashboard, snapshot::Snapshot},
    entities::{NewBudget, NewTransaction},
    errors::{Error, Result},
    models::TransactionId,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Where the store is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested since start or the last reset
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Ready,
    /// The last fetch failed; the previous snapshot is still served
    Failed,
}

/// What happened to the response of one [`FinanceStore::fetch_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the snapshot
    Applied,
    /// A newer fetch or a reset got there first; the response was dropped
    Superseded,
}

/// Store tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreOptions {
    /// Bound on a whole `fetch_all`; `None` waits for the backend indefinitely
    pub fetch_timeout: Option<Duration>,
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Arc<Snapshot>,
    load_state: LoadState,
    error: Option<String>,
    applied_generation: u64,
}

/// Holds the snapshot the presentation layer reads and runs every fetch and write.
pub struct FinanceStore<S: FinanceDataSource + ?Sized> {
    source: Arc<S>,
    options: StoreOptions,
    state: RwLock<StoreState>,
    generation: AtomicU64,
}

impl<S: FinanceDataSource + ?Sized> std::fmt::Debug for FinanceStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceStore")
            .field("options", &self.options)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<S: FinanceDataSource + ?Sized> FinanceStore<S> {
    /// Empty, idle store over `source`. Nothing is fetched until [`Self::fetch_all`].
    pub fn new(source: Arc<S>, options: StoreOptions) -> Self {
        Self {
            source,
            options,
            state: RwLock::new(StoreState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// The data source this store reads from and writes to.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// The current snapshot. Cheap to call; the snapshot itself is never mutated.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.state.read().await.snapshot)
    }

    /// Where the latest fetch stands.
    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load_state
    }

    /// Message of the last fetch or write failure, cleared by the next successful fetch.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Dashboard figures for `year`, computed from the current snapshot.
    pub async fn dashboard(&self, settings: &AggregationSettings, year: i32) -> Dashboard {
        let snapshot = self.snapshot().await;
        Dashboard::compute(&snapshot, settings, year)
    }

    /// Fetches categories, transactions, and budgets concurrently and replaces the snapshot.
    ///
    /// On failure the previous snapshot stays in place, the store error is set, and the first
    /// error encountered is returned.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<FetchOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.load_state = LoadState::Loading;
        info!("Fetching categories, transactions, and budgets (generation {})", generation);

        let result = self.fetch_snapshot().await;

        let mut state = self.state.write().await;
        let newest = generation == self.generation.load(Ordering::SeqCst);
        match result {
            Ok(snapshot) => {
                if generation <= state.applied_generation {
                    warn!(
                        "Dropping response of generation {}, generation {} already applied",
                        generation, state.applied_generation
                    );
                    return Ok(FetchOutcome::Superseded);
                }
                info!(
                    "Snapshot refreshed: {} categories, {} transactions, {} budgets",
                    snapshot.categories().len(),
                    snapshot.transactions().len(),
                    snapshot.budgets().len()
                );
                state.snapshot = Arc::new(snapshot);
                state.applied_generation = generation;
                if newest {
                    state.load_state = LoadState::Ready;
                    state.error = None;
                }
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                error!("Fetch failed (generation {}): {}", generation, e);
                if newest {
                    state.load_state = LoadState::Failed;
                    state.error = Some(e.to_string());
                } else {
                    debug!("Newer fetch in flight, leaving load state alone");
                }
                Err(e)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let fetches = async {
            tokio::try_join!(
                self.source.fetch_categories(),
                self.source.fetch_transactions(),
                self.source.fetch_budgets(),
            )
        };

        let (categories, transactions, budgets) = match self.options.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetches)
                .await
                .map_err(|_| Error::Timeout { after: limit })??,
            None => fetches.await?,
        };

        Ok(Snapshot::from_raw(&categories, &transactions, &budgets))
    }

    /// Creates a transaction, then refetches everything.
    #[instrument(skip(self, transaction), fields(category = transaction.category))]
    pub async fn add_transaction(&self, transaction: &NewTransaction) -> Result<FetchOutcome> {
        let write = self.source.create_transaction(transaction).await;
        self.after_write(write, "create transaction").await
    }

    /// Creates a budget, then refetches everything.
    #[instrument(skip(self, budget), fields(category = budget.category))]
    pub async fn create_budget(&self, budget: &NewBudget) -> Result<FetchOutcome> {
        let write = self.source.create_budget(budget).await;
        self.after_write(write, "create budget").await
    }

    /// Deletes a transaction, then refetches everything.
    #[instrument(skip(self))]
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<FetchOutcome> {
        let write = self.source.delete_transaction(id).await;
        self.after_write(write, "delete transaction").await
    }

    async fn after_write(&self, write: Result<()>, action: &str) -> Result<FetchOutcome> {
        if let Err(e) = write {
            error!("Failed to {}: {}", action, e);
            self.state.write().await.error = Some(e.to_string());
            return Err(e);
        }
        debug!("{} succeeded, refetching", action);
        self.fetch_all().await
    }

    /// Drops all data and returns to [`LoadState::Idle`]. Fetches still in flight are discarded
    /// when they complete.
    pub async fn reset(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        *state = StoreState {
            applied_generation: generation,
            ..StoreState::default()
        };
        info!("Store reset");
    }
}

//! Core business logic - framework-agnostic normalization, category resolution, aggregation,
//! listing, and form validation.
//!
//! Nothing in here performs I/O. The store feeds it snapshots and the presentation layer reads the
//! results.

/// Dashboard totals, charts, and alerts for one snapshot
pub mod aggregate;
/// Category lookup with placeholder fallback
pub mod category;
/// Everything the dashboard page shows, in one struct
pub mod dashboard;
/// Transaction list filtering and paging
pub mod filter;
/// Backend records to typed domain values
pub mod normalize;
/// Immutable categories/transactions/budgets with derived `spent`
pub mod snapshot;
/// Monthly income/expense series
pub mod trend;
/// Form checks producing request bodies
pub mod validation;

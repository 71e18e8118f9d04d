//! Transaction listing - filtering, ordering, and paging for the transactions view.

use crate::{
    core::category::CategoryIndex,
    models::{Category, CategoryKind, Transaction},
};
use std::cmp::Ordering;

/// Criteria for the transaction list. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only transactions whose resolved kind matches
    pub kind: Option<CategoryKind>,
    /// Only transactions whose resolved category name matches exactly
    pub category_name: Option<String>,
    /// Case-insensitive substring of the description or category name
    pub search: Option<String>,
}

impl TransactionFilter {
    fn matches(&self, tx: &Transaction, index: &CategoryIndex<'_>) -> bool {
        let resolved = index.resolve(tx.category_id);

        if self.kind.is_some_and(|kind| kind != resolved.kind) {
            return false;
        }
        if let Some(name) = &self.category_name
            && resolved.name != name.as_str()
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                tx.description.to_lowercase().contains(&term)
                    || resolved.name.to_lowercase().contains(&term)
            }
        }
    }
}

/// Applies `filter` and orders the result newest first. Undated transactions go last.
#[must_use]
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    categories: &[Category],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    let index = CategoryIndex::new(categories);
    let mut matching: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| filter.matches(tx, &index))
        .collect();

    matching.sort_by(|a, b| match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    matching
}

/// Distinct category names, in category order, for a filter picker.
#[must_use]
pub fn category_names(categories: &[Category]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(categories.len());
    for category in categories {
        if !names.contains(&category.name.as_str()) {
            names.push(&category.name);
        }
    }
    names
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page actually returned
    pub page: usize,
    /// At least 1, even for an empty list
    pub total_pages: usize,
    /// Length of the unpaged list
    pub total_items: usize,
}

/// Slices `items` into pages of `per_page` and returns page `page`.
///
/// `page` is clamped into `1..=total_pages`; a `per_page` of zero is treated as one.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
    }
}

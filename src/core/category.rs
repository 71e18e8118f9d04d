//! Category resolution.
//!
//! Transactions and budgets only carry a category id. Everything that needs a name or an
//! income/expense kind goes through [`CategoryIndex::resolve`]. A missing category is not an
//! error: it resolves to a placeholder name and is counted as an expense, so a transaction with a
//! dangling reference still shows up (as spending) rather than disappearing from the totals.

use crate::models::{Category, CategoryId, CategoryKind};
use std::borrow::Cow;
use std::collections::HashMap;

/// Kind assumed for a category id that is not in the current set.
pub const FALLBACK_KIND: CategoryKind = CategoryKind::Expense;

/// Id given to transactions that arrive without a usable category reference. Backend ids start
/// at 1, so it never matches a real category.
pub const UNCATEGORIZED: CategoryId = 0;

/// Placeholder name for a category id that is not in the current set.
#[must_use]
pub fn fallback_name(id: CategoryId) -> String {
    if id == UNCATEGORIZED {
        "Uncategorized".to_string()
    } else {
        format!("Category {id}")
    }
}

/// Name and kind for a category reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCategory<'a> {
    /// Category id that was looked up
    pub id: CategoryId,
    /// Category name, or the placeholder
    pub name: Cow<'a, str>,
    /// Category kind, or [`FALLBACK_KIND`]
    pub kind: CategoryKind,
    known: bool,
}

impl ResolvedCategory<'_> {
    /// False when the name and kind are the fallback.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        self.known
    }
}

/// Id-keyed lookup over a category set.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex<'a> {
    by_id: HashMap<CategoryId, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    /// Builds the index. On duplicate ids the first category wins.
    #[must_use]
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        for category in categories {
            by_id.entry(category.id).or_insert(category);
        }
        Self { by_id }
    }

    /// The category with `id`, if loaded.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// Resolves `id` to a name and kind, falling back to a placeholder on a miss.
    #[must_use]
    pub fn resolve(&self, id: CategoryId) -> ResolvedCategory<'a> {
        match self.get(id) {
            Some(category) => ResolvedCategory {
                id,
                name: Cow::Borrowed(category.name.as_str()),
                kind: category.kind,
                known: true,
            },
            None => ResolvedCategory {
                id,
                name: Cow::Owned(fallback_name(id)),
                kind: FALLBACK_KIND,
                known: false,
            },
        }
    }

    /// Kind only, with the same fallback as [`Self::resolve`].
    #[must_use]
    pub fn kind_of(&self, id: CategoryId) -> CategoryKind {
        self.get(id).map_or(FALLBACK_KIND, |c| c.kind)
    }

    /// Number of distinct ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when no categories are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// One-off lookup without building an index.
#[must_use]
pub fn resolve(id: CategoryId, categories: &[Category]) -> ResolvedCategory<'_> {
    categories
        .iter()
        .find(|c| c.id == id)
        .map_or_else(
            || ResolvedCategory {
                id,
                name: Cow::Owned(fallback_name(id)),
                kind: FALLBACK_KIND,
                known: false,
            },
            |c| ResolvedCategory {
                id,
                name: Cow::Borrowed(c.name.as_str()),
                kind: c.kind,
                known: true,
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense_category, income_category};

    #[test]
    fn test_resolve_known_category() {
        let categories = vec![income_category(1, "Salary"), expense_category(2, "Food")];
        let index = CategoryIndex::new(&categories);

        let resolved = index.resolve(1);
        assert!(resolved.is_known());
        assert_eq!(resolved.name, "Salary");
        assert_eq!(resolved.kind, CategoryKind::Income);
        assert_eq!(index.kind_of(2), CategoryKind::Expense);
    }

    #[test]
    fn test_unknown_category_falls_back_to_expense_with_placeholder() {
        let categories = vec![income_category(1, "Salary")];
        let index = CategoryIndex::new(&categories);

        let resolved = index.resolve(99);
        assert!(!resolved.is_known());
        assert_eq!(resolved.kind, CategoryKind::Expense);
        assert!(resolved.name.contains("99"));
        assert_eq!(index.kind_of(99), CategoryKind::Expense);
    }

    #[test]
    fn test_unknown_category_in_empty_set() {
        let index = CategoryIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.resolve(3).name, "Category 3");
    }

    #[test]
    fn test_uncategorized_placeholder() {
        let index = CategoryIndex::new(&[]);
        let resolved = index.resolve(UNCATEGORIZED);
        assert!(!resolved.is_known());
        assert_eq!(resolved.name, "Uncategorized");
        assert_eq!(resolved.kind, CategoryKind::Expense);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let categories = vec![expense_category(4, "Rent"), income_category(4, "Refund")];
        let index = CategoryIndex::new(&categories);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve(4).name, "Rent");
    }

    #[test]
    fn test_linear_resolve_matches_index() {
        let categories = vec![income_category(1, "Salary"), expense_category(2, "Food")];
        let index = CategoryIndex::new(&categories);
        for id in [1, 2, 42] {
            assert_eq!(resolve(id, &categories), index.resolve(id));
        }
    }
}

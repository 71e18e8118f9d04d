//! Entity normalization - turns loose backend records into typed domain values.
//!
//! The backend is trusted but loosely typed: decimals arrive as strings, optional fields come and
//! go, and dates use more than one format. Normalization never fails. A field that cannot be read
//! falls back to a neutral default (zero amount, empty text, no date) and a warning is logged so
//! the record still reaches the dashboard. Only a record nothing could ever refer to, one without
//! a usable id, is dropped, and only that record.

use crate::{
    core::category::{UNCATEGORIZED, fallback_name},
    entities::{RawAmount, RawBudget, RawCategory, RawId, RawTransaction},
    models::{Budget, Category, CategoryKind, Transaction},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

/// Label used when a transaction carries no payment method.
pub const DEFAULT_PAYMENT_METHOD: &str = "Not specified";

/// Parses a decimal field. Missing or unreadable values become `0.0`.
#[must_use]
pub fn parse_amount(raw: Option<&RawAmount>) -> f64 {
    let value = match raw {
        None => return 0.0,
        Some(RawAmount::Number(n)) => *n,
        Some(RawAmount::Text(text)) => match text.trim().parse::<f64>() {
            Ok(n) => n,
            Err(e) => {
                warn!("Unreadable amount {:?}: {}", text, e);
                return 0.0;
            }
        },
    };

    if value.is_finite() {
        value
    } else {
        warn!("Non-finite amount {} replaced with 0", value);
        0.0
    }
}

/// Parses a date in any of the formats the backend has been seen to send.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamps.
#[must_use]
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            warn!("Unreadable date {:?}", text);
            None
        })
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let text = raw?.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
        })
        .ok()
}

fn user_label(raw: Option<&serde_json::Value>) -> Option<String> {
    match raw? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads an id or foreign key. Numeric strings are accepted.
#[must_use]
pub fn parse_id(raw: Option<&RawId>) -> Option<i64> {
    raw?.as_i64()
}

/// Normalizes a category. A category without a usable id cannot be referenced and is dropped.
#[must_use]
pub fn normalize_category(raw: &RawCategory) -> Option<Category> {
    let Some(id) = parse_id(raw.id.as_ref()) else {
        warn!("Dropping category without a usable id: {:?}", raw.id);
        return None;
    };

    Some(Category {
        id,
        name: raw
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name(id)),
        kind: CategoryKind::from_wire(raw.kind.as_deref()),
        priority: raw.priority.clone(),
    })
}

/// Normalizes a transaction. Without a usable id it is dropped; without a usable category it is
/// kept under [`UNCATEGORIZED`].
#[must_use]
pub fn normalize_transaction(raw: &RawTransaction) -> Option<Transaction> {
    let Some(id) = parse_id(raw.id.as_ref()) else {
        warn!("Dropping transaction without a usable id: {:?}", raw.id);
        return None;
    };
    let category_id = parse_id(raw.category.as_ref()).unwrap_or_else(|| {
        warn!(
            "Transaction {} has no usable category ({:?}), counting it as uncategorized",
            id, raw.category
        );
        UNCATEGORIZED
    });

    let amount = parse_amount(raw.amount.as_ref());
    if amount < 0.0 {
        warn!(
            "Transaction {} has negative amount {}, keeping as sent",
            id, amount
        );
    }

    Some(Transaction {
        id,
        category_id,
        amount,
        description: raw.description.clone().unwrap_or_default(),
        date: parse_date(raw.date.as_deref()),
        created_at: parse_timestamp(raw.created_at.as_deref()),
        status: raw.status.clone().unwrap_or_default(),
        reference: raw.tx_ref.clone().unwrap_or_default(),
        payment_method: raw
            .payment_method
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        user: user_label(raw.user.as_ref()),
    })
}

/// Normalizes a budget. `spent` starts at zero; the store derives it from transactions.
///
/// A budget needs both its id and its category; without either it is dropped.
#[must_use]
pub fn normalize_budget(raw: &RawBudget) -> Option<Budget> {
    let (Some(id), Some(category_id)) = (parse_id(raw.id.as_ref()), parse_id(raw.category.as_ref()))
    else {
        warn!(
            "Dropping budget without a usable id or category: id {:?}, category {:?}",
            raw.id, raw.category
        );
        return None;
    };

    let transaction = parse_id(raw.transaction.as_ref());
    if transaction.is_none() && raw.transaction.is_some() {
        warn!("Budget {} has unreadable transaction link {:?}", id, raw.transaction);
    }

    Some(Budget {
        id,
        category_id,
        limit: parse_amount(raw.amount.as_ref()),
        spent: 0.0,
        period: raw.month.clone(),
        due_date: parse_date(raw.due_date.as_deref()),
        transaction,
        user: user_label(raw.user.as_ref()),
    })
}

/// Normalizes every category, skipping unusable ones.
#[must_use]
pub fn normalize_categories(raw: &[RawCategory]) -> Vec<Category> {
    raw.iter().filter_map(normalize_category).collect()
}

/// Normalizes every transaction, skipping unusable ones.
#[must_use]
pub fn normalize_transactions(raw: &[RawTransaction]) -> Vec<Transaction> {
    raw.iter().filter_map(normalize_transaction).collect()
}

/// Normalizes every budget, skipping unusable ones.
#[must_use]
pub fn normalize_budgets(raw: &[RawBudget]) -> Vec<Budget> {
    raw.iter().filter_map(normalize_budget).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_amount_accepts_strings_and_numbers() {
        assert_eq!(parse_amount(Some(&RawAmount::from("12.50"))), 12.5);
        assert_eq!(parse_amount(Some(&RawAmount::from(" 7 "))), 7.0);
        assert_eq!(parse_amount(Some(&RawAmount::from(3.25))), 3.25);
    }

    #[test]
    fn test_parse_amount_falls_back_to_zero() {
        assert_eq!(parse_amount(None), 0.0);
        assert_eq!(parse_amount(Some(&RawAmount::from("abc"))), 0.0);
        assert_eq!(parse_amount(Some(&RawAmount::from(""))), 0.0);
        assert_eq!(parse_amount(Some(&RawAmount::from("NaN"))), 0.0);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_date(Some("2025-03-14")), expected);
        assert_eq!(parse_date(Some("2025-03-14T10:30:00Z")), expected);
        assert_eq!(parse_date(Some("2025-03-14T10:30:00.123456+01:00")), expected);
        assert_eq!(parse_date(Some("2025-03-14T10:30:00.5")), expected);
        assert_eq!(parse_date(Some("14/03/2025")), None);
        assert_eq!(parse_date(Some("")), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn test_normalize_transaction_from_backend_json() -> serde_json::Result<()> {
        let raw: RawTransaction = serde_json::from_str(
            r#"{
                "id": 7,
                "user": 3,
                "category": 2,
                "amount": "45.10",
                "description": "Groceries",
                "tx_ref": "tx-1700000000000",
                "status": "Success",
                "date": "2025-06-01",
                "created_at": "2025-06-01T09:15:00Z"
            }"#,
        )?;

        let tx = normalize_transaction(&raw).unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.category_id, 2);
        assert_eq!(tx.amount, 45.1);
        assert_eq!(tx.description, "Groceries");
        assert_eq!(tx.reference, "tx-1700000000000");
        assert_eq!(tx.status, "Success");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(tx.created_at.is_some());
        assert_eq!(tx.payment_method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(tx.user.as_deref(), Some("3"));
        Ok(())
    }

    #[test]
    fn test_normalize_transaction_with_missing_fields_is_partial() -> serde_json::Result<()> {
        let raw: RawTransaction = serde_json::from_str(r#"{"id": 1, "category": 4}"#)?;
        let tx = normalize_transaction(&raw).unwrap();
        assert_eq!(tx.amount, 0.0);
        assert_eq!(tx.description, "");
        assert_eq!(tx.date, None);
        assert_eq!(tx.user, None);
        Ok(())
    }

    #[test]
    fn test_normalize_budget_reads_limit_from_amount() -> serde_json::Result<()> {
        let raw: RawBudget = serde_json::from_str(
            r#"{"id": 5, "user": "alice", "category": 2, "amount": "200.00",
                "month": "2025-06", "due_date": null, "transaction": null}"#,
        )?;
        let budget = normalize_budget(&raw).unwrap();
        assert_eq!(budget.limit, 200.0);
        assert_eq!(budget.spent, 0.0);
        assert_eq!(budget.period.as_deref(), Some("2025-06"));
        assert_eq!(budget.user.as_deref(), Some("alice"));
        Ok(())
    }

    #[test]
    fn test_normalize_category_defaults() -> serde_json::Result<()> {
        let raw: RawCategory =
            serde_json::from_str(r#"{"id": 9, "name": "Salary", "type": "income", "priority": null}"#)?;
        let category = normalize_category(&raw).unwrap();
        assert_eq!(category.name, "Salary");
        assert_eq!(category.kind, CategoryKind::Income);

        let unnamed: RawCategory = serde_json::from_str(r#"{"id": 10}"#)?;
        let category = normalize_category(&unnamed).unwrap();
        assert_eq!(category.name, "Category 10");
        assert_eq!(category.kind, CategoryKind::Expense);
        Ok(())
    }

    #[test]
    fn test_parse_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_id(Some(&RawId::from(4))), Some(4));
        assert_eq!(parse_id(Some(&RawId::Text(" 12 ".to_string()))), Some(12));
        assert_eq!(parse_id(Some(&RawId::Text("x".to_string()))), None);
        assert_eq!(parse_id(Some(&RawId::Other(serde_json::json!(1.5)))), None);
        assert_eq!(parse_id(None), None);
    }

    #[test]
    fn test_one_bad_transaction_does_not_sink_the_list() -> serde_json::Result<()> {
        let raw: Vec<RawTransaction> = serde_json::from_str(
            r#"[
                {"id": 1, "category": 2, "amount": "5.00"},
                {"id": 2, "category": null, "amount": "3.00"},
                {"id": 3, "category": "2", "amount": "4.00"},
                {"id": 4, "category": true, "amount": "1.00"},
                {"id": null, "category": 2, "amount": "9.00"},
                {"id": "5", "amount": "2.00"}
            ]"#,
        )?;
        assert_eq!(raw.len(), 6);

        let transactions = normalize_transactions(&raw);
        let ids: Vec<i64> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let categories: Vec<i64> = transactions.iter().map(|t| t.category_id).collect();
        assert_eq!(categories, vec![2, UNCATEGORIZED, 2, UNCATEGORIZED, UNCATEGORIZED]);
        assert_eq!(transactions[1].amount, 3.0);
        Ok(())
    }

    #[test]
    fn test_unusable_budgets_are_dropped_individually() -> serde_json::Result<()> {
        let raw: Vec<RawBudget> = serde_json::from_str(
            r#"[
                {"id": 1, "category": 2, "amount": "200.00", "transaction": "x"},
                {"id": 2, "category": null, "amount": "50.00"},
                {"id": "3", "category": "4", "amount": "10.00", "transaction": "8"}
            ]"#,
        )?;

        let budgets = normalize_budgets(&raw);
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].id, 1);
        assert_eq!(budgets[0].transaction, None);
        assert_eq!(budgets[1].id, 3);
        assert_eq!(budgets[1].category_id, 4);
        assert_eq!(budgets[1].transaction, Some(8));
        Ok(())
    }

    #[test]
    fn test_category_without_id_is_dropped() -> serde_json::Result<()> {
        let raw: Vec<RawCategory> = serde_json::from_str(
            r#"[{"id": 1, "name": "Salary", "type": "income"}, {"name": "Orphan"}]"#,
        )?;
        let categories = normalize_categories(&raw);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Salary");
        Ok(())
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, CategoryType, Transaction};
use crate::utils::month_key;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Longest trend window, in months.
pub const MAX_TREND_MONTHS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Category lookup by id. Unknown ids resolve to an expense named "Unknown".
pub struct CategoryIndex<'a> {
    by_id: HashMap<Uuid, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self {
            by_id: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn kind(&self, id: Uuid) -> CategoryType {
        self.by_id
            .get(&id)
            .map(|c| c.r#type)
            .unwrap_or(CategoryType::Expense)
    }

    pub fn name(&self, id: Uuid) -> &str {
        self.by_id
            .get(&id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    pub fn is_income(&self, id: Uuid) -> bool {
        self.kind(id) == CategoryType::Income
    }
}

pub fn summarize(transactions: &[Transaction], categories: &[Category]) -> Summary {
    let index = CategoryIndex::new(categories);
    let mut summary = Summary::default();
    for tx in transactions {
        if index.is_income(tx.category_id) {
            summary.income += tx.amount;
        } else {
            summary.expense += tx.amount;
        }
    }
    summary.net = summary.income - summary.expense;
    summary
}

/// Expense totals per category name, largest first (ties by name).
pub fn expense_by_category(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let index = CategoryIndex::new(categories);
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| !index.is_income(tx.category_id))
    {
        *totals
            .entry(index.name(tx.category_id))
            .or_insert(Decimal::ZERO) += tx.amount;
    }
    let mut items: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Income and expense per month for the `months` months ending with `last_month`.
///
/// Months without transactions are reported with zero totals. The window is
/// capped at [`MAX_TREND_MONTHS`].
pub fn monthly_trend(
    transactions: &[Transaction],
    categories: &[Category],
    last_month: NaiveDate,
    months: u32,
) -> Vec<MonthTotals> {
    let index = CategoryIndex::new(categories);
    let anchor = last_month.with_day(1).unwrap_or(last_month);
    let mut buckets: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for back in 0..months.min(MAX_TREND_MONTHS) {
        if let Some(m) = anchor.checked_sub_months(Months::new(back)) {
            buckets.insert(month_key(m), (Decimal::ZERO, Decimal::ZERO));
        }
    }
    for tx in transactions {
        if let Some(entry) = buckets.get_mut(&month_key(tx.date)) {
            if index.is_income(tx.category_id) {
                entry.0 += tx.amount;
            } else {
                entry.1 += tx.amount;
            }
        }
    }
    buckets
        .into_iter()
        .map(|(month, (income, expense))| MonthTotals {
            month,
            income,
            expense,
        })
        .collect()
}

/// The latest `n` transactions, newest first.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(n);
    sorted
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::{AppContext, Notices, ViewToken};
use crate::commands::expenses::upcoming_table;
use crate::models::{Category, ExpenseDefinition, MonthlyNote, Transaction, TransactionFilter};
use crate::schedule;
use crate::store::FinanceStore;
use crate::summary::{self, CategoryIndex, CategoryTotal, MonthTotals, Summary};
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, month_bounds, parse_month, pretty_table, today};
use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

pub const RECENT_COUNT: usize = 5;

#[derive(Debug, Clone)]
pub struct DashboardQuery {
    pub year: i32,
    pub month: u32,
    /// Length of the trend window, ending with `month`.
    pub months: u32,
    pub today: NaiveDate,
    pub domain: String,
}

#[derive(Debug, Default, Serialize)]
pub struct DashboardData {
    pub month: String,
    pub summary: Summary,
    pub expense_by_category: Vec<CategoryTotal>,
    pub trend: Vec<MonthTotals>,
    pub recent: Vec<Transaction>,
    pub upcoming: Vec<ExpenseDefinition>,
    pub note: Option<MonthlyNote>,
    #[serde(skip)]
    pub categories: Vec<Category>,
}

pub fn handle(store: &dyn FinanceStore, ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    let now = today();
    let (year, month) = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => (now.year(), now.month()),
    };
    let query = DashboardQuery {
        year,
        month,
        months: *m.get_one::<u32>("months").unwrap(),
        today: now,
        domain: ctx.settings.note_domain.clone(),
    };
    let token = ctx.views.begin();
    let Some(data) = load(store, &mut ctx.notices, &token, &query)? else {
        return Ok(());
    };
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &data)? {
        render(&data, now);
    }
    Ok(())
}

/// Loads every dashboard section.
///
/// Sections load independently: one that fails is reported as a warning
/// notice and shows up empty. Returns `None` when the view was torn down
/// while loading.
pub fn load(
    store: &dyn FinanceStore,
    notices: &mut Notices,
    token: &ViewToken,
    q: &DashboardQuery,
) -> Result<Option<DashboardData>> {
    let (start, end) = month_bounds(q.year, q.month)?;
    let months = q.months.clamp(1, summary::MAX_TREND_MONTHS);
    let window_start = start
        .checked_sub_months(Months::new(months - 1))
        .unwrap_or(start);

    let categories = notices.degrade("categories", store.list_categories());
    let month_txs = notices.degrade(
        "transactions",
        store.list_transactions(&TransactionFilter::between(start, end)),
    );
    let window_txs = notices.degrade(
        "trend",
        store.list_transactions(&TransactionFilter::between(window_start, end)),
    );
    let active = notices.degrade("upcoming expenses", store.list_expenses(Some(true)));
    let note = notices.degrade("monthly note", store.monthly_note(q.year, q.month, &q.domain));

    let data = DashboardData {
        month: format!("{:04}-{:02}", q.year, q.month),
        summary: summary::summarize(&month_txs, &categories),
        expense_by_category: summary::expense_by_category(&month_txs, &categories),
        trend: summary::monthly_trend(&window_txs, &categories, start, months),
        recent: summary::recent(&month_txs, RECENT_COUNT),
        upcoming: schedule::upcoming(&active, q.today)
            .into_iter()
            .cloned()
            .collect(),
        note,
        categories,
    };
    Ok(token.guard(data))
}

fn render(data: &DashboardData, now: NaiveDate) {
    println!("Dashboard {}", data.month);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Net"],
            vec![vec![
                fmt_money(&data.summary.income),
                fmt_money(&data.summary.expense),
                fmt_money(&data.summary.net),
            ]],
        )
    );

    if !data.expense_by_category.is_empty() {
        let rows = data
            .expense_by_category
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.amount)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }

    let rows = data
        .trend
        .iter()
        .map(|t| {
            vec![
                t.month.clone(),
                fmt_money(&t.income),
                fmt_money(&t.expense),
                fmt_money(&(t.income - t.expense)),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));

    if !data.recent.is_empty() {
        let index = CategoryIndex::new(&data.categories);
        let rows = data
            .recent
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    fmt_opt(t.description.as_deref()),
                    index.name(t.category_id).to_string(),
                    fmt_money(&t.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Category", "Amount"], rows)
        );
    }

    if !data.upcoming.is_empty() {
        println!("Upcoming");
        println!("{}", upcoming_table(&data.upcoming, now));
    }

    if let Some(note) = &data.note {
        println!("Notes\n{}", note.notes);
    }
}

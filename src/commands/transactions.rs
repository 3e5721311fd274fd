// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewTransaction, Transaction, TransactionFilter};
use crate::store::FinanceStore;
use crate::utils::{
    fmt_money, fmt_opt, id_for_category, id_for_expense, id_for_property, maybe_print_json,
    month_bounds, parse_date, parse_decimal, parse_id, parse_month, pretty_table,
};
use anyhow::{Context, Result};
use std::collections::HashMap;
use uuid::Uuid;

pub fn handle(store: &dyn FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let tx = add(store, sub)?;
            println!(
                "Recorded {} on {}{}",
                fmt_money(&tx.amount),
                tx.date,
                tx.description
                    .as_deref()
                    .map(|d| format!(" for '{}'", d))
                    .unwrap_or_default()
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => {
            let id = parse_id(sub.get_one::<String>("ID").unwrap())?;
            let tx = store.get_transaction(id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tx)? {
                let data = vec![tx];
                println!("{}", pretty_table(HEADERS, rows(store, &data)?));
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("ID").unwrap())?;
            store.delete_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Transaction> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category_id = id_for_category(store, sub.get_one::<String>("category").unwrap())?;
    let property_id = match sub.get_one::<String>("property") {
        Some(p) => id_for_property(store, p)?,
        None => {
            store
                .default_property()?
                .context("No property exists; add one with `homeledger property add`")?
                .id
        }
    };
    let expense_id = sub
        .get_one::<String>("expense")
        .map(|s| id_for_expense(store, s))
        .transpose()?;
    let tags = sub.get_one::<String>("tags").map(|s| {
        s.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
    });
    let new = NewTransaction {
        property_id,
        date,
        amount,
        category_id,
        expense_id,
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string()),
        tags,
        payment_method: sub
            .get_one::<String>("payment-method")
            .map(|s| s.trim().to_string()),
        notes: sub.get_one::<String>("notes").map(|s| s.trim().to_string()),
    };
    store
        .create_transaction(&new)
        .context("Failed to record transaction")
}

fn list(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = query(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(HEADERS, rows(store, &data)?));
    }
    Ok(())
}

/// Builds the store filter from the list flags.
pub fn filter_from(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::default();
    if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        let (start, end) = month_bounds(y, m)?;
        filter.start_date = Some(start);
        filter.end_date = Some(end);
    }
    if let Some(from) = sub.get_one::<String>("from") {
        filter.start_date = Some(parse_date(from)?);
    }
    if let Some(to) = sub.get_one::<String>("to") {
        filter.end_date = Some(parse_date(to)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        filter.category_id = Some(id_for_category(store, cat)?);
    }
    filter.limit = sub.get_one::<u32>("limit").copied();
    filter.offset = sub.get_one::<u32>("offset").copied();
    Ok(filter)
}

pub fn query(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = filter_from(store, sub)?;
    Ok(store.list_transactions(&filter)?)
}

const HEADERS: &[&str] = &[
    "Date",
    "Amount",
    "Category",
    "Property",
    "Description",
    "Tags",
    "Id",
];

fn rows(store: &dyn FinanceStore, data: &[Transaction]) -> Result<Vec<Vec<String>>> {
    let categories: HashMap<Uuid, String> = store
        .list_categories()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let properties: HashMap<Uuid, String> = store
        .list_properties()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    Ok(data
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                fmt_money(&t.amount),
                categories.get(&t.category_id).cloned().unwrap_or_default(),
                properties.get(&t.property_id).cloned().unwrap_or_default(),
                fmt_opt(t.description.as_deref()),
                t.tags.as_ref().map(|t| t.join(", ")).unwrap_or_default(),
                t.id.to_string(),
            ]
        })
        .collect())
}

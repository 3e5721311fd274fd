// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExpenseDefinition, ExpensePatch, ExpenseType, GenerateRequest, Generated, NewExpense};
use crate::schedule::{self, remaining_payments};
use crate::store::FinanceStore;
use crate::utils::{
    fmt_money, fmt_opt, id_for_category, id_for_expense, id_for_property, maybe_print_json,
    parse_bool, parse_date, parse_decimal, pretty_table, today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

pub fn handle(store: &dyn FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let e = add(store, sub)?;
            println!(
                "Added {} expense '{}' due on day {}",
                e.expense_type, e.name, e.day_of_month
            );
        }
        Some(("list", sub)) => {
            let data = query(store, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", table(store, &data)?);
            }
        }
        Some(("show", sub)) => {
            let id = id_for_expense(store, sub.get_one::<String>("EXPENSE").unwrap())?;
            let e = store.get_expense(id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &e)? {
                println!("{}", table(store, std::slice::from_ref(&e))?);
                if let Some(notes) = &e.notes {
                    println!("Notes: {}", notes);
                }
            }
        }
        Some(("edit", sub)) => {
            let e = edit(store, sub)?;
            println!("Updated expense '{}'", e.name);
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("EXPENSE").unwrap();
            let id = id_for_expense(store, key)?;
            store.delete_expense(id)?;
            println!("Removed expense '{}'", key.trim());
        }
        Some(("generate", sub)) => {
            let g = generate(store, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &g)? {
                println!(
                    "Recorded {} on {} from '{}'",
                    fmt_money(&g.transaction.amount),
                    g.transaction.date,
                    g.expense.name
                );
                if let (Some(total), ExpenseType::Installment) =
                    (g.expense.total_payments, g.expense.expense_type)
                {
                    println!("Payments: {}/{}", g.expense.payments_completed, total);
                }
            }
        }
        Some(("upcoming", sub)) => {
            let day = match sub.get_one::<String>("date") {
                Some(s) => parse_date(s)?,
                None => today(),
            };
            let active = store.list_expenses(Some(true))?;
            let due: Vec<ExpenseDefinition> = schedule::upcoming(&active, day)
                .into_iter()
                .cloned()
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &due)? {
                println!("{}", upcoming_table(&due, day));
            }
        }
        _ => {}
    }
    Ok(())
}

fn opt_decimal(sub: &clap::ArgMatches, id: &str) -> Result<Option<rust_decimal::Decimal>> {
    sub.get_one::<String>(id).map(|s| parse_decimal(s)).transpose()
}

pub fn add(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<ExpenseDefinition> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let category_id = id_for_category(store, sub.get_one::<String>("category").unwrap())?;
    let expense_type: ExpenseType = sub.get_one::<String>("type").unwrap().parse()?;
    let start_date = match sub.get_one::<String>("start") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let new = NewExpense {
        name,
        amount: opt_decimal(sub, "amount")?,
        category_id,
        day_of_month: *sub.get_one::<u32>("day").unwrap(),
        expense_type,
        start_date,
        total_payments: sub.get_one::<u32>("payments").copied(),
        notes: sub.get_one::<String>("notes").map(|s| s.trim().to_string()),
    };
    store
        .create_expense(&new)
        .with_context(|| format!("Failed to add expense '{}'", new.name))
}

pub fn query(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Vec<ExpenseDefinition>> {
    let filter = if sub.get_flag("active") {
        Some(true)
    } else if sub.get_flag("inactive") {
        Some(false)
    } else {
        None
    };
    let mut data = store.list_expenses(filter)?;
    if let Some(kind) = sub.get_one::<String>("type") {
        let kind: ExpenseType = kind.parse()?;
        data.retain(|e| e.expense_type == kind);
    }
    Ok(data)
}

pub fn edit(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<ExpenseDefinition> {
    let id = id_for_expense(store, sub.get_one::<String>("EXPENSE").unwrap())?;
    let patch = ExpensePatch {
        name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
        amount: opt_decimal(sub, "amount")?,
        category_id: sub
            .get_one::<String>("category")
            .map(|s| id_for_category(store, s))
            .transpose()?,
        day_of_month: sub.get_one::<u32>("day").copied(),
        expense_type: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<ExpenseType>())
            .transpose()?,
        start_date: sub
            .get_one::<String>("start")
            .map(|s| parse_date(s))
            .transpose()?,
        total_payments: sub.get_one::<u32>("payments").copied(),
        payments_completed: None,
        is_active: sub
            .get_one::<String>("active")
            .map(|s| parse_bool(s))
            .transpose()?,
        notes: sub.get_one::<String>("notes").map(|s| s.trim().to_string()),
    };
    Ok(store.update_expense(id, &patch)?)
}

pub fn generate(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Generated> {
    let id = id_for_expense(store, sub.get_one::<String>("EXPENSE").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let property_id: Option<Uuid> = sub
        .get_one::<String>("property")
        .map(|s| id_for_property(store, s))
        .transpose()?;
    let request = GenerateRequest {
        date,
        notes: sub.get_one::<String>("notes").map(|s| s.trim().to_string()),
        amount: opt_decimal(sub, "amount")?,
        property_id,
    };
    Ok(store.generate_transaction(id, &request)?)
}

fn payments_cell(e: &ExpenseDefinition) -> String {
    match (e.expense_type, e.total_payments) {
        (ExpenseType::Installment, Some(total)) => format!(
            "{}/{} ({} left)",
            e.payments_completed,
            total,
            fmt_opt(remaining_payments(e))
        ),
        _ => String::new(),
    }
}

fn table(store: &dyn FinanceStore, data: &[ExpenseDefinition]) -> Result<comfy_table::Table> {
    let names: HashMap<Uuid, String> = store
        .list_categories()?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|e| {
            vec![
                e.name.clone(),
                e.amount
                    .map(|a| fmt_money(&a))
                    .unwrap_or_else(|| "variable".to_string()),
                names.get(&e.category_id).cloned().unwrap_or_default(),
                e.day_of_month.to_string(),
                e.expense_type.to_string(),
                payments_cell(e),
                if e.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    Ok(pretty_table(
        &["Expense", "Amount", "Category", "Day", "Type", "Payments", "Active"],
        rows,
    ))
}

pub fn upcoming_table(due: &[ExpenseDefinition], day: NaiveDate) -> comfy_table::Table {
    use chrono::Datelike;
    let rows: Vec<Vec<String>> = due
        .iter()
        .map(|e| {
            vec![
                fmt_opt(schedule::due_date(e, day.year(), day.month())),
                e.name.clone(),
                e.amount
                    .map(|a| fmt_money(&a))
                    .unwrap_or_else(|| "variable".to_string()),
                payments_cell(e),
            ]
        })
        .collect();
    pretty_table(&["Due", "Expense", "Amount", "Payments"], rows)
}

// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::color::{color_after_rename, initial_color};
use crate::models::{Category, CategoryPatch, CategoryType, NewCategory};
use crate::store::FinanceStore;
use crate::utils::{fmt_opt, id_for_category, maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(store: &dyn FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let cat = add(store, sub)?;
            println!(
                "Added {} category '{}' ({})",
                cat.r#type,
                cat.name,
                fmt_opt(cat.color.as_deref())
            );
        }
        Some(("list", sub)) => {
            let data = query(store, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", table(&data));
            }
        }
        Some(("show", sub)) => {
            let id = id_for_category(store, sub.get_one::<String>("CATEGORY").unwrap())?;
            let cat = store.get_category(id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cat)? {
                println!("{}", table(std::slice::from_ref(&cat)));
            }
        }
        Some(("edit", sub)) => {
            let cat = edit(store, sub)?;
            println!("Updated category '{}'", cat.name);
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("CATEGORY").unwrap();
            let id = id_for_category(store, key)?;
            store.delete_category(id)?;
            println!("Removed category '{}'", key.trim());
        }
        _ => {}
    }
    Ok(())
}

pub fn add(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Category> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let kind: CategoryType = sub.get_one::<String>("type").unwrap().parse()?;
    let explicit = sub.get_one::<String>("color").map(|s| s.trim());
    let color = initial_color(&name, explicit)?;
    let cat = store
        .create_category(&NewCategory {
            name,
            r#type: kind,
            color: Some(color),
        })
        .context("Failed to add category")?;
    Ok(cat)
}

pub fn query(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Vec<Category>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<CategoryType>())
        .transpose()?;
    let mut cats = store.list_categories()?;
    if let Some(kind) = kind {
        cats.retain(|c| c.r#type == kind);
    }
    Ok(cats)
}

/// Applies the edit flags. A rename recolors the category unless its color was
/// set by hand.
pub fn edit(store: &dyn FinanceStore, sub: &clap::ArgMatches) -> Result<Category> {
    let id = id_for_category(store, sub.get_one::<String>("CATEGORY").unwrap())?;
    let current = store.get_category(id)?;
    let mut patch = CategoryPatch {
        name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
        r#type: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<CategoryType>())
            .transpose()?,
        color: sub.get_one::<String>("color").map(|s| s.trim().to_string()),
    };
    if patch.color.is_none() {
        if let Some(new_name) = &patch.name {
            let recolored =
                color_after_rename(&current.name, current.color.as_deref(), new_name);
            if current.color.as_deref() != Some(recolored.as_str()) {
                patch.color = Some(recolored);
            }
        }
    }
    Ok(store.update_category(id, &patch)?)
}

fn table(cats: &[Category]) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = cats
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.r#type.to_string(),
                fmt_opt(c.color.as_deref()),
                c.id.to_string(),
            ]
        })
        .collect();
    pretty_table(&["Category", "Type", "Color", "Id"], rows)
}

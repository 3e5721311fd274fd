// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewProperty, Property, PropertyPatch};
use crate::store::FinanceStore;
use crate::utils::{id_for_property, maybe_print_json, parse_bool, pretty_table};
use anyhow::Result;

pub fn handle(store: &dyn FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewProperty {
                name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                is_active: !sub.get_flag("inactive"),
                is_default: sub.get_flag("default"),
            };
            let p = store.create_property(&new)?;
            println!(
                "Added property '{}'{}",
                p.name,
                if p.is_default { " (default)" } else { "" }
            );
        }
        Some(("list", sub)) => {
            let data = store.list_properties()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", table(&data));
            }
        }
        Some(("show", sub)) => {
            let id = id_for_property(store, sub.get_one::<String>("PROPERTY").unwrap())?;
            let p = store.get_property(id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
                println!("{}", table(std::slice::from_ref(&p)));
            }
        }
        Some(("edit", sub)) => {
            let id = id_for_property(store, sub.get_one::<String>("PROPERTY").unwrap())?;
            let patch = PropertyPatch {
                name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
                is_active: sub
                    .get_one::<String>("active")
                    .map(|s| parse_bool(s))
                    .transpose()?,
                is_default: sub
                    .get_one::<String>("default")
                    .map(|s| parse_bool(s))
                    .transpose()?,
            };
            let p = store.update_property(id, &patch)?;
            println!("Updated property '{}'", p.name);
        }
        Some(("rm", sub)) => {
            let key = sub.get_one::<String>("PROPERTY").unwrap();
            let id = id_for_property(store, key)?;
            store.delete_property(id)?;
            println!("Removed property '{}'", key.trim());
        }
        Some(("default", sub)) => {
            let id = id_for_property(store, sub.get_one::<String>("PROPERTY").unwrap())?;
            let p = store.update_property(
                id,
                &PropertyPatch {
                    is_default: Some(true),
                    ..PropertyPatch::default()
                },
            )?;
            println!("'{}' is now the default property", p.name);
        }
        _ => {}
    }
    Ok(())
}

fn table(props: &[Property]) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = props
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                if p.is_active { "yes" } else { "no" }.to_string(),
                if p.is_default { "*" } else { "" }.to_string(),
                p.id.to_string(),
            ]
        })
        .collect();
    pretty_table(&["Property", "Active", "Default", "Id"], rows)
}

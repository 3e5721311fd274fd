// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{MonthlyNote, NotePatch, NoteUpsert, period_label};
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, parse_id, parse_month, pretty_table};
use anyhow::{Result, anyhow};

/// `default_domain` applies when `--domain` is not given.
pub fn handle(store: &dyn FinanceStore, default_domain: &str, m: &clap::ArgMatches) -> Result<()> {
    let domain_of = |sub: &clap::ArgMatches| -> String {
        sub.get_one::<String>("domain")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| default_domain.to_string())
    };
    match m.subcommand() {
        Some(("list", sub)) => {
            let data = store.list_monthly_notes(&domain_of(sub))?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                println!("{}", table(&data));
            }
        }
        Some(("show", sub)) => {
            let note = show(store, &domain_of(sub), sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &note)? {
                match note {
                    Some(n) => println!("{}", n.notes),
                    None => {
                        let (year, month) = period(sub)?;
                        println!("No note for {}", period_label(year, month));
                    }
                }
            }
        }
        Some(("set", sub)) => {
            let note = set(store, &domain_of(sub), sub)?;
            println!("Saved note for {} ({})", note.period(), note.domain);
        }
        Some(("edit", sub)) => {
            let id = parse_id(sub.get_one::<String>("ID").unwrap())?;
            let note = store.update_monthly_note(
                id,
                &NotePatch {
                    notes: sub.get_one::<String>("text").cloned(),
                },
            )?;
            println!("Updated note for {}", note.period());
        }
        Some(("rm", sub)) => {
            let id = parse_id(sub.get_one::<String>("ID").unwrap())?;
            store.delete_monthly_note(id)?;
            println!("Removed note {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// `(year, Some(month))` for `--month`, `(year, None)` for `--year`.
pub fn period(sub: &clap::ArgMatches) -> Result<(i32, Option<u32>)> {
    match sub.get_one::<String>("month") {
        Some(m) => {
            let (year, month) = parse_month(m)?;
            Ok((year, Some(month)))
        }
        None => {
            let year = sub
                .get_one::<i32>("year")
                .copied()
                .ok_or_else(|| anyhow!("Pass --month or --year"))?;
            Ok((year, None))
        }
    }
}

pub fn show(
    store: &dyn FinanceStore,
    domain: &str,
    sub: &clap::ArgMatches,
) -> Result<Option<MonthlyNote>> {
    let note = match period(sub)? {
        (year, Some(month)) => store.monthly_note(year, month, domain)?,
        (year, None) => store.yearly_note(year, domain)?,
    };
    Ok(note)
}

pub fn set(store: &dyn FinanceStore, domain: &str, sub: &clap::ArgMatches) -> Result<MonthlyNote> {
    let (year, month) = period(sub)?;
    Ok(store.upsert_monthly_note(&NoteUpsert {
        domain: domain.to_string(),
        year,
        month,
        notes: sub.get_one::<String>("text").unwrap().clone(),
    })?)
}

fn table(notes: &[MonthlyNote]) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|n| {
            vec![
                n.period(),
                n.domain.clone(),
                n.notes.lines().next().unwrap_or_default().to_string(),
                n.id.to_string(),
            ]
        })
        .collect();
    pretty_table(&["Period", "Domain", "Note", "Id"], rows)
}

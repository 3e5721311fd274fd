// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::AppContext;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = &ctx.settings;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), s)? {
                let rows = vec![
                    vec!["backend".to_string(), s.backend.to_string()],
                    vec!["api_url".to_string(), s.api_url.clone()],
                    vec!["expenses_resource".to_string(), s.expenses_resource.clone()],
                    vec!["notes_resource".to_string(), s.notes_resource.clone()],
                    vec!["timeout_secs".to_string(), s.timeout_secs.to_string()],
                    vec!["note_domain".to_string(), s.note_domain.clone()],
                    vec![
                        "deactivate_completed_installments".to_string(),
                        s.deactivate_completed_installments.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
                println!("Data dir: {}", ctx.paths.base_dir().display());
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("KEY").unwrap();
            let value = sub.get_one::<String>("VALUE").unwrap();
            // Reload so flag and env overrides of this run are not persisted.
            let mut stored = crate::config::Settings::load_or_default(&ctx.paths)?;
            stored.set(key, value)?;
            stored.save(&ctx.paths)?;
            ctx.settings.set(key, value)?;
            println!("Set {} = {}", key.trim(), value.trim());
        }
        _ => {}
    }
    Ok(())
}

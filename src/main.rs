// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use log::LevelFilter;

use homeledger::app::AppContext;
use homeledger::config::{BackendKind, Paths};
use homeledger::{cli, commands, db};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if matches.get_flag("verbose") {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let paths = Paths::resolve()?;
    let mut ctx = AppContext::init(paths)?;
    apply_overrides(&mut ctx, &matches)?;

    let result = run(&mut ctx, &matches);
    if let Err(e) = &result {
        ctx.notices.error(format!("{:#}", e));
    }
    ctx.notices.flush(&mut std::io::stderr())?;
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

/// `--backend` / `--api-url` (or their env vars) win over the settings file.
fn apply_overrides(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    if let Some(kind) = m.get_one::<String>("backend") {
        ctx.settings.backend = kind.parse::<BackendKind>()?;
    }
    if let Some(url) = m.get_one::<String>("api-url") {
        ctx.settings.api_url = url.trim().to_string();
    }
    Ok(())
}

fn run(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("init", _)) => init(ctx)?,
        Some(("login", sub)) => commands::auth::login(ctx, sub)?,
        Some(("logout", _)) => commands::auth::logout(ctx)?,
        Some(("whoami", _)) => commands::auth::whoami(ctx)?,
        Some(("config", sub)) => commands::config::handle(ctx, sub)?,
        Some((name, sub)) => {
            let store = ctx.open_store()?;
            match name {
                "category" => commands::categories::handle(store.as_ref(), sub)?,
                "expense" => commands::expenses::handle(store.as_ref(), sub)?,
                "tx" => commands::transactions::handle(store.as_ref(), sub)?,
                "property" => commands::properties::handle(store.as_ref(), sub)?,
                "note" => {
                    let domain = ctx.settings.note_domain.clone();
                    commands::notes::handle(store.as_ref(), &domain, sub)?
                }
                "dashboard" => commands::dashboard::handle(store.as_ref(), ctx, sub)?,
                _ => {}
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn init(ctx: &mut AppContext) -> Result<()> {
    ctx.paths.ensure_dirs()?;
    if !ctx.paths.settings_file().exists() {
        ctx.settings
            .save(&ctx.paths)
            .context("Failed to write default settings")?;
    }
    match ctx.settings.backend {
        BackendKind::Local => {
            let path = ctx.paths.db_file();
            db::open_or_init(&path)?;
            println!("Database initialized at {}", path.display());
        }
        BackendKind::Remote => {
            println!(
                "Using the REST backend at {}; run `homeledger login` next",
                ctx.settings.api_url
            );
        }
    }
    Ok(())
}

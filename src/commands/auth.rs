// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::AppContext;
use crate::error::LedgerError;
use crate::models::User;
use anyhow::{Context, Result};

fn display_name(user: &User) -> String {
    match (&user.first_name, &user.last_name) {
        (Some(f), Some(l)) => format!("{} {} <{}>", f, l, user.email),
        (Some(f), None) => format!("{} <{}>", f, user.email),
        _ => user.email.clone(),
    }
}

pub fn login(ctx: &mut AppContext, m: &clap::ArgMatches) -> Result<()> {
    let email = m.get_one::<String>("email").unwrap();
    let password = m.get_one::<String>("password").unwrap();
    let client = ctx.api_client()?;
    let resp = client
        .login(email, password)
        .with_context(|| format!("Login failed for {}", email.trim()))?;
    ctx.session.login(&resp)?;
    ctx.notices
        .success(format!("Signed in as {}", display_name(&resp.user)));
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> Result<()> {
    let was_signed_in = ctx.session.is_authenticated();
    ctx.logout()?;
    if was_signed_in {
        ctx.notices.success("Signed out");
    } else {
        ctx.notices.info("No active session");
    }
    Ok(())
}

/// Asks the backend who the token belongs to and refreshes the stored user.
pub fn whoami(ctx: &mut AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        return Err(LedgerError::Unauthorized.into());
    }
    let user = match ctx.api_client()?.me() {
        Ok(user) => {
            ctx.session.set_user(user.clone())?;
            user
        }
        Err(LedgerError::Unauthorized) => {
            ctx.logout()?;
            return Err(LedgerError::Unauthorized).context("Session expired");
        }
        Err(e) => match ctx.session.user() {
            Some(cached) => {
                ctx.notices
                    .warning(format!("Could not reach the backend: {}", e));
                cached.clone()
            }
            None => return Err(e.into()),
        },
    };
    println!("{}", display_name(&user));
    Ok(())
}

//! # Account Commands

use anyhow::bail;
use tracing::debug;

use bizpulse_core::{BusinessConfig, Language};
use bizpulse_store::BOOTSTRAP_ADMIN_USERNAME;

use crate::context::AppContext;

/// `bizpulse register` - create an account and sign in.
pub async fn register(
    ctx: &AppContext,
    username: &str,
    password: &str,
    company: String,
    industry: String,
    language: Language,
) -> anyhow::Result<()> {
    debug!(username = %username, "register command");

    let config = BusinessConfig::new(company, industry, language);
    let account = ctx.directory.register(username, password, config).await?;

    ctx.db.session().init(&account).await?;

    println!("Account '{}' created. You are signed in.", account.username);
    Ok(())
}

/// `bizpulse login` - sign in.
pub async fn login(ctx: &AppContext, username: &str, password: &str) -> anyhow::Result<()> {
    debug!(username = %username, "login command");

    let account = ctx.directory.authenticate(username, password).await?;
    ctx.db.session().init(&account).await?;

    if account.is_admin {
        println!("Signed in as administrator.");
    } else {
        println!("Signed in as '{}'.", account.username);
    }
    Ok(())
}

/// `bizpulse logout` - sign out.
pub async fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    match ctx.session().await? {
        Some(account) => {
            ctx.db.session().clear().await?;
            println!("Signed out '{}'.", account.username);
        }
        None => println!("No one is signed in."),
    }
    Ok(())
}

/// `bizpulse whoami` - show the active session.
pub async fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    match ctx.session().await? {
        Some(account) => {
            let role = if account.is_admin { " (administrator)" } else { "" };
            println!("{}{}", account.username, role);
            println!("Last login: {}", account.last_login.format("%Y-%m-%d %H:%M UTC"));
            println!("Remote store: {}", ctx.config.remote.base_url);
        }
        None => println!("No one is signed in."),
    }
    Ok(())
}

/// `bizpulse admin accounts` - list registered accounts.
pub async fn admin_accounts(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.require_admin().await?;

    let accounts = ctx.directory.list_accounts().await;
    if accounts.is_empty() {
        println!("No registered accounts (or the registry is unreachable).");
        return Ok(());
    }

    println!("{:<24} {}", "USERNAME", "LAST LOGIN");
    for account in accounts {
        println!(
            "{:<24} {}",
            account.username,
            account.last_login.format("%Y-%m-%d %H:%M UTC")
        );
    }
    Ok(())
}

/// `bizpulse admin delete` - remove an account and purge its data.
pub async fn admin_delete(ctx: &AppContext, username: &str, yes: bool) -> anyhow::Result<()> {
    ctx.require_admin().await?;

    if username.trim().to_lowercase() == BOOTSTRAP_ADMIN_USERNAME {
        bail!("the administrator account cannot be deleted");
    }

    if !yes {
        println!(
            "This permanently removes '{}' and its business data. Re-run with --yes to confirm.",
            username
        );
        return Ok(());
    }

    ctx.directory.delete_account(username).await?;
    println!("Account '{}' deleted.", username);
    Ok(())
}

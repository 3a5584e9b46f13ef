//! # Business Settings Commands

use anyhow::bail;
use tracing::info;

use bizpulse_core::validation::{validate_margin, validate_name};
use bizpulse_core::{BusinessConfig, Language, MarginRate};

use crate::context::AppContext;

/// `bizpulse config show` - print the business settings.
pub async fn show(ctx: &AppContext) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    match &data.config {
        Some(config) => {
            println!("Company:     {}", config.company_name);
            println!("Industry:    {}", config.industry);
            println!("Margin:      {}%", config.target_profit_margin.percent());
            println!(
                "Estimation:  {}",
                if config.use_margin_estimation { "on" } else { "off" }
            );
            println!("Currency:    {}", config.currency);
            println!("Language:    {}", config.language.as_str());
        }
        None => println!("No business settings yet. Use `bizpulse config set`."),
    }
    Ok(())
}

/// `bizpulse config set` - update business settings.
///
/// Settings are replaced as a whole: unspecified flags keep their current
/// values (or the registration defaults when nothing was saved before).
pub async fn set(
    ctx: &AppContext,
    company: Option<String>,
    industry: Option<String>,
    margin: Option<u32>,
    estimation: Option<String>,
    currency: Option<String>,
    language: Option<Language>,
) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    let mut config = data
        .config
        .clone()
        .unwrap_or_else(|| BusinessConfig::new("My Business", "General", Language::default()));

    if let Some(company) = company {
        validate_name(&company)?;
        config.company_name = company.trim().to_string();
    }
    if let Some(industry) = industry {
        config.industry = industry.trim().to_string();
    }
    if let Some(percent) = margin {
        let rate = MarginRate::from_percent(percent);
        validate_margin(rate)?;
        config.target_profit_margin = rate;
    }
    if let Some(flag) = estimation {
        config.use_margin_estimation = parse_switch(&flag)?;
    }
    if let Some(currency) = currency {
        if currency.trim().is_empty() {
            bail!("currency symbol cannot be empty");
        }
        config.currency = currency.trim().to_string();
    }
    if let Some(language) = language {
        config.language = language;
    }

    data.update_config(config);
    ctx.gateway.save(&account.username, &data).await?;

    info!("Business settings updated");
    println!("Settings saved.");
    Ok(())
}

fn parse_switch(flag: &str) -> anyhow::Result<bool> {
    match flag.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("expected `on` or `off`, got '{}'", other),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("on").unwrap());
        assert!(parse_switch(" Yes ").unwrap());
        assert!(!parse_switch("off").unwrap());
        assert!(!parse_switch("FALSE").unwrap());
        assert!(parse_switch("maybe").is_err());
    }
}

//! # Dashboard and Reports

use chrono::Utc;

use bizpulse_core::metrics::{daily_sales, financial_summary, stock_report, total_receivable};

use crate::context::AppContext;

/// `bizpulse dashboard` - headline numbers plus the trailing week.
pub async fn dashboard(ctx: &AppContext) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    let currency = data.currency();

    if let Some(config) = &data.config {
        if config.industry.is_empty() {
            println!("{}", config.company_name);
        } else {
            println!("{} ({})", config.company_name, config.industry);
        }
        println!();
    }

    let summary = financial_summary(&data);
    let receivable = total_receivable(&data);

    println!("Total sales:     {}{}", currency, summary.total_sales);
    println!("Total expenses:  {}{}", currency, summary.total_expenses);
    println!("Gross profit:    {}{}", currency, summary.gross_profit);
    println!("Net profit:      {}{}", currency, summary.net_profit);
    println!("Receivable:      {}{}", currency, receivable);

    println!();
    println!("Last 7 days:");
    for day in daily_sales(&data, Utc::now().date_naive()) {
        println!("  {}  {}{}", day.date, currency, day.total);
    }

    Ok(())
}

/// `bizpulse report stock` - stock valuation.
pub async fn stock(ctx: &AppContext) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    let report = stock_report(&data);
    if report.rows.is_empty() {
        println!("No stock items yet.");
        return Ok(());
    }

    let currency = data.currency();
    println!(
        "{:<20} {:>8} {:>8} {:>16}",
        "NAME", "SOLD", "ON HAND", "POTENTIAL"
    );
    for row in &report.rows {
        let name = match &row.sku {
            Some(sku) => format!("{} [{}]", row.name, sku),
            None => row.name.clone(),
        };
        println!(
            "{:<20} {:>8} {:>8} {:>16}",
            name,
            row.sold,
            row.on_hand,
            format!("{}{}", currency, row.potential_revenue)
        );
    }

    println!();
    println!("Units on hand:      {}", report.totals.units_on_hand);
    println!(
        "Capital in stock:   {}{}",
        currency, report.totals.stock_cost
    );
    println!(
        "Potential revenue:  {}{}",
        currency, report.totals.potential_revenue
    );
    Ok(())
}

//! # Stock Commands

use anyhow::bail;
use tracing::{debug, info};

use bizpulse_core::validation::{
    suggest_selling_price, validate_margin, validate_name, validate_price, validate_quantity,
};
use bizpulse_core::{MarginRate, Money, StockItem, LOW_STOCK_THRESHOLD};

use crate::commands::find_stock_item_id;
use crate::context::AppContext;

/// `bizpulse stock add` - add a stock item.
pub async fn add(
    ctx: &AppContext,
    name: &str,
    quantity: i64,
    buy: Money,
    sell: Option<Money>,
    margin: Option<u32>,
    sku: Option<String>,
) -> anyhow::Result<()> {
    debug!(name = %name, quantity, "stock add command");

    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    validate_name(name)?;
    validate_price(buy)?;
    if quantity < 0 {
        bail!("opening quantity cannot be negative");
    }

    let sell = match (sell, margin) {
        (Some(price), None) => price,
        (None, Some(pct)) => {
            let rate = MarginRate::from_percent(pct);
            validate_margin(rate)?;
            suggest_selling_price(buy, rate)
        }
        (Some(_), Some(_)) => bail!("give either --sell or --margin, not both"),
        (None, None) => bail!("one of --sell or --margin is required"),
    };
    validate_price(sell)?;

    let mut item = StockItem::new(name.trim(), quantity, buy, sell);
    item.sku = sku.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let below_cost = sell < buy;

    data.add_stock_item(item.clone());
    ctx.gateway.save(&account.username, &data).await?;

    info!(item_id = %item.id, name = %item.name, "Stock item added");
    println!(
        "Added '{}': {} on hand, buy {}{}, sell {}{}.",
        item.name,
        item.current_quantity,
        data.currency(),
        item.purchase_price,
        data.currency(),
        item.selling_price
    );
    if below_cost {
        println!("Note: selling price is below cost.");
    }
    Ok(())
}

/// `bizpulse stock in` - receive stock for an existing item.
pub async fn stock_in(ctx: &AppContext, item: &str, quantity: i64) -> anyhow::Result<()> {
    debug!(item = %item, quantity, "stock in command");

    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    validate_quantity(quantity)?;

    let item_id = match find_stock_item_id(&data, item) {
        Some(id) => id,
        None => bail!("no stock item matches '{}'", item),
    };

    let on_hand = data.stock_in(&item_id, quantity)?;
    ctx.gateway.save(&account.username, &data).await?;

    let name = data
        .find_stock_item(&item_id)
        .map(|i| i.name.clone())
        .unwrap_or_else(|| item_id.clone());

    info!(item_id = %item_id, quantity, on_hand, "Stock received");
    println!("Received {} x '{}'. Now {} on hand.", quantity, name, on_hand);
    Ok(())
}

/// `bizpulse stock list` - list stock items.
pub async fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    if data.stock_items.is_empty() {
        println!("No stock items yet.");
        return Ok(());
    }

    let currency = data.currency();
    println!(
        "{:<36} {:<20} {:>8} {:>12} {:>12}",
        "ID", "NAME", "ON HAND", "BUY", "SELL"
    );
    for item in &data.stock_items {
        let low = if item.current_quantity < LOW_STOCK_THRESHOLD {
            "  LOW"
        } else {
            ""
        };
        let name = match &item.sku {
            Some(sku) => format!("{} [{}]", item.name, sku),
            None => item.name.clone(),
        };
        println!(
            "{:<36} {:<20} {:>8} {:>12} {:>12}{}",
            item.id,
            name,
            item.current_quantity,
            format!("{}{}", currency, item.purchase_price),
            format!("{}{}", currency, item.selling_price),
            low
        );
    }
    Ok(())
}

/// `bizpulse stock delete` - remove a stock item.
pub async fn delete(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    let removed = data.delete_stock_item(id)?;
    ctx.gateway.save(&account.username, &data).await?;

    info!(item_id = %removed.id, "Stock item deleted");
    println!(
        "Deleted '{}'. Past sales keep their records.",
        removed.name
    );
    Ok(())
}

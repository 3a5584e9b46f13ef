//! # Sale Commands

use anyhow::bail;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use bizpulse_core::validation::validate_sale;
use bizpulse_core::{new_id, Money, Sale, SaleKind};

use crate::commands::{find_customer_id, find_stock_item_id};
use crate::context::AppContext;

/// `bizpulse sale add` - record a sale.
#[allow(clippy::too_many_arguments)]
pub async fn add(
    ctx: &AppContext,
    amount: Option<Money>,
    kind: SaleKind,
    item: Option<String>,
    quantity: Option<i64>,
    customer: Option<String>,
    bill: Option<String>,
    note: Option<String>,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    debug!(kind = %kind.as_str(), "sale add command");

    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    let stock_item_id = match item {
        Some(needle) => match find_stock_item_id(&data, &needle) {
            Some(id) => Some(id),
            None => bail!("no stock item matches '{}'", needle),
        },
        None => None,
    };

    let (customer_id, customer_name) = match customer {
        Some(needle) => match find_customer_id(&data, &needle) {
            Some(id) => {
                let name = data.find_customer(&id).map(|c| c.name.clone());
                (Some(id), name)
            }
            None => bail!("no customer matches '{}'", needle),
        },
        None => (None, None),
    };

    // Without an explicit amount, bill the item at its selling price.
    let unit_price = stock_item_id
        .as_deref()
        .and_then(|id| data.find_stock_item(id))
        .map(|i| i.selling_price);
    let amount = match (amount, unit_price) {
        (Some(amount), _) => amount,
        (None, Some(unit)) => match quantity {
            Some(qty) => unit.multiply_quantity(qty),
            None => bail!("--quantity is required to derive the amount from --item"),
        },
        (None, None) => bail!("either --amount or --item with --quantity is required"),
    };

    let sale = Sale {
        id: new_id(),
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        amount,
        kind,
        bill_number: bill,
        stock_item_id,
        quantity,
        customer_id,
        customer_name,
        note,
    };

    validate_sale(&data, &sale)?;

    let currency = data.currency();
    let summary = describe(&data, &sale);
    data.add_sale(sale.clone());
    ctx.gateway.save(&account.username, &data).await?;

    info!(sale_id = %sale.id, amount = %sale.amount, "Sale recorded");
    println!("Recorded {} sale of {}{}.", sale.kind.as_str(), currency, sale.amount);
    if !summary.is_empty() {
        println!("{}", summary);
    }
    Ok(())
}

fn describe(data: &bizpulse_core::BusinessData, sale: &Sale) -> String {
    let mut parts = Vec::new();

    if let Some(item) = sale
        .stock_item_id
        .as_deref()
        .and_then(|id| data.find_stock_item(id))
    {
        let qty = sale.quantity.unwrap_or(0);
        parts.push(format!("{} x {}", qty, item.name));
    }
    if let Some(name) = &sale.customer_name {
        parts.push(format!("customer: {}", name));
    }
    if let Some(bill) = &sale.bill_number {
        parts.push(format!("bill {}", bill));
    }

    parts.join(", ")
}

/// `bizpulse sale list` - list recorded sales.
pub async fn list(ctx: &AppContext, last: Option<usize>) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    if data.sales.is_empty() {
        println!("No sales recorded yet.");
        return Ok(());
    }

    let currency = data.currency();
    let skip = last
        .map(|n| data.sales.len().saturating_sub(n))
        .unwrap_or(0);

    println!(
        "{:<36} {:<12} {:<7} {:>12}  {}",
        "ID", "DATE", "KIND", "AMOUNT", "DETAILS"
    );
    for sale in data.sales.iter().skip(skip) {
        println!(
            "{:<36} {:<12} {:<7} {:>12}  {}",
            sale.id,
            sale.date,
            sale.kind.as_str(),
            format!("{}{}", currency, sale.amount),
            describe(&data, sale)
        );
    }
    Ok(())
}

/// `bizpulse sale delete` - remove a sale and reverse its effects.
pub async fn delete(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    let removed = data.delete_sale(id)?;
    ctx.gateway.save(&account.username, &data).await?;

    info!(sale_id = %removed.id, "Sale deleted");
    println!(
        "Deleted sale of {}{} from {}. Stock and balances restored.",
        data.currency(),
        removed.amount,
        removed.date
    );
    Ok(())
}

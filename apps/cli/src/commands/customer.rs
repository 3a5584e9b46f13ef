//! # Customer Commands

use anyhow::bail;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use bizpulse_core::metrics::{customer_ledger, LedgerEntryKind};
use bizpulse_core::validation::{validate_amount, validate_name};
use bizpulse_core::{new_id, Customer, Money, Payment};

use crate::commands::find_customer_id;
use crate::context::AppContext;

/// `bizpulse customer add` - add a customer.
pub async fn add(
    ctx: &AppContext,
    name: &str,
    phone: Option<String>,
    address: Option<String>,
) -> anyhow::Result<()> {
    debug!(name = %name, "customer add command");

    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    validate_name(name)?;

    let mut customer = Customer::new(name.trim(), phone);
    customer.address = address;
    data.add_customer(customer.clone());
    ctx.gateway.save(&account.username, &data).await?;

    info!(customer_id = %customer.id, name = %customer.name, "Customer added");
    println!("Added customer '{}'.", customer.name);
    Ok(())
}

/// `bizpulse customer list` - list customers and balances.
pub async fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    if data.customers.is_empty() {
        println!("No customers yet.");
        return Ok(());
    }

    let currency = data.currency();
    println!(
        "{:<36} {:<20} {:<16} {:>12}",
        "ID", "NAME", "PHONE", "BALANCE"
    );
    for customer in &data.customers {
        println!(
            "{:<36} {:<20} {:<16} {:>12}",
            customer.id,
            customer.name,
            customer.phone.as_deref().unwrap_or(""),
            format!("{}{}", currency, customer.current_balance)
        );
    }
    Ok(())
}

/// `bizpulse customer pay` - record a payment received.
pub async fn pay(
    ctx: &AppContext,
    customer: &str,
    amount: Money,
    note: Option<String>,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    debug!(customer = %customer, amount = %amount, "customer pay command");

    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    validate_amount(amount)?;

    let customer_id = match find_customer_id(&data, customer) {
        Some(id) => id,
        None => bail!("no customer matches '{}'", customer),
    };

    let payment = Payment {
        id: new_id(),
        customer_id: customer_id.clone(),
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        amount,
        note,
    };
    data.add_payment(payment);
    ctx.gateway.save(&account.username, &data).await?;

    let (name, balance) = data
        .find_customer(&customer_id)
        .map(|c| (c.name.clone(), c.current_balance))
        .unwrap_or_else(|| (customer_id.clone(), Money::zero()));

    info!(customer_id = %customer_id, amount = %amount, "Payment received");
    println!(
        "Received {}{} from '{}'. Balance now {}{}.",
        data.currency(),
        amount,
        name,
        data.currency(),
        balance
    );
    Ok(())
}

/// `bizpulse customer ledger` - print a customer's statement.
pub async fn ledger(ctx: &AppContext, customer: &str) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    let customer_id = match find_customer_id(&data, customer) {
        Some(id) => id,
        None => bail!("no customer matches '{}'", customer),
    };

    let statement = customer_ledger(&data, &customer_id)?;
    let currency = data.currency();

    println!("Statement for '{}'", statement.customer.name);
    if let Some(phone) = &statement.customer.phone {
        println!("Phone: {}", phone);
    }
    if let Some(address) = &statement.customer.address {
        println!("Address: {}", address);
    }
    println!();

    if statement.entries.is_empty() {
        println!("No credit sales or payments on record.");
    } else {
        println!("{:<12} {:<7} {:>12}  {}", "DATE", "TYPE", "AMOUNT", "DESCRIPTION");
        for entry in &statement.entries {
            let kind = match entry.kind {
                LedgerEntryKind::Debit => "debit",
                LedgerEntryKind::Credit => "credit",
            };
            println!(
                "{:<12} {:<7} {:>12}  {}",
                entry.date,
                kind,
                format!("{}{}", currency, entry.amount),
                entry.description
            );
        }
    }

    println!();
    println!("Balance due: {}{}", currency, statement.closing_balance);
    Ok(())
}

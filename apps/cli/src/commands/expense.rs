//! # Expense Commands

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use bizpulse_core::validation::validate_amount;
use bizpulse_core::{new_id, Expense, ExpenseType, Money};

use crate::context::AppContext;

/// `bizpulse expense add` - record an expense.
pub async fn add(
    ctx: &AppContext,
    amount: Money,
    category: ExpenseType,
    note: Option<String>,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    debug!(amount = %amount, category = %category.label(), "expense add command");

    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    validate_amount(amount)?;

    let expense = Expense {
        id: new_id(),
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        category,
        amount,
        description: note,
    };

    data.add_expense(expense.clone());
    ctx.gateway.save(&account.username, &data).await?;

    info!(expense_id = %expense.id, amount = %expense.amount, "Expense recorded");
    println!(
        "Recorded {} expense of {}{}.",
        expense.category.label(),
        data.currency(),
        expense.amount
    );
    Ok(())
}

/// `bizpulse expense list` - list recorded expenses.
pub async fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let data = ctx.gateway.load(&account.username).await;

    if data.expenses.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    let currency = data.currency();
    println!(
        "{:<36} {:<12} {:<16} {:>12}  {}",
        "ID", "DATE", "CATEGORY", "AMOUNT", "NOTE"
    );
    for expense in &data.expenses {
        println!(
            "{:<36} {:<12} {:<16} {:>12}  {}",
            expense.id,
            expense.date,
            expense.category.label(),
            format!("{}{}", currency, expense.amount),
            expense.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

/// `bizpulse expense delete` - remove an expense.
pub async fn delete(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let account = ctx.require_session().await?;
    let mut data = ctx.gateway.load(&account.username).await;

    let removed = data.delete_expense(id)?;
    ctx.gateway.save(&account.username, &data).await?;

    info!(expense_id = %removed.id, "Expense deleted");
    println!(
        "Deleted {} expense of {}{}.",
        removed.category.label(),
        data.currency(),
        removed.amount
    );
    Ok(())
}

//! # Metrics Aggregator
//!
//! Read-only derivations over a [`BusinessData`] snapshot: profit, daily
//! sales series, receivables, stock valuation, and per-customer ledgers.
//!
//! Everything here takes `&BusinessData` and recomputes from scratch on
//! each call. Nothing is cached and nothing is mutated, so running an
//! aggregation twice over the same snapshot always yields the same result.
//!
//! ## Profit Resolution
//! ```text
//! sale has stock_item_id and the item exists
//!     → (selling_price - purchase_price) × quantity      (resolved)
//! otherwise (manual sale, or dangling reference)
//!     → amount                                           (full-amount rule)
//!     → amount × target_profit_margin                    (estimation mode)
//! ```
//! The same unresolved rule applies to manual sales and to dangling
//! references; a sale whose item was deleted is treated exactly like a
//! manual sale.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BusinessData, Customer, Sale, SaleKind};

/// Length of the trailing daily-sales window, in days.
pub const SALES_WINDOW_DAYS: i64 = 7;

// =============================================================================
// Profit
// =============================================================================

/// Computes the gross profit contributed by a single sale.
///
/// Stock-linked sales with a live item use per-unit margin times quantity;
/// a missing quantity counts as one unit. Unresolved sales fall back to
/// the full amount, or to a margin estimate when the config enables it.
pub fn sale_profit(data: &BusinessData, sale: &Sale) -> Money {
    if let Some(item_id) = &sale.stock_item_id {
        if let Some(item) = data.find_stock_item(item_id) {
            return item.unit_profit().multiply_quantity(sale.quantity.unwrap_or(1));
        }
    }

    match &data.config {
        Some(config) if config.use_margin_estimation => {
            sale.amount.apply_margin(config.target_profit_margin)
        }
        _ => sale.amount,
    }
}

// =============================================================================
// Financial Summary
// =============================================================================

/// Headline totals for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Sum of all sale amounts.
    pub total_sales: Money,

    /// Sum of all expense amounts.
    pub total_expenses: Money,

    /// Sum of per-sale profit (see [`sale_profit`]).
    pub gross_profit: Money,

    /// Gross profit minus total expenses.
    pub net_profit: Money,
}

/// Computes the headline totals over the whole snapshot.
pub fn financial_summary(data: &BusinessData) -> FinancialSummary {
    let total_sales: Money = data.sales.iter().map(|s| s.amount).sum();
    let total_expenses: Money = data.expenses.iter().map(|e| e.amount).sum();
    let gross_profit: Money = data.sales.iter().map(|s| sale_profit(data, s)).sum();

    FinancialSummary {
        total_sales,
        total_expenses,
        gross_profit,
        net_profit: gross_profit - total_expenses,
    }
}

/// Sum of positive customer balances.
///
/// Negative balances (customers in credit) do not offset what others owe.
pub fn total_receivable(data: &BusinessData) -> Money {
    data.customers
        .iter()
        .map(|c| c.current_balance)
        .filter(|b| b.is_positive())
        .sum()
}

// =============================================================================
// Daily Sales Series
// =============================================================================

/// One day in the trailing sales window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total: Money,
}

/// Sales totals for the trailing window ending at `today`, oldest first.
///
/// Always returns exactly [`SALES_WINDOW_DAYS`] entries; days without
/// sales are zero-filled. Matching is by exact calendar date.
pub fn daily_sales(data: &BusinessData, today: NaiveDate) -> Vec<DailySales> {
    (0..SALES_WINDOW_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let total = data
                .sales
                .iter()
                .filter(|s| s.date == date)
                .map(|s| s.amount)
                .sum();
            DailySales { date, total }
        })
        .collect()
}

// =============================================================================
// Stock Report
// =============================================================================

/// Per-item row in the stock report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,

    /// `initial_quantity - current_quantity`. Restocks can push this
    /// negative; `initial_quantity` is advisory and never updated.
    pub sold: i64,

    /// Units currently on hand.
    pub on_hand: i64,

    /// `on_hand × selling_price`.
    pub potential_revenue: Money,
}

/// Whole-inventory totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTotals {
    /// Sum of units on hand across all items.
    pub units_on_hand: i64,

    /// Sum of `on_hand × purchase_price` (capital tied up in stock).
    pub stock_cost: Money,

    /// Sum of `on_hand × selling_price`.
    pub potential_revenue: Money,
}

/// The stock valuation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub rows: Vec<StockRow>,
    pub totals: StockTotals,
}

/// Builds the stock valuation report in inventory order.
pub fn stock_report(data: &BusinessData) -> StockReport {
    let rows: Vec<StockRow> = data
        .stock_items
        .iter()
        .map(|item| StockRow {
            id: item.id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            sold: item.initial_quantity - item.current_quantity,
            on_hand: item.current_quantity,
            potential_revenue: item.selling_price.multiply_quantity(item.current_quantity),
        })
        .collect();

    let totals = StockTotals {
        units_on_hand: rows.iter().map(|r| r.on_hand).sum(),
        stock_cost: data
            .stock_items
            .iter()
            .map(|i| i.purchase_price.multiply_quantity(i.current_quantity))
            .sum(),
        potential_revenue: rows.iter().map(|r| r.potential_revenue).sum(),
    };

    StockReport { rows, totals }
}

// =============================================================================
// Customer Ledger
// =============================================================================

/// Direction of a ledger entry from the business's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryKind {
    /// Credit sale: the customer's debt grew.
    Debit,
    /// Payment received: the customer's debt shrank.
    Credit,
}

/// One line in a customer's statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: LedgerEntryKind,
    pub amount: Money,
    pub description: String,
}

/// A customer's statement: dated entries plus the stored closing balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLedger {
    pub customer: Customer,
    pub entries: Vec<LedgerEntry>,

    /// The customer's stored `current_balance`. Presented as the closing
    /// figure; it is not recomputed from the entries.
    pub closing_balance: Money,
}

/// Builds a customer's statement by merging their credit sales (debits)
/// and payments (credits), sorted ascending by date.
///
/// Debit descriptions resolve to the linked stock item's name, falling
/// back to `"Sale"` for manual or dangling references. Credit descriptions
/// use the payment note, falling back to `"Payment"`.
pub fn customer_ledger(data: &BusinessData, customer_id: &str) -> CoreResult<CustomerLedger> {
    let customer = data
        .find_customer(customer_id)
        .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?
        .clone();

    let mut entries: Vec<LedgerEntry> = Vec::new();

    for sale in &data.sales {
        if sale.kind != SaleKind::Credit || sale.customer_id.as_deref() != Some(customer_id) {
            continue;
        }
        let description = sale
            .stock_item_id
            .as_deref()
            .and_then(|id| data.find_stock_item(id))
            .map(|item| item.name.clone())
            .unwrap_or_else(|| "Sale".to_string());
        entries.push(LedgerEntry {
            date: sale.date,
            kind: LedgerEntryKind::Debit,
            amount: sale.amount,
            description,
        });
    }

    for payment in &data.payments {
        if payment.customer_id != customer_id {
            continue;
        }
        entries.push(LedgerEntry {
            date: payment.date,
            kind: LedgerEntryKind::Credit,
            amount: payment.amount,
            description: payment
                .note
                .clone()
                .unwrap_or_else(|| "Payment".to_string()),
        });
    }

    // Stable sort keeps same-date debits ahead of credits.
    entries.sort_by_key(|e| e.date);

    Ok(CustomerLedger {
        closing_balance: customer.current_balance,
        customer,
        entries,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        new_id, BusinessConfig, Expense, ExpenseType, Language, MarginRate, Payment, StockItem,
    };

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn manual_sale(amount: i64, on: NaiveDate) -> Sale {
        Sale {
            id: new_id(),
            date: on,
            amount: Money::from_major(amount),
            kind: SaleKind::Cash,
            bill_number: None,
            stock_item_id: None,
            quantity: None,
            customer_id: None,
            customer_name: None,
            note: None,
        }
    }

    fn estimation_config(percent: u32) -> BusinessConfig {
        let mut config = BusinessConfig::new("Mita Store", "Retail", Language::En);
        config.target_profit_margin = MarginRate::from_percent(percent);
        config.use_margin_estimation = true;
        config
    }

    fn snapshot_with_item() -> (BusinessData, String) {
        let mut data = BusinessData::default();
        data.add_stock_item(StockItem::new(
            "Rice 5kg",
            100,
            Money::from_major(400),
            Money::from_major(450),
        ));
        let id = data.stock_items[0].id.clone();
        (data, id)
    }

    #[test]
    fn test_resolved_profit_uses_unit_margin() {
        let (mut data, item_id) = snapshot_with_item();
        let mut sale = manual_sale(4500, date(1));
        sale.stock_item_id = Some(item_id);
        sale.quantity = Some(10);
        data.add_sale(sale);

        // (450 - 400) × 10 = 500
        let profit = sale_profit(&data, &data.sales[0]);
        assert_eq!(profit, Money::from_major(500));
    }

    #[test]
    fn test_resolved_profit_defaults_quantity_to_one() {
        let (mut data, item_id) = snapshot_with_item();
        let mut sale = manual_sale(450, date(1));
        sale.stock_item_id = Some(item_id);
        sale.quantity = None;
        data.add_sale(sale);

        assert_eq!(sale_profit(&data, &data.sales[0]), Money::from_major(50));
    }

    #[test]
    fn test_manual_profit_full_amount_without_estimation() {
        let mut data = BusinessData::default();
        data.add_sale(manual_sale(1000, date(1)));

        assert_eq!(sale_profit(&data, &data.sales[0]), Money::from_major(1000));
    }

    #[test]
    fn test_manual_profit_estimated_under_margin_mode() {
        let mut data = BusinessData::default();
        data.update_config(estimation_config(20));
        data.add_sale(manual_sale(1000, date(1)));

        assert_eq!(sale_profit(&data, &data.sales[0]), Money::from_major(200));
    }

    #[test]
    fn test_dangling_reference_follows_manual_rule() {
        let (mut data, item_id) = snapshot_with_item();
        let mut sale = manual_sale(4500, date(1));
        sale.stock_item_id = Some(item_id.clone());
        sale.quantity = Some(10);
        data.add_sale(sale);
        data.delete_stock_item(&item_id).unwrap();

        // Without estimation: full amount
        assert_eq!(sale_profit(&data, &data.sales[0]), Money::from_major(4500));

        // With estimation: amount × margin
        data.update_config(estimation_config(20));
        assert_eq!(sale_profit(&data, &data.sales[0]), Money::from_major(900));
    }

    #[test]
    fn test_financial_summary() {
        let (mut data, item_id) = snapshot_with_item();
        let mut sale = manual_sale(4500, date(1));
        sale.stock_item_id = Some(item_id);
        sale.quantity = Some(10);
        data.add_sale(sale);
        data.add_sale(manual_sale(1000, date(2)));
        data.add_expense(Expense {
            id: new_id(),
            date: date(3),
            category: ExpenseType::Rent,
            amount: Money::from_major(800),
            description: None,
        });

        let summary = financial_summary(&data);
        assert_eq!(summary.total_sales, Money::from_major(5500));
        assert_eq!(summary.total_expenses, Money::from_major(800));
        // 500 resolved + 1000 manual
        assert_eq!(summary.gross_profit, Money::from_major(1500));
        assert_eq!(summary.net_profit, Money::from_major(700));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let (mut data, item_id) = snapshot_with_item();
        let mut sale = manual_sale(4500, date(1));
        sale.stock_item_id = Some(item_id);
        sale.quantity = Some(10);
        data.add_sale(sale);

        let before = data.clone();
        let first = financial_summary(&data);
        let second = financial_summary(&data);

        assert_eq!(first, second);
        assert_eq!(data, before);
    }

    #[test]
    fn test_total_receivable_counts_positive_balances_only() {
        let mut data = BusinessData::default();
        data.add_customer(Customer::new("Rahim", None));
        data.add_customer(Customer::new("Karim", None));
        data.add_customer(Customer::new("Salma", None));
        data.customers[0].current_balance = Money::from_major(500);
        data.customers[1].current_balance = Money::from_major(-100);
        // Salma stays at zero.

        assert_eq!(total_receivable(&data), Money::from_major(500));
    }

    #[test]
    fn test_daily_sales_window() {
        let today = date(10);
        let mut data = BusinessData::default();
        data.add_sale(manual_sale(100, today));
        data.add_sale(manual_sale(50, today));
        data.add_sale(manual_sale(200, date(8)));
        // Outside the window: 8 days back
        data.add_sale(manual_sale(999, date(2)));

        let series = daily_sales(&data, today);
        assert_eq!(series.len(), SALES_WINDOW_DAYS as usize);

        // Oldest first: June 4 .. June 10
        assert_eq!(series[0].date, date(4));
        assert_eq!(series[6].date, today);

        assert_eq!(series[6].total, Money::from_major(150));
        assert_eq!(series[4].total, Money::from_major(200));
        // Zero-filled days
        assert_eq!(series[0].total, Money::zero());
        assert_eq!(series[5].total, Money::zero());
    }

    #[test]
    fn test_stock_report() {
        let (mut data, item_id) = snapshot_with_item();
        let mut sale = manual_sale(4500, date(1));
        sale.stock_item_id = Some(item_id);
        sale.quantity = Some(10);
        data.add_sale(sale);

        let report = stock_report(&data);
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.sold, 10);
        assert_eq!(row.on_hand, 90);
        assert_eq!(row.potential_revenue, Money::from_major(450 * 90));

        assert_eq!(report.totals.units_on_hand, 90);
        assert_eq!(report.totals.stock_cost, Money::from_major(400 * 90));
        assert_eq!(report.totals.potential_revenue, Money::from_major(450 * 90));
    }

    #[test]
    fn test_stock_report_sold_can_go_negative_after_restock() {
        let (mut data, item_id) = snapshot_with_item();
        data.stock_in(&item_id, 50).unwrap();

        let report = stock_report(&data);
        assert_eq!(report.rows[0].on_hand, 150);
        assert_eq!(report.rows[0].sold, -50);
    }

    #[test]
    fn test_customer_ledger_merges_and_sorts() {
        let (mut data, item_id) = snapshot_with_item();
        data.add_customer(Customer::new("Rahim", None));
        let customer_id = data.customers[0].id.clone();

        // June 3: stock-linked credit sale
        let mut sale = manual_sale(450, date(3));
        sale.kind = SaleKind::Credit;
        sale.customer_id = Some(customer_id.clone());
        sale.stock_item_id = Some(item_id);
        sale.quantity = Some(1);
        data.add_sale(sale);

        // June 1: manual credit sale
        let mut sale = manual_sale(500, date(1));
        sale.kind = SaleKind::Credit;
        sale.customer_id = Some(customer_id.clone());
        data.add_sale(sale);

        // June 5: payment with a note
        data.add_payment(Payment {
            id: new_id(),
            customer_id: customer_id.clone(),
            date: date(5),
            amount: Money::from_major(300),
            note: Some("bKash".to_string()),
        });

        // Cash sale for the same customer id stays out of the statement.
        let mut cash = manual_sale(50, date(4));
        cash.customer_id = Some(customer_id.clone());
        data.add_sale(cash);

        let ledger = customer_ledger(&data, &customer_id).unwrap();
        assert_eq!(ledger.entries.len(), 3);

        assert_eq!(ledger.entries[0].date, date(1));
        assert_eq!(ledger.entries[0].kind, LedgerEntryKind::Debit);
        assert_eq!(ledger.entries[0].description, "Sale");

        assert_eq!(ledger.entries[1].date, date(3));
        assert_eq!(ledger.entries[1].description, "Rice 5kg");

        assert_eq!(ledger.entries[2].date, date(5));
        assert_eq!(ledger.entries[2].kind, LedgerEntryKind::Credit);
        assert_eq!(ledger.entries[2].description, "bKash");

        // 450 + 500 - 300
        assert_eq!(ledger.closing_balance, Money::from_major(650));
    }

    #[test]
    fn test_customer_ledger_unknown_customer() {
        let data = BusinessData::default();
        assert!(matches!(
            customer_ledger(&data, "ghost"),
            Err(CoreError::CustomerNotFound(_))
        ));
    }
}

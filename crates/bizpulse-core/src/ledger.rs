//! # Ledger Operations
//!
//! Mutations on the [`BusinessData`] snapshot.
//!
//! Every operation works on the in-memory snapshot only; persistence is a
//! separate concern handled by the gateway after the mutation returns.
//!
//! ## Totality
//! Operations never fail on cross-references. A sale or payment pointing at
//! a deleted stock item or customer simply skips the side effect on the
//! missing entity and still records the primary entry. Only operations
//! whose *primary target* is missing (deleting an unknown sale, restocking
//! an unknown item) return an error.
//!
//! ## Side-Effect Pairs
//! ```text
//! add_sale     stock-linked  → current_quantity = max(0, current - qty)
//! delete_sale  stock-linked  → current_quantity = current + qty   (no cap)
//! add_sale     credit        → customer.current_balance += amount
//! delete_sale  credit        → customer.current_balance -= amount
//! add_payment                → customer.current_balance -= amount (no floor)
//! ```
//! The restock on `delete_sale` is deliberately uncapped: if the sale
//! drained more stock than the clamp allowed, deleting it can leave more
//! units on hand than before. The clamp protects the invariant
//! `current_quantity >= 0`; it does not make add/delete a perfect inverse.

use crate::error::{CoreError, CoreResult};
use crate::types::{
    BusinessConfig, BusinessData, Customer, Expense, Payment, Sale, SaleKind, StockItem,
};

impl BusinessData {
    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale and applies its side effects.
    ///
    /// Stock-linked sales reduce the item's `current_quantity`, clamped at
    /// zero. Credit sales raise the customer's balance by the full amount.
    /// Dangling references degrade to no-ops.
    pub fn add_sale(&mut self, sale: Sale) {
        if let Some(item_id) = &sale.stock_item_id {
            if let Some(item) = self.stock_items.iter_mut().find(|i| i.id == *item_id) {
                let qty = sale.quantity.unwrap_or(0);
                item.current_quantity = (item.current_quantity - qty).max(0);
            }
        }

        if sale.kind == SaleKind::Credit {
            if let Some(customer_id) = &sale.customer_id {
                if let Some(customer) =
                    self.customers.iter_mut().find(|c| c.id == *customer_id)
                {
                    customer.current_balance += sale.amount;
                }
            }
        }

        self.sales.push(sale);
    }

    /// Removes a sale and reverses its side effects.
    ///
    /// Restocking is uncapped and the balance reduction has no floor; both
    /// skip silently when the referenced entity no longer exists.
    pub fn delete_sale(&mut self, sale_id: &str) -> CoreResult<Sale> {
        let pos = self
            .sales
            .iter()
            .position(|s| s.id == sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;
        let sale = self.sales.remove(pos);

        if let Some(item_id) = &sale.stock_item_id {
            if let Some(item) = self.stock_items.iter_mut().find(|i| i.id == *item_id) {
                item.current_quantity += sale.quantity.unwrap_or(0);
            }
        }

        if sale.kind == SaleKind::Credit {
            if let Some(customer_id) = &sale.customer_id {
                if let Some(customer) =
                    self.customers.iter_mut().find(|c| c.id == *customer_id)
                {
                    customer.current_balance -= sale.amount;
                }
            }
        }

        Ok(sale)
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    /// Records an expense.
    pub fn add_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Removes an expense by id.
    pub fn delete_expense(&mut self, expense_id: &str) -> CoreResult<Expense> {
        let pos = self
            .expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or_else(|| CoreError::ExpenseNotFound(expense_id.to_string()))?;
        Ok(self.expenses.remove(pos))
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Adds a stock item to the inventory.
    pub fn add_stock_item(&mut self, item: StockItem) {
        self.stock_items.push(item);
    }

    /// Removes a stock item.
    ///
    /// Sales that reference the item keep their `stock_item_id`; the
    /// reference becomes dangling and resolution falls back to manual
    /// profit handling.
    pub fn delete_stock_item(&mut self, item_id: &str) -> CoreResult<StockItem> {
        let pos = self
            .stock_items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::StockItemNotFound(item_id.to_string()))?;
        Ok(self.stock_items.remove(pos))
    }

    /// Adds units to an item's stock on hand. Returns the new quantity.
    ///
    /// Restocking is unbounded; `initial_quantity` is advisory and is not
    /// updated.
    pub fn stock_in(&mut self, item_id: &str, quantity: i64) -> CoreResult<i64> {
        let item = self
            .stock_items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::StockItemNotFound(item_id.to_string()))?;
        item.current_quantity += quantity;
        Ok(item.current_quantity)
    }

    // =========================================================================
    // Customers & Payments
    // =========================================================================

    /// Adds a customer.
    pub fn add_customer(&mut self, customer: Customer) {
        self.customers.push(customer);
    }

    /// Records a payment and reduces the customer's balance.
    ///
    /// The reduction has no floor: paying more than is owed drives the
    /// balance negative. A dangling `customer_id` skips the balance step
    /// but still records the payment.
    pub fn add_payment(&mut self, payment: Payment) {
        if let Some(customer) = self
            .customers
            .iter_mut()
            .find(|c| c.id == payment.customer_id)
        {
            customer.current_balance -= payment.amount;
        }
        self.payments.push(payment);
    }

    // =========================================================================
    // Config
    // =========================================================================

    /// Replaces the business config wholesale.
    pub fn update_config(&mut self, config: BusinessConfig) {
        self.config = Some(config);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Command Handlers
//!
//! One file per command group.
//!
//! ## Handler Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports + shared helpers)
//! ├── account.rs  ◄─── register, login, logout, whoami, admin
//! ├── sale.rs     ◄─── sale add/list/delete
//! ├── expense.rs  ◄─── expense add/list/delete
//! ├── stock.rs    ◄─── stock add/in/list/delete
//! ├── customer.rs ◄─── customer add/list/pay/ledger
//! ├── report.rs   ◄─── dashboard, report stock
//! └── config.rs   ◄─── config show/set
//! ```
//!
//! ## How Handlers Work
//! Every mutating handler follows the same load-mutate-save cycle:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. require_session()          who is signed in?                       │
//! │  2. gateway.load(username)     fetch the whole snapshot                │
//! │  3. validate + mutate          pure calls into bizpulse-core           │
//! │  4. gateway.save(username)     cache now, remote in background         │
//! │  5. println!                   human-readable confirmation             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Read-only handlers skip steps 3-4.

pub mod account;
pub mod config;
pub mod customer;
pub mod expense;
pub mod report;
pub mod sale;
pub mod stock;

use bizpulse_core::BusinessData;

/// Resolves a stock item given an id or a name.
///
/// Exact id match wins; otherwise the first case-insensitive name match.
pub(crate) fn find_stock_item_id(data: &BusinessData, needle: &str) -> Option<String> {
    if let Some(item) = data.stock_items.iter().find(|i| i.id == needle) {
        return Some(item.id.clone());
    }

    let lowered = needle.trim().to_lowercase();
    data.stock_items
        .iter()
        .find(|i| i.name.to_lowercase() == lowered)
        .map(|i| i.id.clone())
}

/// Resolves a customer given an id or a name.
///
/// Exact id match wins; otherwise the first case-insensitive name match.
pub(crate) fn find_customer_id(data: &BusinessData, needle: &str) -> Option<String> {
    if let Some(customer) = data.customers.iter().find(|c| c.id == needle) {
        return Some(customer.id.clone());
    }

    let lowered = needle.trim().to_lowercase();
    data.customers
        .iter()
        .find(|c| c.name.to_lowercase() == lowered)
        .map(|c| c.id.clone())
}

// =============================================================================
// Unit Tests
// =============================================================================

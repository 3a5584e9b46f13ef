//! # bizpulse-core: Pure Business Logic for BizPulse
//!
//! This crate is the **heart** of BizPulse. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BizPulse Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (bizpulse binary)                   │   │
//! │  │    argument parsing ──► command handlers ──► table output       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bizpulse-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │  metrics  │  │   │
//! │  │   │   Sale    │  │   Money   │  │ mutations │  │  profit   │  │   │
//! │  │   │ Customer  │  │ MarginCalc│  │ on BizData│  │  reports  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              bizpulse-store (Persistence Layer)                 │   │
//! │  │     SQLite cache, remote document store, account directory      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (BusinessData, Sale, Customer, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`ledger`] - Snapshot mutations (sales, stock, payments)
//! - [`metrics`] - Derived figures (profit, receivables, reports)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bizpulse_core::money::Money;
//! use bizpulse_core::types::{BusinessData, StockItem};
//!
//! let mut data = BusinessData::default();
//! data.add_stock_item(StockItem::new(
//!     "Rice 5kg",
//!     100,
//!     Money::from_major(400),
//!     Money::from_major(450),
//! ));
//!
//! assert_eq!(data.stock_items[0].current_quantity, 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod metrics;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bizpulse_core::Money` instead of
// `use bizpulse_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity for a single sale line or restock.
pub const MAX_LINE_QUANTITY: i64 = 999_999;

/// Items with `current_quantity` strictly below this are flagged as
/// low stock in listings.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

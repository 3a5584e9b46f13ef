//! # Domain Types
//!
//! Core domain types used throughout BizPulse.
//!
//! ## Type Hierarchy
//! ```text
//! BusinessData                    one JSON document per account
//! ├── sales:       Vec<Sale>      cash or credit, optionally stock-linked
//! ├── expenses:    Vec<Expense>   categorized outgoings
//! ├── stock_items: Vec<StockItem> inventory with purchase/selling prices
//! ├── customers:   Vec<Customer>  running balances for credit sales
//! ├── payments:    Vec<Payment>   balance reductions against customers
//! └── config:      BusinessConfig margin mode, currency, language
//!
//! Account                         registry entry / session identity
//! MarginRate                      basis-point margin (2000 = 20%)
//! ```
//!
//! Cross-references between entities (`stock_item_id`, `customer_id`) are
//! plain string ids, not indices. A referenced entity may have been deleted;
//! lookups return `Option` and callers decide how to degrade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

/// Generates a fresh entity id (UUID v4 as a string).
#[inline]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Margin Rate
// =============================================================================

/// Profit margin represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 2000 bps = 20%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginRate(u32);

impl MarginRate {
    /// Creates a margin rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        MarginRate(bps)
    }

    /// Creates a margin rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        MarginRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero margin rate.
    #[inline]
    pub const fn zero() -> Self {
        MarginRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for MarginRate {
    fn default() -> Self {
        MarginRate::zero()
    }
}

/// Margin applied to new accounts until the owner changes it.
pub const DEFAULT_TARGET_MARGIN: MarginRate = MarginRate::from_percent(20);

// =============================================================================
// Account
// =============================================================================

/// An account in the directory registry.
///
/// The same type doubles as the session identity: `without_password` strips
/// the credential before an account is handed to callers or persisted in
/// the session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Normalized username (trimmed, lower-cased).
    pub username: String,

    /// Stored credential. `None` on every value that leaves the directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Last successful login.
    pub last_login: DateTime<Utc>,

    /// Bootstrap administrator flag. Never set on registered accounts.
    #[serde(default)]
    pub is_admin: bool,
}

impl Account {
    /// Returns a copy safe to expose or persist in the session store.
    pub fn without_password(&self) -> Account {
        Account {
            username: self.username.clone(),
            password: None,
            last_login: self.last_login,
            is_admin: self.is_admin,
        }
    }
}

// =============================================================================
// Business Config
// =============================================================================

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bengali.
    Bn,
    /// English.
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Bn => "bn",
            Language::En => "en",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl std::str::FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bn" | "bengali" => Ok(Language::Bn),
            "en" | "english" => Ok(Language::En),
            other => Err(ValidationError::InvalidFormat {
                field: "language".to_string(),
                reason: format!("unknown language '{other}'"),
            }),
        }
    }
}

/// Per-account business settings stored inside the data document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Business display name.
    pub company_name: String,

    /// Free-text industry label (Retail, F&B, Service, ...).
    pub industry: String,

    /// Target profit margin used by margin-estimation mode.
    #[serde(default)]
    pub target_profit_margin: MarginRate,

    /// When true, profit on unresolved sales is estimated as
    /// `amount × target_profit_margin` instead of the full amount.
    #[serde(default)]
    pub use_margin_estimation: bool,

    /// Currency symbol prepended to displayed amounts.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Interface language.
    #[serde(default)]
    pub language: Language,
}

fn default_currency() -> String {
    "৳".to_string()
}

impl BusinessConfig {
    /// Creates the config for a freshly registered account.
    ///
    /// New accounts start with a 20% target margin and estimation enabled.
    pub fn new(company_name: impl Into<String>, industry: impl Into<String>, language: Language) -> Self {
        BusinessConfig {
            company_name: company_name.into(),
            industry: industry.into(),
            target_profit_margin: DEFAULT_TARGET_MARGIN,
            use_margin_estimation: true,
            currency: default_currency(),
            language,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// How a sale was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleKind {
    /// Paid in full at the time of sale.
    Cash,
    /// Added to the customer's running balance.
    Credit,
}

impl SaleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleKind::Cash => "cash",
            SaleKind::Credit => "credit",
        }
    }
}

impl std::str::FromStr for SaleKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(SaleKind::Cash),
            "credit" | "baki" => Ok(SaleKind::Credit),
            other => Err(ValidationError::InvalidFormat {
                field: "kind".to_string(),
                reason: format!("unknown sale kind '{other}', expected cash or credit"),
            }),
        }
    }
}

/// A recorded sale.
///
/// `stock_item_id` and `customer_id` are weak references: the entities they
/// point at may have been deleted since the sale was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar date of the sale.
    pub date: NaiveDate,

    /// Total amount of the sale.
    pub amount: Money,

    /// Cash or credit.
    pub kind: SaleKind,

    /// Paper bill or receipt number, if one was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,

    /// Linked stock item, if this sale moved inventory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_item_id: Option<String>,

    /// Units sold. Present only for stock-linked sales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    /// Customer carrying the balance, for credit sales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// Customer name snapshot at the time of sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// Expense
// =============================================================================

/// Expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    Salary,
    Rent,
    Electricity,
    Marketing,
    Utilities,
    Other,
}

impl ExpenseType {
    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Salary => "Staff Salary",
            ExpenseType::Rent => "Shop Rent",
            ExpenseType::Electricity => "Electricity Bill",
            ExpenseType::Marketing => "Marketing",
            ExpenseType::Utilities => "Utilities",
            ExpenseType::Other => "Other",
        }
    }
}

impl Default for ExpenseType {
    fn default() -> Self {
        ExpenseType::Other
    }
}

impl std::str::FromStr for ExpenseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "salary" => Ok(ExpenseType::Salary),
            "rent" => Ok(ExpenseType::Rent),
            "electricity" => Ok(ExpenseType::Electricity),
            "marketing" => Ok(ExpenseType::Marketing),
            "utilities" => Ok(ExpenseType::Utilities),
            "other" => Ok(ExpenseType::Other),
            other => Err(ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("unknown category '{other}'"),
            }),
        }
    }
}

/// A recorded business expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar date of the expense.
    pub date: NaiveDate,

    /// Expense category.
    pub category: ExpenseType,

    /// Amount spent.
    pub amount: Money,

    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Stock Item
// =============================================================================

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional stock-keeping code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Quantity recorded when the item was created. Advisory only; restocks
    /// do not update it, so `sold = initial + restocked - current` is not
    /// derivable from this field alone.
    pub initial_quantity: i64,

    /// Units currently on hand. Never negative.
    pub current_quantity: i64,

    /// Unit cost.
    pub purchase_price: Money,

    /// Unit selling price.
    pub selling_price: Money,
}

impl StockItem {
    /// Creates a new stock item with `current_quantity = initial_quantity`.
    pub fn new(
        name: impl Into<String>,
        initial_quantity: i64,
        purchase_price: Money,
        selling_price: Money,
    ) -> Self {
        StockItem {
            id: new_id(),
            name: name.into(),
            sku: None,
            initial_quantity,
            current_quantity: initial_quantity,
            purchase_price,
            selling_price,
        }
    }

    /// Profit earned per unit at the current prices.
    #[inline]
    pub fn unit_profit(&self) -> Money {
        self.selling_price - self.purchase_price
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer with a running balance.
///
/// `current_balance` is a stored value, updated by credit sales and
/// payments. Positive means the customer owes the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Optional address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Amount currently owed. May go negative if payments overshoot.
    pub current_balance: Money,
}

impl Customer {
    /// Creates a new customer with a zero balance.
    pub fn new(name: impl Into<String>, phone: Option<String>) -> Self {
        Customer {
            id: new_id(),
            name: name.into(),
            phone,
            address: None,
            current_balance: Money::zero(),
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment received against a customer's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer the payment belongs to (weak reference).
    pub customer_id: String,

    /// Calendar date of the payment.
    pub date: NaiveDate,

    /// Amount received.
    pub amount: Money,

    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// Business Data
// =============================================================================

/// The complete business snapshot for one account.
///
/// This is the unit of persistence: the whole value is serialized to one
/// JSON document, written locally, and pushed to the remote store. Every
/// collection defaults to empty so documents written by older versions
/// still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessData {
    #[serde(default)]
    pub sales: Vec<Sale>,

    #[serde(default)]
    pub expenses: Vec<Expense>,

    #[serde(default)]
    pub stock_items: Vec<StockItem>,

    #[serde(default)]
    pub customers: Vec<Customer>,

    #[serde(default)]
    pub payments: Vec<Payment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BusinessConfig>,
}

impl BusinessData {
    /// Resolves a stock item by id. `None` when the reference is dangling.
    pub fn find_stock_item(&self, id: &str) -> Option<&StockItem> {
        self.stock_items.iter().find(|item| item.id == id)
    }

    /// Resolves a customer by id. `None` when the reference is dangling.
    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id == id)
    }

    /// Currency symbol from config, or the default when config is absent.
    pub fn currency(&self) -> String {
        self.config
            .as_ref()
            .map(|c| c.currency.clone())
            .unwrap_or_else(default_currency)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_rate_conversions() {
        let rate = MarginRate::from_percent(20);
        assert_eq!(rate.bps(), 2000);
        assert_eq!(rate.percent(), 20.0);

        let fine = MarginRate::from_bps(1250);
        assert_eq!(fine.percent(), 12.5);
        assert!(MarginRate::zero().is_zero());
    }

    #[test]
    fn test_account_without_password() {
        let account = Account {
            username: "carol".to_string(),
            password: Some("secret".to_string()),
            last_login: Utc::now(),
            is_admin: false,
        };
        let public = account.without_password();
        assert_eq!(public.username, "carol");
        assert!(public.password.is_none());
    }

    #[test]
    fn test_account_serializes_without_password_field() {
        let account = Account {
            username: "carol".to_string(),
            password: Some("secret".to_string()),
            last_login: Utc::now(),
            is_admin: false,
        };
        let json = serde_json::to_string(&account.without_password()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_new_config_defaults() {
        let config = BusinessConfig::new("Mita Store", "Retail", Language::Bn);
        assert_eq!(config.target_profit_margin, MarginRate::from_percent(20));
        assert!(config.use_margin_estimation);
        assert_eq!(config.currency, "৳");
        assert_eq!(config.language, Language::Bn);
    }

    #[test]
    fn test_stock_item_starts_at_initial_quantity() {
        let item = StockItem::new("Rice 5kg", 100, Money::from_major(400), Money::from_major(450));
        assert_eq!(item.current_quantity, 100);
        assert_eq!(item.initial_quantity, 100);
        assert_eq!(item.unit_profit(), Money::from_major(50));
    }

    #[test]
    fn test_customer_starts_at_zero_balance() {
        let customer = Customer::new("Rahim", Some("01711-000000".to_string()));
        assert!(customer.current_balance.is_zero());
    }

    #[test]
    fn test_business_data_deserializes_with_missing_fields() {
        // Documents written before a field existed must still load.
        let data: BusinessData = serde_json::from_str(r#"{"sales": []}"#).unwrap();
        assert!(data.expenses.is_empty());
        assert!(data.customers.is_empty());
        assert!(data.config.is_none());

        let data: BusinessData = serde_json::from_str("{}").unwrap();
        assert!(data.sales.is_empty());
    }

    #[test]
    fn test_config_deserializes_with_missing_flags() {
        let json = r#"{"company_name": "Mita Store", "industry": "Retail"}"#;
        let config: BusinessConfig = serde_json::from_str(json).unwrap();
        assert!(!config.use_margin_estimation);
        assert!(config.target_profit_margin.is_zero());
        assert_eq!(config.currency, "৳");
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_find_helpers_return_none_for_dangling_refs() {
        let mut data = BusinessData::default();
        data.stock_items.push(StockItem::new(
            "Soap",
            10,
            Money::from_major(30),
            Money::from_major(40),
        ));
        let id = data.stock_items[0].id.clone();

        assert!(data.find_stock_item(&id).is_some());
        assert!(data.find_stock_item("no-such-id").is_none());
        assert!(data.find_customer("no-such-id").is_none());
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("salary".parse::<ExpenseType>().unwrap(), ExpenseType::Salary);
        assert_eq!("RENT".parse::<ExpenseType>().unwrap(), ExpenseType::Rent);
        assert!("fuel".parse::<ExpenseType>().is_err());

        assert_eq!("bn".parse::<Language>().unwrap(), Language::Bn);
        assert_eq!("English".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_sale_round_trip() {
        let sale = Sale {
            id: new_id(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount: Money::from_major(450),
            kind: SaleKind::Credit,
            bill_number: Some("INV-0042".to_string()),
            stock_item_id: Some("item-1".to_string()),
            quantity: Some(2),
            customer_id: Some("cust-1".to_string()),
            customer_name: Some("Rahim".to_string()),
            note: None,
        };
        let json = serde_json::to_string(&sale).unwrap();
        let parsed: Sale = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sale);
        assert!(json.contains(r#""kind":"credit""#));
        assert!(json.contains(r#""date":"2024-06-01""#));
        // Optional fields stay out of the document when unset.
        assert!(!json.contains("note"));
    }
}

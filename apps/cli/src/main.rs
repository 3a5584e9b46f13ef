//! BizPulse CLI - business tracking for small shops.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in
//! bizpulse register -u karim -p pass123 --company "Mita Store" --industry Grocery
//!
//! # Record a cash sale against stock (amount = selling price x quantity)
//! bizpulse sale add --item "Rice 5kg" --quantity 2
//!
//! # Record a credit sale
//! bizpulse sale add --amount 1200 --kind credit --customer "Rahim Mia"
//!
//! # Receive a customer payment
//! bizpulse customer pay "Rahim Mia" --amount 500
//!
//! # See how the business is doing
//! bizpulse dashboard
//! bizpulse report stock
//! ```
//!
//! # Commands
//!
//! - `register` / `login` / `logout` / `whoami` - account lifecycle
//! - `sale`, `expense`, `stock`, `customer` - day-to-day bookkeeping
//! - `dashboard`, `report` - derived metrics
//! - `config` - business settings
//! - `admin` - administrator operations (accounts, delete)
//!
//! Diagnostics go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=bizpulse=debug`)
//! to see them.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bizpulse_core::{ExpenseType, Language, Money, SaleKind};

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "bizpulse")]
#[command(author, version, about = "Business tracking for small shops")]
struct Cli {
    /// Alternate store config file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account and sign in
    Register {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (at least 4 characters)
        #[arg(short, long)]
        password: String,

        /// Business name shown on the dashboard
        #[arg(long, default_value = "My Business")]
        company: String,

        /// Line of business (e.g. Grocery, Pharmacy)
        #[arg(long, default_value = "General")]
        industry: String,

        /// Interface language (`en` or `bn`)
        #[arg(long, default_value = "en")]
        language: Language,
    },

    /// Sign in to an existing account
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Record and inspect sales
    Sale {
        #[command(subcommand)]
        action: SaleAction,
    },

    /// Record and inspect expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Manage stock items
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },

    /// Manage customers and their balances
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Show the financial dashboard
    Dashboard,

    /// Detailed reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },

    /// View or change business settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Administrator operations
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SaleAction {
    /// Record a sale
    Add {
        /// Sale amount, e.g. 1250 or 1250.50. Defaults to the item's
        /// selling price times --quantity when --item is given.
        #[arg(short, long)]
        amount: Option<Money>,

        /// How the sale was settled: `cash` or `credit`
        #[arg(short, long, default_value = "cash")]
        kind: SaleKind,

        /// Stock item to deduct (id or name)
        #[arg(long, value_name = "ITEM")]
        item: Option<String>,

        /// Units sold (required with --item)
        #[arg(short, long)]
        quantity: Option<i64>,

        /// Customer carrying the balance (id or name); required for credit
        #[arg(long, value_name = "CUSTOMER")]
        customer: Option<String>,

        /// Bill or receipt number
        #[arg(long, value_name = "NO")]
        bill: Option<String>,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,

        /// Sale date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List recorded sales
    List {
        /// Show only the most recent N sales
        #[arg(long, value_name = "N")]
        last: Option<usize>,
    },

    /// Remove a sale, restoring stock and customer balance
    Delete {
        /// Sale id (see `sale list`)
        id: String,
    },
}

#[derive(Subcommand)]
enum ExpenseAction {
    /// Record an expense
    Add {
        #[arg(short, long)]
        amount: Money,

        /// Category: salary, rent, electricity, marketing, utilities, other
        #[arg(short, long, default_value = "other")]
        category: ExpenseType,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List recorded expenses
    List,

    /// Remove an expense
    Delete {
        /// Expense id (see `expense list`)
        id: String,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Add a stock item
    Add {
        #[arg(short, long)]
        name: String,

        /// Opening quantity
        #[arg(short, long, default_value_t = 0)]
        quantity: i64,

        /// Unit purchase price
        #[arg(long)]
        buy: Money,

        /// Unit selling price
        #[arg(long)]
        sell: Option<Money>,

        /// Derive the selling price from --buy plus this margin (percent)
        #[arg(long, value_name = "PCT")]
        margin: Option<u32>,

        /// Stock-keeping code
        #[arg(long)]
        sku: Option<String>,
    },

    /// Receive stock for an existing item
    In {
        /// Stock item (id or name)
        item: String,

        #[arg(short, long)]
        quantity: i64,
    },

    /// List stock items
    List,

    /// Remove a stock item (past sales keep their records)
    Delete {
        /// Stock item id (see `stock list`)
        id: String,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Add a customer
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// List customers and their balances
    List,

    /// Record a payment received from a customer
    Pay {
        /// Customer (id or name)
        customer: String,

        #[arg(short, long)]
        amount: Money,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,

        /// Payment date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show a customer's statement
    Ledger {
        /// Customer (id or name)
        customer: String,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Stock valuation: sold, on hand, capital tied up, potential revenue
    Stock,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current business settings
    Show,

    /// Change business settings (only the given flags are updated)
    Set {
        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        /// Target profit margin in percent (0-100)
        #[arg(long)]
        margin: Option<u32>,

        /// Estimate profit on unlinked sales: `on` or `off`
        #[arg(long, value_name = "ON|OFF")]
        estimation: Option<String>,

        /// Currency symbol used in output
        #[arg(long)]
        currency: Option<String>,

        /// Interface language (`en` or `bn`)
        #[arg(long)]
        language: Option<Language>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List registered accounts
    Accounts,

    /// Delete an account and purge its data
    Delete {
        /// Username of the account to delete
        username: String,

        /// Skip the confirmation step
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = context::AppContext::init(cli.config).await?;

    match cli.command {
        Commands::Register {
            username,
            password,
            company,
            industry,
            language,
        } => {
            commands::account::register(&ctx, &username, &password, company, industry, language)
                .await?
        }
        Commands::Login { username, password } => {
            commands::account::login(&ctx, &username, &password).await?
        }
        Commands::Logout => commands::account::logout(&ctx).await?,
        Commands::Whoami => commands::account::whoami(&ctx).await?,

        Commands::Sale { action } => match action {
            SaleAction::Add {
                amount,
                kind,
                item,
                quantity,
                customer,
                bill,
                note,
                date,
            } => {
                commands::sale::add(&ctx, amount, kind, item, quantity, customer, bill, note, date)
                    .await?
            }
            SaleAction::List { last } => commands::sale::list(&ctx, last).await?,
            SaleAction::Delete { id } => commands::sale::delete(&ctx, &id).await?,
        },

        Commands::Expense { action } => match action {
            ExpenseAction::Add {
                amount,
                category,
                note,
                date,
            } => commands::expense::add(&ctx, amount, category, note, date).await?,
            ExpenseAction::List => commands::expense::list(&ctx).await?,
            ExpenseAction::Delete { id } => commands::expense::delete(&ctx, &id).await?,
        },

        Commands::Stock { action } => match action {
            StockAction::Add {
                name,
                quantity,
                buy,
                sell,
                margin,
                sku,
            } => commands::stock::add(&ctx, &name, quantity, buy, sell, margin, sku).await?,
            StockAction::In { item, quantity } => {
                commands::stock::stock_in(&ctx, &item, quantity).await?
            }
            StockAction::List => commands::stock::list(&ctx).await?,
            StockAction::Delete { id } => commands::stock::delete(&ctx, &id).await?,
        },

        Commands::Customer { action } => match action {
            CustomerAction::Add {
                name,
                phone,
                address,
            } => commands::customer::add(&ctx, &name, phone, address).await?,
            CustomerAction::List => commands::customer::list(&ctx).await?,
            CustomerAction::Pay {
                customer,
                amount,
                note,
                date,
            } => commands::customer::pay(&ctx, &customer, amount, note, date).await?,
            CustomerAction::Ledger { customer } => {
                commands::customer::ledger(&ctx, &customer).await?
            }
        },

        Commands::Dashboard => commands::report::dashboard(&ctx).await?,
        Commands::Report { kind } => match kind {
            ReportKind::Stock => commands::report::stock(&ctx).await?,
        },

        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&ctx).await?,
            ConfigAction::Set {
                company,
                industry,
                margin,
                estimation,
                currency,
                language,
            } => {
                commands::config::set(
                    &ctx, company, industry, margin, estimation, currency, language,
                )
                .await?
            }
        },

        Commands::Admin { action } => match action {
            AdminAction::Accounts => commands::account::admin_accounts(&ctx).await?,
            AdminAction::Delete { username, yes } => {
                commands::account::admin_delete(&ctx, &username, yes).await?
            }
        },
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Quiet by default so tables stay clean; `RUST_LOG` opts into more.
/// Diagnostics go to stderr, never stdout.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! # bullion_core - Precious-Metal Billing Engine
//!
//! `bullion_core` computes gold and silver purchase bills and keeps the
//! shop's ledger: transactions, accounts, audit log and settings. All inputs
//! and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure calculators**: [`calculations`] take input and return a bill, no I/O
//! - **Append-only records**: transactions and audit entries are never edited
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use bullion_core::calculations::{BillRequest, SilverBillInput};
//! use bullion_core::ledger::Ledger;
//! use bullion_core::purity::PurityTable;
//! use bullion_core::transactions::record_bill;
//! use bullion_core::units::{Grams, Percent, PricePerGram};
//!
//! let mut ledger = Ledger::new("Main Street Jewellers");
//! let request = BillRequest::Silver(SilverBillInput {
//!     weight: Grams(100.0),
//!     price_per_gram: PricePerGram(0.8),
//!     purity_percent: 92.5,
//!     service_charge_rate: Percent(0.0),
//!     tax_rate: Percent(0.0),
//! });
//!
//! let (tx, bill) = record_bill(&mut ledger, &request, &PurityTable::default()).unwrap();
//! assert_eq!(tx.id, 1);
//! assert!((bill.final_total.0 - 74.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Gold and silver bill calculators
//! - [`purity`] - Karat table and silver fineness
//! - [`form`] - Parsing submitted text fields
//! - [`transactions`] - Append-only transaction repository
//! - [`ledger`] - Root persisted container
//! - [`accounts`], [`access`], [`audit`], [`settings`] - Shop administration
//! - [`export`] - CSV export
//! - [`health`], [`dashboard`] - Status views
//! - [`config`] - JSON configuration
//! - [`file_io`] - Atomic saves and locking
//! - [`errors`] - Structured error types

pub mod access;
pub mod accounts;
pub mod audit;
pub mod calculations;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod form;
pub mod health;
pub mod ledger;
pub mod password;
pub mod purity;
pub mod settings;
pub mod transactions;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use access::{Capability, Role};
pub use accounts::{Registration, User};
pub use calculations::{Bill, BillRequest, Metal};
pub use config::AppConfig;
pub use errors::{BillError, BillResult};
pub use file_io::{load_ledger, load_or_create_ledger, save_ledger, FileLock};
pub use ledger::Ledger;
pub use purity::PurityTable;
pub use transactions::{record_bill, Transaction, TransactionFilter, TransactionRepository};

//! # Ledger
//!
//! The `Ledger` is the root container for everything the shop persists.
//! It serializes to a `.bullion` file as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Ledger
//! ├── meta: LedgerMetadata (version, shop name, timestamps)
//! ├── settings: Option<ShopSettings> (currency, theme)
//! ├── remembered: RememberedRates (last used price and rates per metal)
//! ├── counters: IdCounters (next id per record kind)
//! ├── transactions: Vec<Transaction> (append-only)
//! ├── users: Vec<User>
//! └── audit: Vec<AuditEntry> (append-only)
//! ```
//!
//! Transactions and audit entries are never edited or removed. Account
//! operations live in [`crate::accounts`], audit operations in
//! [`crate::audit`], and settings in [`crate::settings`].
//!
//! ## Example
//!
//! ```rust
//! use bullion_core::ledger::Ledger;
//!
//! let ledger = Ledger::new("Main Street Jewellers");
//! let json = serde_json::to_string_pretty(&ledger).unwrap();
//! assert!(json.contains("Main Street Jewellers"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::User;
use crate::audit::AuditEntry;
use crate::calculations::{BillRequest, Metal};
use crate::errors::BillResult;
use crate::settings::ShopSettings;
use crate::transactions::{NewTransaction, Transaction, TransactionFilter, TransactionRepository};
use crate::units::{Percent, PricePerGram};

/// Current schema version for .bullion files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root persisted container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// Ledger metadata (version, shop, timestamps)
    pub meta: LedgerMetadata,

    /// Shop settings; `None` until an admin saves them
    #[serde(default)]
    pub settings: Option<ShopSettings>,

    /// Form defaults carried between bills
    #[serde(default)]
    pub remembered: RememberedRates,

    #[serde(default)]
    pub(crate) counters: IdCounters,

    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,

    #[serde(default)]
    pub(crate) users: Vec<User>,

    #[serde(default)]
    pub(crate) audit: Vec<AuditEntry>,
}

impl Ledger {
    /// Create a new empty ledger.
    pub fn new(shop_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Ledger {
            meta: LedgerMetadata {
                version: SCHEMA_VERSION.to_string(),
                shop_name: shop_name.into(),
                created: now,
                modified: now,
            },
            settings: None,
            remembered: RememberedRates::default(),
            counters: IdCounters::default(),
            transactions: Vec::new(),
            users: Vec::new(),
            audit: Vec::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of stored transactions for a metal
    pub fn transaction_count(&self, metal: Metal) -> usize {
        self.transactions.iter().filter(|t| t.metal == metal).count()
    }

    /// Remember the price and rates of a successful bill as the next form
    /// defaults for that metal.
    pub fn remember_rates(&mut self, request: &BillRequest) {
        let (_, price_per_gram, service_charge_rate, tax_rate) = request.common();
        let rates = RateDefaults {
            price_per_gram,
            service_charge_rate,
            tax_rate,
        };
        match request.metal() {
            Metal::Gold => self.remembered.gold = Some(rates),
            Metal::Silver => self.remembered.silver = Some(rates),
        }
        self.touch();
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new("")
    }
}

impl TransactionRepository for Ledger {
    fn append(&mut self, record: NewTransaction) -> BillResult<Transaction> {
        let id = self.counters.next_transaction();
        let tx = record.into_transaction(id, Utc::now());
        self.transactions.push(tx.clone());
        self.touch();
        Ok(tx)
    }

    fn transactions(&self, filter: TransactionFilter) -> Vec<&Transaction> {
        let mut listed = Vec::with_capacity(self.transactions.len());
        for metal in filter.metals() {
            let mut group: Vec<&Transaction> =
                self.transactions.iter().filter(|t| t.metal == *metal).collect();
            group.sort_by_key(|t| t.id);
            listed.extend(group);
        }
        listed
    }

    fn transaction(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}

/// Ledger metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Shop name shown on bills
    pub shop_name: String,

    /// When the ledger was created
    pub created: DateTime<Utc>,

    /// When the ledger was last modified
    pub modified: DateTime<Utc>,
}

/// Last-issued id per record kind. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub transaction: u64,
    pub user: u64,
    pub audit: u64,
}

impl IdCounters {
    pub fn next_transaction(&mut self) -> u64 {
        self.transaction += 1;
        self.transaction
    }

    pub fn next_user(&mut self) -> u64 {
        self.user += 1;
        self.user
    }

    pub fn next_audit(&mut self) -> u64 {
        self.audit += 1;
        self.audit
    }
}

/// Price and rates last used for one metal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateDefaults {
    pub price_per_gram: PricePerGram,
    pub service_charge_rate: Percent,
    pub tax_rate: Percent,
}

impl Default for RateDefaults {
    fn default() -> Self {
        RateDefaults {
            price_per_gram: PricePerGram(0.0),
            service_charge_rate: Percent(0.0),
            tax_rate: Percent(0.0),
        }
    }
}

/// Form defaults per metal. Absent until the first successful bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RememberedRates {
    pub gold: Option<RateDefaults>,
    pub silver: Option<RateDefaults>,
}

impl RememberedRates {
    /// Defaults for a metal's form, zeros when nothing was remembered.
    pub fn for_metal(&self, metal: Metal) -> RateDefaults {
        let remembered = match metal {
            Metal::Gold => self.gold,
            Metal::Silver => self.silver,
        };
        remembered.unwrap_or_default()
    }
}

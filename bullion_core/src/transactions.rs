//! # Transaction Records
//!
//! Every successful bill becomes one immutable [`Transaction`]. Storage is
//! hidden behind [`TransactionRepository`], an append-only interface keyed by
//! an id the repository assigns; the calculators never see it. The two meet
//! only in [`record_bill`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::{Bill, BillRequest, Metal};
use crate::errors::BillResult;
use crate::purity::PurityTable;
use crate::units::{Grams, Money, Percent, PricePerGram};

/// A persisted bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Auto-assigned, unique across both metals
    pub id: u64,
    pub metal: Metal,
    pub weight: Grams,
    pub price_per_gram: PricePerGram,
    /// Karat label for gold, percentage text for silver
    pub purity: String,
    pub service_charge_rate: Percent,
    pub tax_rate: Percent,
    pub total: Money,
    pub timestamp: DateTime<Utc>,
}

/// Everything a transaction holds except the fields the repository assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub metal: Metal,
    pub weight: Grams,
    pub price_per_gram: PricePerGram,
    pub purity: String,
    pub service_charge_rate: Percent,
    pub tax_rate: Percent,
    pub total: Money,
}

impl NewTransaction {
    /// Pair a request with the bill computed from it.
    pub fn from_bill(request: &BillRequest, bill: &Bill) -> Self {
        let (weight, price_per_gram, service_charge_rate, tax_rate) = request.common();
        NewTransaction {
            metal: request.metal(),
            weight,
            price_per_gram,
            purity: request.purity_label(),
            service_charge_rate,
            tax_rate,
            total: bill.final_total,
        }
    }

    /// Stamp with an id and time.
    pub fn into_transaction(self, id: u64, timestamp: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            metal: self.metal,
            weight: self.weight,
            price_per_gram: self.price_per_gram,
            purity: self.purity,
            service_charge_rate: self.service_charge_rate,
            tax_rate: self.tax_rate,
            total: self.total,
            timestamp,
        }
    }
}

/// Which transactions a history or export view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionFilter {
    #[default]
    All,
    Gold,
    Silver,
}

impl TransactionFilter {
    /// Parse a query value. Anything other than "gold" or "silver" means
    /// everything.
    pub fn from_query(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "gold" => TransactionFilter::Gold,
            "silver" => TransactionFilter::Silver,
            _ => TransactionFilter::All,
        }
    }

    /// Metals to list, in display order
    pub fn metals(&self) -> &'static [Metal] {
        match self {
            TransactionFilter::All => &Metal::ALL,
            TransactionFilter::Gold => &[Metal::Gold],
            TransactionFilter::Silver => &[Metal::Silver],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionFilter::All => "all",
            TransactionFilter::Gold => "gold",
            TransactionFilter::Silver => "silver",
        }
    }
}

/// Append-only transaction storage.
pub trait TransactionRepository {
    /// Store a record, assigning its id and timestamp.
    fn append(&mut self, record: NewTransaction) -> BillResult<Transaction>;

    /// Records matching the filter: grouped by metal (gold first), each
    /// group in id order.
    fn transactions(&self, filter: TransactionFilter) -> Vec<&Transaction>;

    /// Look up one record by id.
    fn transaction(&self, id: u64) -> Option<&Transaction>;
}

/// Calculate a bill and, only if that succeeds, persist it.
///
/// # Returns
///
/// * `Ok((Transaction, Bill))` - The stored record and its breakdown
/// * `Err(BillError::InvalidInput)` - Nothing was stored
pub fn record_bill<R: TransactionRepository + ?Sized>(
    repo: &mut R,
    request: &BillRequest,
    table: &PurityTable,
) -> BillResult<(Transaction, Bill)> {
    let bill = match request.calculate(table) {
        Ok(bill) => bill,
        Err(e) => {
            warn!(metal = %request.metal(), error = %e, "rejected bill input");
            return Err(e);
        }
    };

    let stored = repo.append(NewTransaction::from_bill(request, &bill))?;
    info!(
        id = stored.id,
        metal = %stored.metal,
        total = %stored.total,
        "recorded transaction"
    );
    Ok((stored, bill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{GoldBillInput, SilverBillInput};

    /// Minimal in-memory repository for exercising the trait contract
    #[derive(Default)]
    struct MemoryRepo {
        rows: Vec<Transaction>,
    }

    impl TransactionRepository for MemoryRepo {
        fn append(&mut self, record: NewTransaction) -> BillResult<Transaction> {
            let tx = record.into_transaction(self.rows.len() as u64 + 1, Utc::now());
            self.rows.push(tx.clone());
            Ok(tx)
        }

        fn transactions(&self, filter: TransactionFilter) -> Vec<&Transaction> {
            let mut listed = Vec::new();
            for metal in filter.metals() {
                listed.extend(self.rows.iter().filter(|t| t.metal == *metal));
            }
            listed
        }

        fn transaction(&self, id: u64) -> Option<&Transaction> {
            self.rows.iter().find(|t| t.id == id)
        }
    }

    fn gold_request(weight: f64) -> BillRequest {
        BillRequest::Gold(GoldBillInput {
            weight: Grams(weight),
            price_per_gram: PricePerGram(60.0),
            purity: "24k".to_string(),
            service_charge_rate: Percent(5.0),
            tax_rate: Percent(3.0),
        })
    }

    #[test]
    fn test_record_bill_persists_on_success() {
        let mut repo = MemoryRepo::default();
        let (tx, bill) = record_bill(&mut repo, &gold_request(10.0), &PurityTable::default()).unwrap();
        assert_eq!(tx.id, 1);
        assert_eq!(tx.purity, "24K");
        assert_eq!(tx.total, bill.final_total);
        assert_eq!(repo.transaction(1), Some(&tx));
    }

    #[test]
    fn test_invalid_input_persists_nothing() {
        let mut repo = MemoryRepo::default();
        let err = record_bill(&mut repo, &gold_request(-1.0), &PurityTable::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(repo.transactions(TransactionFilter::All).is_empty());
    }

    #[test]
    fn test_silver_record_keeps_percentage() {
        let mut repo = MemoryRepo::default();
        let request = BillRequest::Silver(SilverBillInput {
            weight: Grams(100.0),
            price_per_gram: PricePerGram(0.8),
            purity_percent: 92.5,
            service_charge_rate: Percent(0.0),
            tax_rate: Percent(0.0),
        });
        let (tx, _) = record_bill(&mut repo, &request, &PurityTable::default()).unwrap();
        assert_eq!(tx.metal, Metal::Silver);
        assert_eq!(tx.purity, "92.5");
        assert!((tx.total.0 - 74.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_bill_persists_nothing() {
        let mut repo = MemoryRepo::default();
        let request = BillRequest::Silver(SilverBillInput {
            weight: Grams(1e200),
            price_per_gram: PricePerGram(1e200),
            purity_percent: 100.0,
            service_charge_rate: Percent(0.0),
            tax_rate: Percent(0.0),
        });
        assert!(record_bill(&mut repo, &request, &PurityTable::default()).is_err());
        assert!(repo.transactions(TransactionFilter::All).is_empty());
    }

    #[test]
    fn test_filter_from_query() {
        assert_eq!(TransactionFilter::from_query("gold"), TransactionFilter::Gold);
        assert_eq!(TransactionFilter::from_query("SILVER"), TransactionFilter::Silver);
        assert_eq!(TransactionFilter::from_query("all"), TransactionFilter::All);
        assert_eq!(TransactionFilter::from_query("platinum"), TransactionFilter::All);
    }
}

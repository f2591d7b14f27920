//! CSV export of transaction history.
//!
//! Columns: `ID,Type,Weight (g),Price per Gram,Purity,Service Charge,Tax,Total,Timestamp`

use std::io::Write;

use csv::WriterBuilder;

use crate::errors::{BillError, BillResult};
use crate::transactions::Transaction;

pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Type",
    "Weight (g)",
    "Price per Gram",
    "Purity",
    "Service Charge",
    "Tax",
    "Total",
    "Timestamp",
];

/// Timestamp layout used in exports, microsecond precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Suggested download name
pub const EXPORT_FILE_NAME: &str = "transactions.csv";

/// Write the header and one row per transaction.
pub fn write_csv<'a, W, I>(transactions: I, writer: W) -> BillResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(CSV_HEADER).map_err(BillError::serialization)?;

    for t in transactions {
        wtr.write_record([
            t.id.to_string(),
            t.metal.display_name().to_string(),
            number(t.weight.0),
            number(t.price_per_gram.0),
            t.purity.clone(),
            number(t.service_charge_rate.0),
            number(t.tax_rate.0),
            number(t.total.0),
            t.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ])
        .map_err(BillError::serialization)?;
    }

    wtr.flush()
        .map_err(|e| BillError::file_error("flush", "csv export", e.to_string()))?;
    Ok(())
}

/// Render transactions to an in-memory CSV document.
pub fn to_csv_string<'a, I>(transactions: I) -> BillResult<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buf = Vec::new();
    write_csv(transactions, &mut buf)?;
    String::from_utf8(buf).map_err(BillError::serialization)
}

/// Plain decimal notation, never exponent form. Whole values keep a
/// trailing `.0` (10 -> "10.0").
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::Metal;
    use crate::units::{Grams, Money, Percent, PricePerGram};
    use chrono::{TimeZone, Utc};

    fn sample(id: u64, metal: Metal, purity: &str, total: f64) -> Transaction {
        Transaction {
            id,
            metal,
            weight: Grams(10.0),
            price_per_gram: PricePerGram(60.0),
            purity: purity.to_string(),
            service_charge_rate: Percent(5.0),
            tax_rate: Percent(3.0),
            total: Money(total),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let csv = to_csv_string(std::iter::empty::<&Transaction>()).unwrap();
        assert_eq!(
            csv,
            "ID,Type,Weight (g),Price per Gram,Purity,Service Charge,Tax,Total,Timestamp\n"
        );
    }

    #[test]
    fn test_rows() {
        let rows = vec![sample(1, Metal::Gold, "24K", 648.9), sample(2, Metal::Silver, "92.5", 74.0)];
        let csv = to_csv_string(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,Gold,10.0,60.0,24K,5.0,3.0,648.9,2024-03-01 09:30:00.000000");
        assert_eq!(lines[2], "2,Silver,10.0,60.0,92.5,5.0,3.0,74.0,2024-03-01 09:30:00.000000");
    }

    #[test]
    fn test_numbers_never_use_exponent_form() {
        assert_eq!(number(1e21), "1000000000000000000000.0");
        assert_eq!(number(0.0000001), "0.0000001");
        assert_eq!(number(648.9), "648.9");
        assert_eq!(number(74.0), "74.0");

        let rows = vec![sample(4, Metal::Gold, "24K", 2.5e22)];
        let csv = to_csv_string(&rows).unwrap();
        assert!(csv.contains(",25000000000000000000000.0,"));
        assert!(!csv.contains("e22"));
    }

    #[test]
    fn test_purity_with_comma_is_quoted() {
        let rows = vec![sample(3, Metal::Gold, "22K, hallmarked", 1.0)];
        let csv = to_csv_string(&rows).unwrap();
        assert!(csv.contains("\"22K, hallmarked\""));
    }
}

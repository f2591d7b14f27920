//! # Gold Bill Calculation
//!
//! Prices gold by weight, then scales by the fineness of the karat grade
//! before adding service charge and tax.
//!
//! ## Example
//!
//! ```rust
//! use bullion_core::calculations::gold::{calculate, GoldBillInput};
//! use bullion_core::purity::PurityTable;
//! use bullion_core::units::{Grams, Percent, PricePerGram};
//!
//! let input = GoldBillInput {
//!     weight: Grams(10.0),
//!     price_per_gram: PricePerGram(60.0),
//!     purity: "24K".to_string(),
//!     service_charge_rate: Percent(5.0),
//!     tax_rate: Percent(3.0),
//! };
//!
//! let bill = calculate(&input, &PurityTable::default()).unwrap();
//! assert!((bill.final_total.0 - 648.9).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::{price_bill, validate_common, Bill};
use crate::errors::BillResult;
use crate::purity::PurityTable;
use crate::units::{Grams, Percent, PricePerGram};

/// Input parameters for a gold bill.
///
/// ## JSON Example
///
/// ```json
/// {
///   "weight": 10.0,
///   "price_per_gram": 60.0,
///   "purity": "22K",
///   "service_charge_rate": 5.0,
///   "tax_rate": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldBillInput {
    /// Weight in grams
    pub weight: Grams,

    /// Price of one gram of pure gold
    pub price_per_gram: PricePerGram,

    /// Karat label from the purity table (e.g., "22K")
    pub purity: String,

    /// Service charge, percent of the purity-adjusted value
    pub service_charge_rate: Percent,

    /// Tax, percent of purity-adjusted value plus service charge
    pub tax_rate: Percent,
}

impl GoldBillInput {
    /// Validate input parameters and resolve the purity factor.
    pub fn validate(&self, table: &PurityTable) -> BillResult<f64> {
        validate_common(self.weight, self.price_per_gram, self.service_charge_rate, self.tax_rate)?;
        table.factor(&self.purity)
    }
}

/// Calculate a gold bill.
///
/// # Returns
///
/// * `Ok(Bill)` - The full breakdown
/// * `Err(BillError::InvalidInput)` - Non-positive weight or price, negative
///   rate, or a karat label the table doesn't list
pub fn calculate(input: &GoldBillInput, table: &PurityTable) -> BillResult<Bill> {
    let factor = input.validate(table)?;
    price_bill(
        input.weight,
        input.price_per_gram,
        factor,
        input.service_charge_rate,
        input.tax_rate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> GoldBillInput {
        GoldBillInput {
            weight: Grams(10.0),
            price_per_gram: PricePerGram(60.0),
            purity: "24K".to_string(),
            service_charge_rate: Percent(5.0),
            tax_rate: Percent(3.0),
        }
    }

    #[test]
    fn test_reference_bill() {
        let bill = calculate(&test_input(), &PurityTable::default()).unwrap();
        assert_eq!(bill.base_value.0, 600.0);
        assert_eq!(bill.purity_adjusted_value.0, 600.0);
        assert_eq!(bill.service_charge_amount.0, 30.0);
        assert!((bill.tax_amount.0 - 18.9).abs() < 1e-9);
        assert!((bill.final_total.0 - 648.9).abs() < 1e-9);
    }

    #[test]
    fn test_24k_keeps_base_value() {
        let mut input = test_input();
        input.weight = Grams(3.7);
        input.price_per_gram = PricePerGram(71.13);
        let bill = calculate(&input, &PurityTable::default()).unwrap();
        assert_eq!(bill.purity_adjusted_value, bill.base_value);
    }

    #[test]
    fn test_22k_adjustment() {
        let mut input = test_input();
        input.purity = "22K".to_string();
        let bill = calculate(&input, &PurityTable::default()).unwrap();
        // 600 x 0.916 = 549.6
        assert!((bill.purity_adjusted_value.0 - 549.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rates() {
        let mut input = test_input();
        input.purity = "18K".to_string();
        input.service_charge_rate = Percent(0.0);
        input.tax_rate = Percent(0.0);
        let bill = calculate(&input, &PurityTable::default()).unwrap();
        assert_eq!(bill.final_total, bill.purity_adjusted_value);
        assert_eq!(bill.final_total.0, 450.0);
    }

    #[test]
    fn test_invalid_weight() {
        let mut input = test_input();
        input.weight = Grams(-1.0);
        let err = calculate(&input, &PurityTable::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_price_and_rates() {
        let table = PurityTable::default();

        let mut input = test_input();
        input.price_per_gram = PricePerGram(0.0);
        assert!(calculate(&input, &table).is_err());

        let mut input = test_input();
        input.service_charge_rate = Percent(-5.0);
        assert!(calculate(&input, &table).is_err());

        let mut input = test_input();
        input.tax_rate = Percent(-0.01);
        assert!(calculate(&input, &table).is_err());
    }

    #[test]
    fn test_overflowing_bill_is_rejected() {
        let mut input = test_input();
        input.weight = Grams(1e200);
        input.price_per_gram = PricePerGram(1e200);
        assert_eq!(
            calculate(&input, &PurityTable::default()).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
    }

    #[test]
    fn test_unknown_purity() {
        let mut input = test_input();
        input.purity = "25K".to_string();
        assert!(calculate(&input, &PurityTable::default()).is_err());
    }

    #[test]
    fn test_serialization() {
        let input = test_input();
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: GoldBillInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}

//! # Silver Bill Calculation
//!
//! Same pricing as gold, but fineness is entered directly as a percentage
//! (92.5 for sterling), so no purity table is involved.

use serde::{Deserialize, Serialize};

use super::{price_bill, validate_common, Bill};
use crate::errors::BillResult;
use crate::purity::silver_factor;
use crate::units::{Grams, Percent, PricePerGram};

/// Input parameters for a silver bill.
///
/// ## JSON Example
///
/// ```json
/// {
///   "weight": 100.0,
///   "price_per_gram": 0.8,
///   "purity_percent": 92.5,
///   "service_charge_rate": 0.0,
///   "tax_rate": 0.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilverBillInput {
    /// Weight in grams
    pub weight: Grams,

    /// Price of one gram of pure silver
    pub price_per_gram: PricePerGram,

    /// Fineness in percent, 0-100
    pub purity_percent: f64,

    /// Service charge, percent of the purity-adjusted value
    pub service_charge_rate: Percent,

    /// Tax, percent of purity-adjusted value plus service charge
    pub tax_rate: Percent,
}

impl SilverBillInput {
    /// Validate input parameters and resolve the purity factor.
    pub fn validate(&self) -> BillResult<f64> {
        validate_common(self.weight, self.price_per_gram, self.service_charge_rate, self.tax_rate)?;
        silver_factor(self.purity_percent)
    }
}

/// Calculate a silver bill.
pub fn calculate(input: &SilverBillInput) -> BillResult<Bill> {
    let factor = input.validate()?;
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

    fn test_input() -> SilverBillInput {
        SilverBillInput {
            weight: Grams(100.0),
            price_per_gram: PricePerGram(0.8),
            purity_percent: 92.5,
            service_charge_rate: Percent(0.0),
            tax_rate: Percent(0.0),
        }
    }

    #[test]
    fn test_sterling_bill() {
        let bill = calculate(&test_input()).unwrap();
        assert!((bill.base_value.0 - 80.0).abs() < 1e-9);
        assert!((bill.final_total.0 - 74.0).abs() < 1e-9);
        assert_eq!(bill.final_total, bill.purity_adjusted_value);
    }

    #[test]
    fn test_fine_silver_keeps_base_value() {
        let mut input = test_input();
        input.purity_percent = 100.0;
        let bill = calculate(&input).unwrap();
        assert_eq!(bill.purity_adjusted_value, bill.base_value);
    }

    #[test]
    fn test_charges_applied() {
        let mut input = test_input();
        input.service_charge_rate = Percent(10.0);
        input.tax_rate = Percent(5.0);
        let bill = calculate(&input).unwrap();
        // 74 + 7.4 = 81.4; tax 4.07
        assert!((bill.service_charge_amount.0 - 7.4).abs() < 1e-9);
        assert!((bill.tax_amount.0 - 4.07).abs() < 1e-9);
        assert!((bill.final_total.0 - 85.47).abs() < 1e-9);
    }

    #[test]
    fn test_purity_out_of_range() {
        let mut input = test_input();
        input.purity_percent = 101.0;
        assert!(calculate(&input).is_err());
        input.purity_percent = -0.5;
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_overflowing_bill_is_rejected() {
        let mut input = test_input();
        input.weight = Grams(1e200);
        input.price_per_gram = PricePerGram(1e200);
        input.purity_percent = 100.0;
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_weight() {
        let mut input = test_input();
        input.weight = Grams(-1.0);
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

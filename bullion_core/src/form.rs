//! # Bill Forms
//!
//! Raw, string-typed fields exactly as a user submitted them. Parsing turns
//! them into calculator inputs; anything that isn't a number is reported as
//! [`BillError::InvalidInput`] naming the offending field, so the caller can
//! re-prompt for just that field.

use serde::{Deserialize, Serialize};

use crate::calculations::{BillRequest, GoldBillInput, Metal, SilverBillInput};
use crate::errors::{BillError, BillResult};
use crate::units::{Grams, Percent, PricePerGram};

/// Submitted bill fields, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillForm {
    pub weight: String,
    pub price_per_gram: String,
    pub purity: String,
    pub service_charge: String,
    pub tax: String,
}

impl BillForm {
    /// Parse into a gold input. Purity stays a label; the calculator checks
    /// it against the purity table.
    pub fn parse_gold(&self) -> BillResult<GoldBillInput> {
        let purity = self.purity.trim();
        if purity.is_empty() {
            return Err(BillError::invalid_input("purity", "", "Purity is required"));
        }
        Ok(GoldBillInput {
            weight: Grams(parse_number("weight", &self.weight)?),
            price_per_gram: PricePerGram(parse_number("price_per_gram", &self.price_per_gram)?),
            purity: purity.to_string(),
            service_charge_rate: Percent(parse_number("service_charge", &self.service_charge)?),
            tax_rate: Percent(parse_number("tax", &self.tax)?),
        })
    }

    /// Parse into a silver input; purity must be numeric.
    pub fn parse_silver(&self) -> BillResult<SilverBillInput> {
        Ok(SilverBillInput {
            weight: Grams(parse_number("weight", &self.weight)?),
            price_per_gram: PricePerGram(parse_number("price_per_gram", &self.price_per_gram)?),
            purity_percent: parse_number("purity", &self.purity)?,
            service_charge_rate: Percent(parse_number("service_charge", &self.service_charge)?),
            tax_rate: Percent(parse_number("tax", &self.tax)?),
        })
    }

    /// Parse for the given metal.
    pub fn parse(&self, metal: Metal) -> BillResult<BillRequest> {
        match metal {
            Metal::Gold => self.parse_gold().map(BillRequest::Gold),
            Metal::Silver => self.parse_silver().map(BillRequest::Silver),
        }
    }
}

/// Parse one numeric field. Blank text, non-numbers, NaN and infinities are
/// all rejected.
pub fn parse_number(field: &str, raw: &str) -> BillResult<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(BillError::invalid_input(field, raw, "A number is required"));
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(BillError::invalid_input(field, raw, "Not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold_form() -> BillForm {
        BillForm {
            weight: "10".to_string(),
            price_per_gram: "60".to_string(),
            purity: "22k".to_string(),
            service_charge: "5".to_string(),
            tax: " 3 ".to_string(),
        }
    }

    #[test]
    fn test_parse_gold() {
        let input = gold_form().parse_gold().unwrap();
        assert_eq!(input.weight, Grams(10.0));
        assert_eq!(input.price_per_gram, PricePerGram(60.0));
        assert_eq!(input.purity, "22k");
        assert_eq!(input.tax_rate, Percent(3.0));
    }

    #[test]
    fn test_non_numeric_field_is_named() {
        let mut form = gold_form();
        form.service_charge = "five".to_string();
        match form.parse_gold().unwrap_err() {
            BillError::InvalidInput { field, value, .. } => {
                assert_eq!(field, "service_charge");
                assert_eq!(value, "five");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_fields_rejected() {
        let mut form = gold_form();
        form.weight = "   ".to_string();
        assert!(form.parse_gold().is_err());

        let mut form = gold_form();
        form.purity = String::new();
        assert!(form.parse_gold().is_err());
    }

    #[test]
    fn test_parse_silver_requires_numeric_purity() {
        let mut form = gold_form();
        assert!(form.parse_silver().is_err());
        form.purity = "92.5".to_string();
        let input = form.parse_silver().unwrap();
        assert_eq!(input.purity_percent, 92.5);
    }

    #[test]
    fn test_parse_number_rejects_nan_and_inf() {
        assert!(parse_number("weight", "NaN").is_err());
        assert!(parse_number("weight", "inf").is_err());
        assert_eq!(parse_number("weight", "-1").unwrap(), -1.0);
    }

    #[test]
    fn test_parse_dispatches_by_metal() {
        let mut form = gold_form();
        form.purity = "24K".to_string();
        assert_eq!(form.parse(Metal::Gold).unwrap().metal(), Metal::Gold);
        form.purity = "99.9".to_string();
        assert_eq!(form.parse(Metal::Silver).unwrap().metal(), Metal::Silver);
    }
}

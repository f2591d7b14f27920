//! # Bill Calculations
//!
//! Each metal follows the pattern:
//!
//! - `*BillInput` - Input parameters (JSON-serializable)
//! - [`Bill`] - The breakdown shared by every metal
//! - `calculate(input, ..) -> BillResult<Bill>` - Pure calculation function
//!
//! Calculations never touch storage. Persisting a bill is the caller's
//! job; see [`crate::transactions::record_bill`].
//!
//! ## Available Calculations
//!
//! - [`gold`] - Karat-labelled gold
//! - [`silver`] - Percentage-purity silver

pub mod gold;
pub mod silver;

use serde::{Deserialize, Serialize};

use crate::errors::{BillError, BillResult};
use crate::purity::PurityTable;
use crate::units::{Grams, Money, Percent, PricePerGram};

// Re-export commonly used types
pub use gold::GoldBillInput;
pub use silver::SilverBillInput;

/// Metals the shop bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    pub const ALL: [Metal; 2] = [Metal::Gold, Metal::Silver];

    pub fn display_name(&self) -> &'static str {
        match self {
            Metal::Gold => "Gold",
            Metal::Silver => "Silver",
        }
    }
}

impl std::fmt::Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Bill breakdown.
///
/// `final_total` is always `purity_adjusted_value + service_charge_amount +
/// tax_amount`, computed in exactly that order.
///
/// ## JSON Example
///
/// ```json
/// {
///   "purity_factor": 1.0,
///   "base_value": 600.0,
///   "purity_adjusted_value": 600.0,
///   "service_charge_amount": 30.0,
///   "tax_amount": 18.9,
///   "final_total": 648.9
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Multiplier applied for fineness
    pub purity_factor: f64,
    /// weight x price per gram
    pub base_value: Money,
    /// base value x purity factor
    pub purity_adjusted_value: Money,
    /// Service charge on the purity-adjusted value
    pub service_charge_amount: Money,
    /// Tax on purity-adjusted value plus service charge
    pub tax_amount: Money,
    /// Amount payable
    pub final_total: Money,
}

/// Tagged request for either metal, as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metal")]
pub enum BillRequest {
    Gold(GoldBillInput),
    Silver(SilverBillInput),
}

impl BillRequest {
    pub fn metal(&self) -> Metal {
        match self {
            BillRequest::Gold(_) => Metal::Gold,
            BillRequest::Silver(_) => Metal::Silver,
        }
    }

    /// Run the matching calculator.
    pub fn calculate(&self, table: &PurityTable) -> BillResult<Bill> {
        match self {
            BillRequest::Gold(input) => gold::calculate(input, table),
            BillRequest::Silver(input) => silver::calculate(input),
        }
    }

    /// Purity as it is stored on a transaction record
    pub fn purity_label(&self) -> String {
        match self {
            BillRequest::Gold(input) => input.purity.trim().to_uppercase(),
            BillRequest::Silver(input) => input.purity_percent.to_string(),
        }
    }

    /// The weight, price and rates common to both metals
    pub fn common(&self) -> (Grams, PricePerGram, Percent, Percent) {
        match self {
            BillRequest::Gold(i) => (i.weight, i.price_per_gram, i.service_charge_rate, i.tax_rate),
            BillRequest::Silver(i) => (i.weight, i.price_per_gram, i.service_charge_rate, i.tax_rate),
        }
    }
}

/// Validate the fields both calculators share.
pub(crate) fn validate_common(
    weight: Grams,
    price_per_gram: PricePerGram,
    service_charge_rate: Percent,
    tax_rate: Percent,
) -> BillResult<()> {
    require_positive("weight", weight.0, "Weight must be positive")?;
    require_positive("price_per_gram", price_per_gram.0, "Price per gram must be positive")?;
    require_non_negative("service_charge", service_charge_rate.0, "Service charge rate cannot be negative")?;
    require_non_negative("tax", tax_rate.0, "Tax rate cannot be negative")?;
    Ok(())
}

fn require_positive(field: &str, value: f64, reason: &str) -> BillResult<()> {
    if !value.is_finite() {
        return Err(BillError::invalid_input(field, value.to_string(), "Must be a finite number"));
    }
    if value <= 0.0 {
        return Err(BillError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64, reason: &str) -> BillResult<()> {
    if !value.is_finite() {
        return Err(BillError::invalid_input(field, value.to_string(), "Must be a finite number"));
    }
    if value < 0.0 {
        return Err(BillError::invalid_input(field, value.to_string(), reason));
    }
    Ok(())
}

/// The five-step pricing both calculators share. Inputs must already be
/// validated.
///
/// Finite inputs can still overflow (1e200 g at 1e200 per gram), and a zero
/// rate times infinity is NaN, so every amount is checked before the bill
/// is returned.
pub(crate) fn price_bill(
    weight: Grams,
    price_per_gram: PricePerGram,
    purity_factor: f64,
    service_charge_rate: Percent,
    tax_rate: Percent,
) -> BillResult<Bill> {
    let base_value = weight * price_per_gram;
    let purity_adjusted_value = base_value * purity_factor;
    let service_charge_amount = service_charge_rate.of(purity_adjusted_value);
    let tax_amount = tax_rate.of(purity_adjusted_value + service_charge_amount);
    let final_total = purity_adjusted_value + service_charge_amount + tax_amount;

    let amounts = [base_value, purity_adjusted_value, service_charge_amount, tax_amount, final_total];
    if amounts.iter().any(|m| !m.0.is_finite()) {
        return Err(BillError::invalid_input(
            "weight",
            weight.0.to_string(),
            format!("Bill for {} g at {} per gram is too large to price", weight.0, price_per_gram.0),
        ));
    }

    Ok(Bill {
        purity_factor,
        base_value,
        purity_adjusted_value,
        service_charge_amount,
        tax_amount,
        final_total,
    })
}

//! # Purity Tables
//!
//! Gold fineness is quoted as a karat label, each bound to a fractional
//! multiplier. The table is configuration: shops can list the grades they
//! sell in `config.json`, and [`PurityTable::default`] supplies the standard
//! grades when they don't.
//!
//! Silver fineness is a plain percentage, so it needs no table; see
//! [`silver_factor`].
//!
//! ## Example
//!
//! ```rust
//! use bullion_core::purity::PurityTable;
//!
//! let table = PurityTable::default();
//! assert_eq!(table.factor("22K").unwrap(), 0.916);
//! assert_eq!(table.factor(" 22k ").unwrap(), 0.916);
//! assert!(table.factor("9K").is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BillError, BillResult};

/// One gold grade: a karat label and its fineness multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurityGrade {
    /// Label as shown to customers (e.g., "22K")
    pub label: String,
    /// Fraction of pure gold, in (0, 1]
    pub factor: f64,
}

impl PurityGrade {
    pub fn new(label: impl Into<String>, factor: f64) -> Self {
        PurityGrade {
            label: label.into(),
            factor,
        }
    }
}

/// Ordered karat table used by the gold calculator.
///
/// ## JSON Example
///
/// ```json
/// [
///   { "label": "24K", "factor": 1.0 },
///   { "label": "22K", "factor": 0.916 }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurityTable {
    grades: Vec<PurityGrade>,
}

impl PurityTable {
    /// Build a table from configured grades, rejecting unusable entries.
    pub fn new(grades: Vec<PurityGrade>) -> BillResult<Self> {
        let table = PurityTable { grades };
        table.validate()?;
        Ok(table)
    }

    /// Check labels are present and unique and factors lie in (0, 1].
    pub fn validate(&self) -> BillResult<()> {
        if self.grades.is_empty() {
            return Err(BillError::config("gold purity table is empty"));
        }

        let mut seen: Vec<String> = Vec::with_capacity(self.grades.len());
        for grade in &self.grades {
            let label = normalize_label(&grade.label);
            if label.is_empty() {
                return Err(BillError::config("gold purity label cannot be blank"));
            }
            if !grade.factor.is_finite() || grade.factor <= 0.0 || grade.factor > 1.0 {
                return Err(BillError::config(format!(
                    "gold purity '{}' has factor {}, expected a value in (0, 1]",
                    grade.label, grade.factor
                )));
            }
            if seen.contains(&label) {
                return Err(BillError::config(format!(
                    "gold purity '{}' is listed twice",
                    grade.label
                )));
            }
            seen.push(label);
        }
        Ok(())
    }

    /// Look up the multiplier for a karat label (case and surrounding
    /// whitespace are ignored).
    pub fn factor(&self, label: &str) -> BillResult<f64> {
        self.grade(label).map(|g| g.factor).ok_or_else(|| {
            BillError::invalid_input(
                "purity",
                label,
                format!("Unknown gold purity; expected one of {}", self.labels().join(", ")),
            )
        })
    }

    /// Find the configured grade for a label.
    pub fn grade(&self, label: &str) -> Option<&PurityGrade> {
        let wanted = normalize_label(label);
        self.grades
            .iter()
            .find(|g| normalize_label(&g.label) == wanted)
    }

    /// All labels in table order, for prompts and error messages
    pub fn labels(&self) -> Vec<&str> {
        self.grades.iter().map(|g| g.label.as_str()).collect()
    }

    pub fn grades(&self) -> &[PurityGrade] {
        &self.grades
    }
}

impl Default for PurityTable {
    fn default() -> Self {
        PurityTable {
            grades: vec![
                PurityGrade::new("24K", 1.0),
                PurityGrade::new("22K", 0.916),
                PurityGrade::new("18K", 0.75),
                PurityGrade::new("14K", 0.585),
                PurityGrade::new("10K", 0.417),
            ],
        }
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase()
}

/// Convert a silver fineness percentage (0-100) into a multiplier.
pub fn silver_factor(purity_percent: f64) -> BillResult<f64> {
    if !purity_percent.is_finite() || !(0.0..=100.0).contains(&purity_percent) {
        return Err(BillError::invalid_input(
            "purity",
            purity_percent.to_string(),
            "Silver purity must be a percentage between 0 and 100",
        ));
    }
    Ok(purity_percent / 100.0)
}

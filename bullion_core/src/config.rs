//! # Configuration
//!
//! Shop configuration is a JSON file, every field optional:
//!
//! ```json
//! {
//!   "shop_name": "Main Street Jewellers",
//!   "currency": "USD",
//!   "theme": "light",
//!   "ledger_path": "shop.bullion",
//!   "gold_purities": [
//!     { "label": "24K", "factor": 1.0 },
//!     { "label": "22K", "factor": 0.916 }
//!   ]
//! }
//! ```
//!
//! A missing file, or one that is not JSON at all, is logged and replaced by
//! defaults so the shop can still bill. A well-formed file with a bad value
//! (`"theme": "Dark"`, a purity factor of 1.5) is a hard
//! [`BillError::ConfigError`]; quietly dropping it would also drop the
//! configured ledger path and karat table.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tracing::{debug, error};

use crate::errors::{BillError, BillResult};
use crate::purity::{PurityGrade, PurityTable};
use crate::settings::{normalize_currency, ShopSettings, Theme};

/// Where the config file is looked for when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Ledger file used when the config names none
pub const DEFAULT_LEDGER_PATH: &str = "shop.bullion";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub shop_name: String,
    pub currency: String,
    pub theme: Theme,
    pub ledger_path: PathBuf,
    /// Overrides the standard karat table when present
    pub gold_purities: Option<Vec<PurityGrade>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            shop_name: "Bullion".to_string(),
            currency: "USD".to_string(),
            theme: Theme::Light,
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            gold_purities: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent or
    /// not valid JSON.
    ///
    /// # Returns
    ///
    /// * `Ok(AppConfig)` - Parsed configuration, or defaults
    /// * `Err(BillError::ConfigError)` - Valid JSON with a field of the wrong
    ///   type or an unknown enum value
    pub fn load(path: &Path) -> BillResult<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!(path = %path.display(), "configuration file not found, using defaults");
                return Ok(AppConfig::default());
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot read configuration, using defaults");
                return Ok(AppConfig::default());
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            Err(e) if e.classify() == Category::Data => {
                Err(BillError::config(format!("{}: {}", path.display(), e)))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "error decoding JSON config, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    /// Check the values that parsed are usable.
    pub fn validate(&self) -> BillResult<()> {
        self.purity_table()?;
        self.default_settings()?;
        Ok(())
    }

    /// Configured karat table, or the standard one.
    pub fn purity_table(&self) -> BillResult<PurityTable> {
        match &self.gold_purities {
            Some(grades) => PurityTable::new(grades.clone()),
            None => Ok(PurityTable::default()),
        }
    }

    /// Settings to use until an admin saves their own.
    pub fn default_settings(&self) -> BillResult<ShopSettings> {
        let currency = normalize_currency(&self.currency)
            .map_err(|e| BillError::config(format!("currency: {}", e)))?;
        Ok(ShopSettings {
            currency,
            theme: self.theme,
        })
    }
}

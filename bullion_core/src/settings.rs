//! # Shop Settings
//!
//! Currency and theme, saved once by an admin and read by every view.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::{require, Capability};
use crate::accounts::User;
use crate::errors::{BillError, BillResult};
use crate::ledger::Ledger;

/// UI theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> BillResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(BillError::invalid_input("theme", s, "Theme must be 'light' or 'dark'")),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shop-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSettings {
    /// Three-letter currency code (e.g., "USD")
    pub currency: String,
    pub theme: Theme,
}

impl ShopSettings {
    /// Build settings from raw form text.
    pub fn parse(currency: &str, theme: &str) -> BillResult<Self> {
        Ok(ShopSettings {
            currency: normalize_currency(currency)?,
            theme: Theme::parse(theme)?,
        })
    }
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            currency: "USD".to_string(),
            theme: Theme::Light,
        }
    }
}

/// Trim and upper-case a currency code, requiring three ASCII letters.
pub fn normalize_currency(raw: &str) -> BillResult<String> {
    let code = raw.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BillError::invalid_input(
            "currency",
            raw,
            "Currency must be a three-letter code such as USD",
        ));
    }
    Ok(code)
}

impl Ledger {
    /// Settings in force: the saved ones, else `fallback` (from config).
    pub fn effective_settings(&self, fallback: &ShopSettings) -> ShopSettings {
        self.settings.clone().unwrap_or_else(|| fallback.clone())
    }

    /// Save new settings. Admin only; audited.
    pub fn update_settings(&mut self, actor: &User, currency: &str, theme: &str) -> BillResult<ShopSettings> {
        require(actor, Capability::ChangeSettings)?;
        let settings = ShopSettings::parse(currency, theme)?;

        self.settings = Some(settings.clone());
        info!(currency = %settings.currency, theme = %settings.theme, "settings updated");
        self.log_action(
            actor.id,
            &actor.username,
            "System Settings Change",
            Some(format!(
                "Currency set to {}, Theme set to {}",
                settings.currency, settings.theme
            )),
        );
        Ok(settings)
    }
}

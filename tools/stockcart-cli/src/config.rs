//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stockcart_commerce::{CommerceError, Currency};
use stockcart_observability::LoggingConfig;

/// Names searched for when no `--config` is given, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["stockcart.toml", ".stockcart.toml", "stockcart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockcartConfig {
    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Cart state file.
    #[serde(default)]
    pub store: StoreConfig,

    /// Pricing settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StockcartConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Currency used for order summaries.
    pub fn currency(&self) -> Result<Currency, CommerceError> {
        Currency::from_code(&self.pricing.currency).ok_or_else(|| {
            CommerceError::InvalidInput(format!(
                "unsupported currency {:?} in [pricing]",
                self.pricing.currency
            ))
        })
    }
}

/// Catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file (TOML or JSON), relative to the config file.
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "catalog.toml".to_string()
}

/// Cart state file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot, relative to the config file. Created on first write.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    ".stockcart/cart.json".to_string()
}

/// Pricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// ISO currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

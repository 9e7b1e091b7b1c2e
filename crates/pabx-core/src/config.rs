//! Application configuration
//!
//! Centralized configuration management using the `config` crate.
//! Values can come from config files and `PABX__`-prefixed environment
//! variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub billing: BillingConfig,
    pub store: StoreConfig,
}

/// Billing and listing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Default page size for call listings
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Maximum page size for call listings
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

fn default_page_size() -> i64 {
    100
}

fn default_max_page_size() -> i64 {
    1000
}

/// Storage backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Seed the store with the default departments and rates at startup
    #[serde(default = "default_seed")]
    pub seed_defaults: bool,
}

fn default_seed() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .set_default("billing.default_page_size", 100)?
            .set_default("billing.max_page_size", 1000)?
            .set_default("store.seed_defaults", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("PABX")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_defaults: default_seed(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            billing: BillingConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

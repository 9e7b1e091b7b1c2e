//! Default seed data
//!
//! The departments and rates a fresh installation starts with. Seeding is
//! idempotent: it only runs against an empty store, so restarting a process
//! that already registered entities is a no-op.

use pabx_core::config::StoreConfig;
use pabx_core::models::{CallType, Department, Rate};
use pabx_core::traits::{DepartmentStore, RateStore};
use pabx_core::AppResult;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::MemoryStore;

fn default_departments() -> Vec<Department> {
    let entries = [
        ("Sales", "CC001", "John Manager"),
        ("Marketing", "CC002", "Sarah Manager"),
        ("Support", "CC003", "Mike Manager"),
        ("Finance", "CC004", "Lisa Manager"),
        ("IT", "CC005", "David Manager"),
    ];
    entries
        .into_iter()
        .map(|(name, cost_center, manager)| Department {
            id: 0,
            name: name.to_string(),
            cost_center: Some(cost_center.to_string()),
            manager: Some(manager.to_string()),
        })
        .collect()
}

fn default_rates() -> Vec<Rate> {
    vec![
        Rate {
            id: 0,
            name: "Internal Calls".to_string(),
            call_type: CallType::Internal,
            rate_per_minute: Decimal::ZERO,
            connection_fee: Decimal::ZERO,
            description: Some("Free internal calls".to_string()),
            prefix: None,
        },
        Rate {
            id: 0,
            name: "Local Calls".to_string(),
            call_type: CallType::Local,
            rate_per_minute: Decimal::new(15, 2),
            connection_fee: Decimal::new(10, 2),
            description: Some("Local area calls".to_string()),
            prefix: None,
        },
        Rate {
            id: 0,
            name: "Long Distance".to_string(),
            call_type: CallType::LongDistance,
            rate_per_minute: Decimal::new(25, 2),
            connection_fee: Decimal::new(50, 2),
            description: Some("Long distance calls within country".to_string()),
            prefix: None,
        },
        Rate {
            id: 0,
            name: "International".to_string(),
            call_type: CallType::International,
            rate_per_minute: Decimal::new(75, 2),
            connection_fee: Decimal::new(100, 2),
            description: Some("International calls".to_string()),
            prefix: Some("+".to_string()),
        },
    ]
}

/// Seed an empty store with the default departments and rates
pub async fn seed_defaults(store: &MemoryStore) -> AppResult<()> {
    if DepartmentStore::list(store).await?.is_empty() {
        for department in default_departments() {
            DepartmentStore::create(store, &department).await?;
        }
        info!("Seeded default departments");
    }

    if RateStore::list(store).await?.is_empty() {
        for rate in default_rates() {
            RateStore::create(store, &rate).await?;
        }
        info!("Seeded default rates");
    }

    Ok(())
}

/// Prepare a store according to configuration
///
/// Runs [`seed_defaults`] when `seed_defaults` is enabled; a no-op otherwise,
/// leaving the store empty for installations that register their own
/// departments and rates.
pub async fn init_store(store: &MemoryStore, config: &StoreConfig) -> AppResult<()> {
    if !config.seed_defaults {
        debug!("Seeding disabled, store starts empty");
        return Ok(());
    }
    seed_defaults(store).await
}

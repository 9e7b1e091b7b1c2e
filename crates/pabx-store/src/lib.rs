//! PABX Billing Storage Layer
//!
//! In-memory implementation of the storage traits defined in `pabx-core`.
//! Entities live in id-keyed maps behind a single `tokio::sync::RwLock`,
//! so aggregation reads take point-in-time snapshots while writers append
//! concurrently. A database-backed implementation of the same traits can
//! replace this one without touching the billing engine.

pub mod memory;
pub mod seed;

pub use memory::MemoryStore;
pub use seed::{init_store, seed_defaults};

// Re-export commonly used types
pub use pabx_core::{AppError, AppResult};

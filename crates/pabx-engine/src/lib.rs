//! PABX Billing Engine
//!
//! The computational core of the billing system:
//!
//! - Rate resolution: mapping a call type to the billing rate that applies
//! - Cost calculation: connection fee plus fractional-minute usage, fixed
//!   to 2 decimal places at persistence time
//! - Aggregation: overall statistics, per-department breakdowns, and
//!   gapless daily volume series over inclusive date windows
//! - Call creation and invoice generation built on those pieces
//!
//! The engine owns no persistent state; it reads and writes through the
//! storage traits in `pabx-core::traits`.

pub mod calls;
pub mod invoices;
pub mod rating;
pub mod stats;

pub use calls::CallService;
pub use invoices::InvoiceService;
pub use rating::{round_cost, RatingService};
pub use stats::{
    call_stats, daily_call_volume, department_stats, CallStats, DailyVolume, DepartmentStats,
    StatsService, TypeBreakdown,
};

// Re-export commonly used types
pub use pabx_core::{AppError, AppResult};

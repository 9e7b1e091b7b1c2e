//! Domain models for the PABX billing system
//!
//! This module contains all the core domain models used throughout the workspace.

pub mod call;
pub mod department;
pub mod invoice;
pub mod range;
pub mod rate;

pub use call::{CallFilter, CallRecord, CallType, NewCall};
pub use department::{Department, NewDepartment};
pub use invoice::{Invoice, InvoiceStatus};
pub use range::DateRange;
pub use rate::{NewRate, Rate};

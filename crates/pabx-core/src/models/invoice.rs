//! Invoice model
//!
//! An invoice is a derived snapshot: the result of aggregating a
//! department's calls over a date range, persisted at generation time.
//! Once generated it is immutable except for status transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Generated, awaiting review
    Pending,
    /// Reviewed and approved for payment
    Approved,
    /// Settled
    Paid,
}

impl InvoiceStatus {
    /// Whether moving from `self` to `next` is a legal transition
    ///
    /// The only legal path is pending -> approved -> paid.
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Pending, InvoiceStatus::Approved)
                | (InvoiceStatus::Approved, InvoiceStatus::Paid)
        )
    }

    /// Wire string value
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Approved => "approved",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: i32,

    /// Billed department (name snapshot)
    pub department: String,

    /// Billing period start (inclusive)
    pub from_date: DateTime<Utc>,

    /// Billing period end (inclusive)
    pub to_date: DateTime<Utc>,

    /// Total calls in the period
    pub total_calls: i64,

    /// Total duration in seconds
    pub total_duration: i64,

    /// Total cost of the period
    pub total_cost: Decimal,

    /// Per-call-type breakdown blob
    pub details: serde_json::Value,

    /// Lifecycle status
    pub status: InvoiceStatus,

    /// When the invoice was generated
    pub generated_at: DateTime<Utc>,
}

impl Invoice {
    /// Validate and apply a status transition
    pub fn transition_to(&mut self, next: InvoiceStatus) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

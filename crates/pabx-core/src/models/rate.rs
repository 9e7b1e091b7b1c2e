//! Billing rate model
//!
//! Represents billing configuration for a call type: a per-minute charge
//! plus a flat per-call connection fee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::call::CallType;

/// Billing rate entity
///
/// One rate is expected per call type; the rate in effect when a call is
/// created determines its cost. Updating a rate affects only future calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    /// Unique identifier
    pub id: i32,

    /// Unique rate name
    pub name: String,

    /// Call type this rate applies to
    pub call_type: CallType,

    /// Rate per minute; fractional minutes are billed proportionally
    pub rate_per_minute: Decimal,

    /// Flat fee charged per call, regardless of duration
    pub connection_fee: Decimal,

    /// Human-readable description
    pub description: Option<String>,

    /// Destination prefix hint (e.g. "+" or a country code). Stored for
    /// reporting; not used as a matching key.
    pub prefix: Option<String>,
}

impl Rate {
    /// Calculate the exact cost for a given duration
    ///
    /// `cost = connection_fee + (seconds / 60) * rate_per_minute`, with
    /// fractional minutes billed proportionally: a 30-second call is billed
    /// for 0.5 minutes, not rounded up to a whole minute. The result is
    /// unrounded; persistence-time rounding is applied by the rating service.
    #[inline]
    pub fn cost_for_duration(&self, duration_seconds: i32) -> Decimal {
        if duration_seconds <= 0 {
            return self.connection_fee;
        }

        let minutes = Decimal::from(duration_seconds) / Decimal::from(60);
        self.connection_fee + minutes * self.rate_per_minute
    }

    /// Rate per second, for live cost estimation
    #[inline]
    pub fn rate_per_second(&self) -> Decimal {
        self.rate_per_minute / Decimal::from(60)
    }
}

/// Payload for creating a rate
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRate {
    /// Unique rate name
    #[validate(length(min = 1, message = "rate name must not be empty"))]
    pub name: String,

    /// Call type this rate applies to
    pub call_type: CallType,

    /// Rate per minute
    #[validate(custom(function = "non_negative_amount"))]
    pub rate_per_minute: Decimal,

    /// Flat per-call connection fee
    #[validate(custom(function = "non_negative_amount"))]
    pub connection_fee: Decimal,

    /// Human-readable description
    pub description: Option<String>,

    /// Destination prefix hint
    pub prefix: Option<String>,
}

/// Reject negative monetary amounts
fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

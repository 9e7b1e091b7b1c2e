//! Call record model
//!
//! Represents completed call records for billing and reporting. A call is
//! immutable once created: its cost is computed against the rate in effect
//! at creation time and is never recomputed, so later rate changes do not
//! retroactively rebill history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::AppError;

/// Closed classification of a call record, driving rate selection
/// and distribution breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallType {
    /// Extension-to-extension calls
    Internal,
    /// Local area calls
    Local,
    /// Long distance calls within the country
    LongDistance,
    /// International calls
    International,
}

impl CallType {
    /// All call types, in canonical order
    ///
    /// Breakdowns keyed by call type must enumerate every variant, including
    /// those with zero occurrences.
    pub const ALL: [CallType; 4] = [
        CallType::Internal,
        CallType::Local,
        CallType::LongDistance,
        CallType::International,
    ];

    /// Wire string value
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Internal => "internal",
            CallType::Local => "local",
            CallType::LongDistance => "long-distance",
            CallType::International => "international",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(CallType::Internal),
            "local" => Ok(CallType::Local),
            "long-distance" => Ok(CallType::LongDistance),
            "international" => Ok(CallType::International),
            other => Err(AppError::InvalidInput(format!(
                "Unknown call type: {}",
                other
            ))),
        }
    }
}

/// Call record
///
/// Stores complete information about a finished call including timing,
/// origin, destination, and the cost computed at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    /// Unique identifier, assigned at creation, never reused
    pub id: i32,

    /// When the call occurred; drives all date-range filtering and sorting
    pub timestamp: DateTime<Utc>,

    /// Originating extension (e.g. "Ext. 1024")
    pub source_extension: String,

    /// Department name snapshot at creation time (None for unassigned
    /// extensions). A historical label, not a live reference: renaming a
    /// department does not relabel existing calls.
    pub source_department: Option<String>,

    /// Free-form destination descriptor
    pub destination_number: String,

    /// Destination kind (e.g. "extension", "phone")
    pub destination_type: String,

    /// Call classification; the sole key used for rate lookup
    pub call_type: CallType,

    /// Duration in seconds; zero is valid (immediately dropped call)
    pub duration: i32,

    /// Cost computed once at creation, fixed to 2 decimal places
    pub cost: Decimal,
}

/// Payload for creating a call record
///
/// The cost field is absent on purpose: it is computed from the applicable
/// rate when the call is persisted, never supplied by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCall {
    /// When the call occurred; defaults to now when absent
    pub timestamp: Option<DateTime<Utc>>,

    /// Originating extension
    #[validate(length(min = 1, message = "source extension must not be empty"))]
    pub source_extension: String,

    /// Department the extension belonged to at call time
    pub source_department: Option<String>,

    /// Dialed destination
    #[validate(length(min = 1, message = "destination number must not be empty"))]
    pub destination_number: String,

    /// Destination kind
    #[validate(length(min = 1, message = "destination type must not be empty"))]
    pub destination_type: String,

    /// Call classification
    pub call_type: CallType,

    /// Duration in seconds
    #[validate(range(min = 0, message = "duration must not be negative"))]
    pub duration: i32,
}

/// Typed filter for call listings
///
/// Explicit optional fields rather than dynamic key/value matching; absent
/// fields match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallFilter {
    /// Restrict to a single call type
    pub call_type: Option<CallType>,

    /// Restrict to calls originating from a department (exact name match)
    pub source_department: Option<String>,
}

impl CallFilter {
    /// Check whether a record passes the filter
    pub fn matches(&self, call: &CallRecord) -> bool {
        if let Some(call_type) = self.call_type {
            if call.call_type != call_type {
                return false;
            }
        }
        if let Some(ref department) = self.source_department {
            if call.source_department.as_deref() != Some(department.as_str()) {
                return false;
            }
        }
        true
    }
}

impl CallRecord {
    /// Duration formatted for display as MM:SS
    pub fn display_duration(&self) -> String {
        let mins = self.duration / 60;
        let secs = self.duration % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}

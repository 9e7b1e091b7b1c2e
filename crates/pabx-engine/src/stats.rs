//! Aggregation engine
//!
//! Computes overall call statistics, per-department breakdowns, and daily
//! volume series over call records. The aggregation functions are pure:
//! they read their inputs, mutate nothing, and return the same result for
//! the same inputs. The async `StatsService` wrapper snapshots the store
//! before aggregating so in-flight writes cannot tear a result.
//!
//! Every breakdown keyed by call type enumerates all four types, and the
//! daily series has one entry per calendar day in the window; zero is a
//! value, not a gap.

use pabx_core::models::{CallRecord, CallType, DateRange, Department};
use pabx_core::traits::{CallStore, DepartmentStore};
use pabx_core::AppResult;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Overall statistics over a record set
#[derive(Debug, Clone, Serialize)]
pub struct CallStats {
    /// Count of records in the window
    pub total_calls: i64,

    /// Sum of durations in seconds
    pub total_duration: i64,

    /// Sum of stored call costs
    pub total_cost: Decimal,

    /// `total_cost / total_calls`; zero when there are no calls
    pub avg_cost_per_call: Decimal,

    /// Call count per type; every type present, zero-filled
    pub calls_by_type: BTreeMap<CallType, i64>,
}

/// Count and cost for one call type
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeBreakdown {
    /// Number of calls
    pub count: i64,

    /// Sum of stored costs
    pub cost: Decimal,
}

impl TypeBreakdown {
    const ZERO: TypeBreakdown = TypeBreakdown {
        count: 0,
        cost: Decimal::ZERO,
    };
}

/// Per-department rollup
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentStats {
    /// Department name
    pub department: String,

    /// Count of the department's calls in the window
    pub total_calls: i64,

    /// Count and cost per call type; every type present, zero-filled
    pub calls_by_type: BTreeMap<CallType, TypeBreakdown>,

    /// Sum of the department's call costs
    pub total_cost: Decimal,
}

/// One day of the daily volume series
#[derive(Debug, Clone, Serialize)]
pub struct DailyVolume {
    /// UTC calendar day, formatted `YYYY-MM-DD`
    pub date: String,

    /// Number of calls attributed to that day
    pub count: i64,
}

fn in_window(call: &CallRecord, range: Option<&DateRange>) -> bool {
    range.map_or(true, |r| r.contains(call.timestamp))
}

/// Complete, zero-filled per-type breakdown of a set of calls
pub fn type_breakdown<'a, I>(calls: I) -> BTreeMap<CallType, TypeBreakdown>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let mut breakdown: BTreeMap<CallType, TypeBreakdown> = CallType::ALL
        .iter()
        .map(|t| (*t, TypeBreakdown::ZERO))
        .collect();

    for call in calls {
        let entry = breakdown
            .entry(call.call_type)
            .or_insert(TypeBreakdown::ZERO);
        entry.count += 1;
        entry.cost += call.cost;
    }

    breakdown
}

/// Overall statistics, optionally windowed
///
/// With no window, every record counts. Decimal accumulation keeps cost
/// sums exact across arbitrarily many records.
pub fn call_stats(calls: &[CallRecord], range: Option<&DateRange>) -> CallStats {
    let mut total_calls: i64 = 0;
    let mut total_duration: i64 = 0;
    let mut total_cost = Decimal::ZERO;
    let mut calls_by_type: BTreeMap<CallType, i64> =
        CallType::ALL.iter().map(|t| (*t, 0)).collect();

    for call in calls.iter().filter(|c| in_window(c, range)) {
        total_calls += 1;
        total_duration += i64::from(call.duration);
        total_cost += call.cost;
        *calls_by_type.entry(call.call_type).or_insert(0) += 1;
    }

    let avg_cost_per_call = if total_calls > 0 {
        total_cost / Decimal::from(total_calls)
    } else {
        Decimal::ZERO
    };

    CallStats {
        total_calls,
        total_duration,
        total_cost,
        avg_cost_per_call,
        calls_by_type,
    }
}

/// Per-department statistics, optionally windowed
///
/// One entry per registered department, in the order the department list
/// provides (insertion order); departments with no calls in the window
/// appear with all-zero figures. The join uses the department name snapshot
/// stored on each call.
pub fn department_stats(
    departments: &[Department],
    calls: &[CallRecord],
    range: Option<&DateRange>,
) -> Vec<DepartmentStats> {
    departments
        .iter()
        .map(|dept| {
            let dept_calls: Vec<&CallRecord> = calls
                .iter()
                .filter(|c| c.source_department.as_deref() == Some(dept.name.as_str()))
                .filter(|c| in_window(c, range))
                .collect();

            let calls_by_type = type_breakdown(dept_calls.iter().copied());
            let total_cost = dept_calls.iter().map(|c| c.cost).sum();

            DepartmentStats {
                department: dept.name.clone(),
                total_calls: dept_calls.len() as i64,
                calls_by_type,
                total_cost,
            }
        })
        .collect()
}

/// Daily call volume over a mandatory window
///
/// One entry per UTC calendar day from the window's first day to its last,
/// ascending, gapless. A call belongs to the day matching its timestamp's
/// UTC date portion.
pub fn daily_call_volume(calls: &[CallRecord], range: &DateRange) -> Vec<DailyVolume> {
    let mut counts: BTreeMap<chrono::NaiveDate, i64> =
        range.days().map(|day| (day, 0)).collect();

    for call in calls.iter().filter(|c| range.contains(c.timestamp)) {
        if let Some(count) = counts.get_mut(&call.timestamp.date_naive()) {
            *count += 1;
        }
    }

    counts
        .into_iter()
        .map(|(date, count)| DailyVolume {
            date: date.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect()
}

/// Statistics service
///
/// Async facade over the pure aggregation functions. Each method takes a
/// point-in-time snapshot of the call set before aggregating.
pub struct StatsService<C: CallStore, D: DepartmentStore> {
    calls: Arc<C>,
    departments: Arc<D>,
}

impl<C: CallStore, D: DepartmentStore> StatsService<C, D> {
    /// Create a new statistics service
    pub fn new(calls: Arc<C>, departments: Arc<D>) -> Self {
        Self { calls, departments }
    }

    /// Overall statistics, optionally windowed
    #[instrument(skip(self))]
    pub async fn call_stats(&self, range: Option<DateRange>) -> AppResult<CallStats> {
        let snapshot = self.calls.snapshot().await?;
        debug!(records = snapshot.len(), "Aggregating call statistics");
        Ok(call_stats(&snapshot, range.as_ref()))
    }

    /// Per-department statistics, optionally windowed
    #[instrument(skip(self))]
    pub async fn department_stats(
        &self,
        range: Option<DateRange>,
    ) -> AppResult<Vec<DepartmentStats>> {
        let departments = self.departments.list().await?;
        let snapshot = self.calls.snapshot().await?;
        debug!(
            departments = departments.len(),
            records = snapshot.len(),
            "Aggregating department statistics"
        );
        Ok(department_stats(&departments, &snapshot, range.as_ref()))
    }

    /// Daily call volume over a mandatory window
    #[instrument(skip(self))]
    pub async fn daily_call_volume(&self, range: DateRange) -> AppResult<Vec<DailyVolume>> {
        let snapshot = self.calls.snapshot().await?;
        Ok(daily_call_volume(&snapshot, &range))
    }
}

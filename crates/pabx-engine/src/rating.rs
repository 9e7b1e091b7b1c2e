//! Rate resolution and cost calculation
//!
//! Maps a call type to its configured rate and computes call costs. Rate
//! configuration problems surface as errors here: a call type with no rate
//! fails with `RateNotFound` instead of silently skipping cost computation,
//! and a call type covered by more than one rate fails with
//! `DuplicateRate` instead of picking whichever was inserted first.

use pabx_core::models::{CallType, Rate};
use pabx_core::traits::RateStore;
use pabx_core::{AppError, AppResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Round an exact cost to the 2-decimal-place persisted form
///
/// Standard midpoint rounding: 0.875 rounds to 0.88.
#[inline]
pub fn round_cost(cost: Decimal) -> Decimal {
    cost.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rating service
///
/// Resolves rates by call type and computes persisted call costs.
pub struct RatingService<R: RateStore> {
    rates: Arc<R>,
}

impl<R: RateStore> RatingService<R> {
    /// Create a new rating service
    pub fn new(rates: Arc<R>) -> Self {
        Self { rates }
    }

    /// Resolve the single rate configured for a call type
    ///
    /// Exactly one rate must match; zero or multiple matches are
    /// configuration errors.
    #[instrument(skip(self))]
    pub async fn resolve_rate(&self, call_type: CallType) -> AppResult<Rate> {
        let rates = self.rates.list().await?;
        let mut matches = rates.into_iter().filter(|r| r.call_type == call_type);

        let rate = match matches.next() {
            Some(rate) => rate,
            None => {
                warn!(%call_type, "No rate configured");
                return Err(AppError::RateNotFound(call_type));
            }
        };

        if matches.next().is_some() {
            warn!(%call_type, "Multiple rates configured");
            return Err(AppError::DuplicateRate(call_type));
        }

        debug!(%call_type, rate = %rate.name, "Resolved rate");
        Ok(rate)
    }

    /// Compute the persisted cost for a call
    ///
    /// Resolves the rate, applies `connection_fee + minutes * rate_per_minute`
    /// with fractional minutes, and rounds to 2 decimal places. A zero
    /// duration costs exactly the connection fee.
    #[instrument(skip(self))]
    pub async fn compute_cost(
        &self,
        call_type: CallType,
        duration_seconds: i32,
    ) -> AppResult<Decimal> {
        if duration_seconds < 0 {
            return Err(AppError::InvalidInput(
                "duration must not be negative".to_string(),
            ));
        }

        let rate = self.resolve_rate(call_type).await?;
        let cost = round_cost(rate.cost_for_duration(duration_seconds));

        debug!(
            %call_type,
            duration_seconds,
            %cost,
            "Computed call cost"
        );
        Ok(cost)
    }
}

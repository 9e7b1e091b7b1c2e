//! Call creation and listing
//!
//! Creating a call is where billing happens: the rate in effect at that
//! instant is resolved, the cost computed and rounded, and the completed
//! record persisted. The stored cost is final; rate changes after the fact
//! never touch it. Creation fails loudly when the call type has no usable
//! rate configuration.

use chrono::Utc;
use pabx_core::config::BillingConfig;
use pabx_core::models::{CallFilter, CallRecord, DateRange, NewCall};
use pabx_core::traits::{CallStore, Pagination, RateStore};
use pabx_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, instrument};
use validator::Validate;

use crate::rating::RatingService;

/// Call service
///
/// Owns call creation (rate resolution + cost calculation + persistence)
/// and read access to the call log.
pub struct CallService<C: CallStore, R: RateStore> {
    calls: Arc<C>,
    rating: RatingService<R>,
    config: BillingConfig,
}

impl<C: CallStore, R: RateStore> CallService<C, R> {
    /// Create a new call service
    pub fn new(calls: Arc<C>, rates: Arc<R>, config: BillingConfig) -> Self {
        Self {
            calls,
            rating: RatingService::new(rates),
            config,
        }
    }

    /// Validate, bill, and persist a call record
    ///
    /// The rate lookup and cost computation happen before the write, so the
    /// stored cost reflects the rate in effect at creation time.
    #[instrument(skip(self, payload), fields(call_type = %payload.call_type))]
    pub async fn create_call(&self, payload: NewCall) -> AppResult<CallRecord> {
        payload.validate()?;

        let cost = self
            .rating
            .compute_cost(payload.call_type, payload.duration)
            .await?;

        let record = CallRecord {
            id: 0,
            timestamp: payload.timestamp.unwrap_or_else(Utc::now),
            source_extension: payload.source_extension,
            source_department: payload.source_department,
            destination_number: payload.destination_number,
            destination_type: payload.destination_type,
            call_type: payload.call_type,
            duration: payload.duration,
            cost,
        };

        let created = self.calls.create(&record).await?;
        debug!(call_id = created.id, %created.cost, "Created call record");
        Ok(created)
    }

    /// Fetch a single call record
    pub async fn get_call(&self, id: i32) -> AppResult<CallRecord> {
        self.calls
            .find_by_id(id)
            .await?
            .ok_or(AppError::CallNotFound(id))
    }

    /// List calls newest first, with typed filtering and pagination
    ///
    /// Returns the page plus the total match count. Page size defaults and
    /// caps come from configuration.
    #[instrument(skip(self))]
    pub async fn list_calls(
        &self,
        filter: CallFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<(Vec<CallRecord>, i64)> {
        let pagination = Pagination::new(
            limit.unwrap_or(self.config.default_page_size),
            offset.unwrap_or(0),
            self.config.max_page_size,
        );
        self.calls
            .list(&filter, pagination.limit, pagination.offset)
            .await
    }

    /// List calls inside an inclusive window, newest first
    pub async fn list_calls_in_range(&self, range: &DateRange) -> AppResult<Vec<CallRecord>> {
        self.calls.list_in_range(range).await
    }
}

//! Storage traits
//!
//! Abstractions over the record store the billing engine reads from and
//! writes to. The engine depends only on these contracts; the in-memory
//! backend and any future database backend are interchangeable behind them.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    CallFilter, CallRecord, CallType, DateRange, Department, Invoice, InvoiceStatus, Rate,
};

/// Call record storage contract
///
/// Listings are sorted by timestamp descending. Reads used for aggregation
/// must be point-in-time consistent: `snapshot` and the range queries return
/// copies taken under a single read lock (or a database transaction).
#[async_trait]
pub trait CallStore: Send + Sync {
    /// Persist a call record, assigning its id
    ///
    /// The given id is ignored; the store allocates the next one. The cost
    /// on the record is stored as-is and never recomputed.
    async fn create(&self, call: &CallRecord) -> Result<CallRecord, AppError>;

    /// Find a call by id
    async fn find_by_id(&self, id: i32) -> Result<Option<CallRecord>, AppError>;

    /// List calls matching a typed filter, newest first
    ///
    /// Returns the requested page and the total match count.
    async fn list(
        &self,
        filter: &CallFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CallRecord>, i64), AppError>;

    /// List calls whose timestamp falls inside the window, newest first
    async fn list_in_range(&self, range: &DateRange) -> Result<Vec<CallRecord>, AppError>;

    /// List calls originating from a department, optionally windowed
    async fn list_by_department(
        &self,
        department: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<CallRecord>, AppError>;

    /// Point-in-time copy of every call record
    async fn snapshot(&self) -> Result<Vec<CallRecord>, AppError>;
}

/// Rate storage contract
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Persist a rate, assigning its id
    async fn create(&self, rate: &Rate) -> Result<Rate, AppError>;

    /// Find a rate by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Rate>, AppError>;

    /// Find the first rate configured for a call type, in insertion order
    async fn find_by_type(&self, call_type: CallType) -> Result<Option<Rate>, AppError>;

    /// List all rates in insertion order
    async fn list(&self) -> Result<Vec<Rate>, AppError>;

    /// Update an existing rate; changes affect only future cost computations
    async fn update(&self, rate: &Rate) -> Result<Rate, AppError>;

    /// Delete a rate by id, returning whether it existed
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// Department storage contract
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// Persist a department, assigning its id
    async fn create(&self, department: &Department) -> Result<Department, AppError>;

    /// Find a department by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Department>, AppError>;

    /// Find a department by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<Department>, AppError>;

    /// List all departments in insertion order
    ///
    /// Department statistics iterate this list, so its order is the order
    /// stats rows come back in.
    async fn list(&self) -> Result<Vec<Department>, AppError>;

    /// Delete a department by id, returning whether it existed
    ///
    /// Historical calls keep their department name snapshot.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// Invoice storage contract
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Persist an invoice, assigning its id and generation timestamp
    async fn create(&self, invoice: &Invoice) -> Result<Invoice, AppError>;

    /// Find an invoice by id
    async fn find_by_id(&self, id: i32) -> Result<Option<Invoice>, AppError>;

    /// List invoices, optionally restricted to one department
    async fn list(&self, department: Option<&str>) -> Result<Vec<Invoice>, AppError>;

    /// Apply a status transition, enforcing the pending -> approved -> paid
    /// lifecycle
    async fn update_status(&self, id: i32, status: InvoiceStatus) -> Result<Invoice, AppError>;
}

/// Pagination parameters for listings
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Maximum records to return
    pub limit: i64,
    /// Records to skip
    pub offset: i64,
}

impl Pagination {
    /// Create pagination clamped to sane bounds
    ///
    /// A non-positive `max_limit` is treated as 1, so a misconfigured page
    /// cap degrades listings instead of panicking.
    pub fn new(limit: i64, offset: i64, max_limit: i64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            limit: limit.clamp(1, max_limit),
            offset: offset.max(0),
        }
    }
}

//! In-memory store
//!
//! Map-based storage with auto-incrementing ids. Iteration over the
//! id-keyed `BTreeMap`s yields insertion order, which is the order the
//! department reference list (and therefore department statistics) comes
//! back in. All entity collections sit behind one `RwLock`, so every read
//! method returns a consistent snapshot of the state at lock-acquisition
//! time.

use async_trait::async_trait;
use pabx_core::models::{
    CallFilter, CallRecord, CallType, DateRange, Department, Invoice, InvoiceStatus, Rate,
};
use pabx_core::traits::{CallStore, DepartmentStore, InvoiceStore, RateStore};
use pabx_core::{AppError, AppResult};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Inner {
    calls: BTreeMap<i32, CallRecord>,
    rates: BTreeMap<i32, Rate>,
    departments: BTreeMap<i32, Department>,
    invoices: BTreeMap<i32, Invoice>,

    next_call_id: i32,
    next_rate_id: i32,
    next_department_id: i32,
    next_invoice_id: i32,
}

impl Inner {
    fn new() -> Self {
        Self {
            next_call_id: 1,
            next_rate_id: 1,
            next_department_id: 1,
            next_invoice_id: 1,
            ..Self::default()
        }
    }
}

/// In-memory storage backend
///
/// Implements every storage trait in `pabx-core::traits`.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort newest first; id breaks timestamp ties deterministically
fn sort_newest_first(calls: &mut [CallRecord]) {
    calls.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl CallStore for MemoryStore {
    async fn create(&self, call: &CallRecord) -> AppResult<CallRecord> {
        let mut inner = self.inner.write().await;
        let id = inner.next_call_id;
        inner.next_call_id += 1;

        let record = CallRecord {
            id,
            ..call.clone()
        };
        inner.calls.insert(id, record.clone());
        debug!(call_id = id, call_type = %record.call_type, "Stored call record");
        Ok(record)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<CallRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.calls.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &CallFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<CallRecord>, i64)> {
        let inner = self.inner.read().await;
        let mut calls: Vec<CallRecord> = inner
            .calls
            .values()
            .filter(|call| filter.matches(call))
            .cloned()
            .collect();
        drop(inner);

        sort_newest_first(&mut calls);
        let total = calls.len() as i64;

        let offset = offset.max(0) as usize;
        let limit = limit.max(0) as usize;
        let page: Vec<CallRecord> = calls.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    async fn list_in_range(&self, range: &DateRange) -> AppResult<Vec<CallRecord>> {
        let inner = self.inner.read().await;
        let mut calls: Vec<CallRecord> = inner
            .calls
            .values()
            .filter(|call| range.contains(call.timestamp))
            .cloned()
            .collect();
        drop(inner);

        sort_newest_first(&mut calls);
        Ok(calls)
    }

    async fn list_by_department(
        &self,
        department: &str,
        range: Option<&DateRange>,
    ) -> AppResult<Vec<CallRecord>> {
        let inner = self.inner.read().await;
        let mut calls: Vec<CallRecord> = inner
            .calls
            .values()
            .filter(|call| call.source_department.as_deref() == Some(department))
            .filter(|call| range.map_or(true, |r| r.contains(call.timestamp)))
            .cloned()
            .collect();
        drop(inner);

        sort_newest_first(&mut calls);
        Ok(calls)
    }

    async fn snapshot(&self) -> AppResult<Vec<CallRecord>> {
        let inner = self.inner.read().await;
        Ok(inner.calls.values().cloned().collect())
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn create(&self, rate: &Rate) -> AppResult<Rate> {
        let mut inner = self.inner.write().await;

        if inner.rates.values().any(|r| r.name == rate.name) {
            return Err(AppError::AlreadyExists(format!("rate '{}'", rate.name)));
        }
        // One active rate per call type
        if inner.rates.values().any(|r| r.call_type == rate.call_type) {
            return Err(AppError::DuplicateRate(rate.call_type));
        }

        let id = inner.next_rate_id;
        inner.next_rate_id += 1;

        let created = Rate {
            id,
            ..rate.clone()
        };
        inner.rates.insert(id, created.clone());
        debug!(rate_id = id, call_type = %created.call_type, "Stored rate");
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Rate>> {
        let inner = self.inner.read().await;
        Ok(inner.rates.get(&id).cloned())
    }

    async fn find_by_type(&self, call_type: CallType) -> AppResult<Option<Rate>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rates
            .values()
            .find(|rate| rate.call_type == call_type)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Rate>> {
        let inner = self.inner.read().await;
        Ok(inner.rates.values().cloned().collect())
    }

    async fn update(&self, rate: &Rate) -> AppResult<Rate> {
        let mut inner = self.inner.write().await;

        if !inner.rates.contains_key(&rate.id) {
            return Err(AppError::NotFound(format!("rate {}", rate.id)));
        }
        if inner
            .rates
            .values()
            .any(|r| r.id != rate.id && r.name == rate.name)
        {
            return Err(AppError::AlreadyExists(format!("rate '{}'", rate.name)));
        }
        if inner
            .rates
            .values()
            .any(|r| r.id != rate.id && r.call_type == rate.call_type)
        {
            return Err(AppError::DuplicateRate(rate.call_type));
        }

        inner.rates.insert(rate.id, rate.clone());
        debug!(rate_id = rate.id, "Updated rate");
        Ok(rate.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.rates.remove(&id).is_some())
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn create(&self, department: &Department) -> AppResult<Department> {
        let mut inner = self.inner.write().await;

        if inner
            .departments
            .values()
            .any(|d| d.name == department.name)
        {
            return Err(AppError::AlreadyExists(format!(
                "department '{}'",
                department.name
            )));
        }

        let id = inner.next_department_id;
        inner.next_department_id += 1;

        let created = Department {
            id,
            ..department.clone()
        };
        inner.departments.insert(id, created.clone());
        debug!(department_id = id, name = %created.name, "Stored department");
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Department>> {
        let inner = self.inner.read().await;
        Ok(inner.departments.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let inner = self.inner.read().await;
        Ok(inner
            .departments
            .values()
            .find(|d| d.name == name)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Department>> {
        let inner = self.inner.read().await;
        Ok(inner.departments.values().cloned().collect())
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.departments.remove(&id).is_some())
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn create(&self, invoice: &Invoice) -> AppResult<Invoice> {
        let mut inner = self.inner.write().await;
        let id = inner.next_invoice_id;
        inner.next_invoice_id += 1;

        let created = Invoice {
            id,
            generated_at: chrono::Utc::now(),
            ..invoice.clone()
        };
        inner.invoices.insert(id, created.clone());
        debug!(invoice_id = id, department = %created.department, "Stored invoice");
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Invoice>> {
        let inner = self.inner.read().await;
        Ok(inner.invoices.get(&id).cloned())
    }

    async fn list(&self, department: Option<&str>) -> AppResult<Vec<Invoice>> {
        let inner = self.inner.read().await;
        Ok(inner
            .invoices
            .values()
            .filter(|invoice| department.map_or(true, |d| invoice.department == d))
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: i32, status: InvoiceStatus) -> AppResult<Invoice> {
        let mut inner = self.inner.write().await;
        let invoice = inner
            .invoices
            .get_mut(&id)
            .ok_or(AppError::InvoiceNotFound(id))?;
        invoice.transition_to(status)?;
        Ok(invoice.clone())
    }
}

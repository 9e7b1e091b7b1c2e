//! Invoice generation
//!
//! An invoice is the department aggregation applied to a date range and
//! persisted as a snapshot: totals, a per-type breakdown blob, and a
//! status that may only move pending -> approved -> paid. Regenerating
//! later against the same range may differ if calls were added meanwhile;
//! the stored invoice is the record of what was billed.

use pabx_core::models::{DateRange, Invoice, InvoiceStatus};
use pabx_core::traits::{CallStore, DepartmentStore, InvoiceStore};
use pabx_core::{AppError, AppResult};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::stats::type_breakdown;

/// Invoice service
pub struct InvoiceService<C: CallStore, D: DepartmentStore, I: InvoiceStore> {
    calls: Arc<C>,
    departments: Arc<D>,
    invoices: Arc<I>,
}

impl<C: CallStore, D: DepartmentStore, I: InvoiceStore> InvoiceService<C, D, I> {
    /// Create a new invoice service
    pub fn new(calls: Arc<C>, departments: Arc<D>, invoices: Arc<I>) -> Self {
        Self {
            calls,
            departments,
            invoices,
        }
    }

    /// Generate and persist an invoice for a department over a window
    ///
    /// Aggregates the department's calls in the inclusive range and stores
    /// the result with `pending` status. The department must be registered;
    /// a department with no calls in range yields a valid all-zero invoice.
    #[instrument(skip(self))]
    pub async fn generate_invoice(&self, department: &str, range: &DateRange) -> AppResult<Invoice> {
        let dept = self
            .departments
            .find_by_name(department)
            .await?
            .ok_or_else(|| AppError::DepartmentNotFound(department.to_string()))?;

        let calls = self
            .calls
            .list_by_department(&dept.name, Some(range))
            .await?;

        let total_calls = calls.len() as i64;
        let total_duration: i64 = calls.iter().map(|c| i64::from(c.duration)).sum();
        let total_cost: Decimal = calls.iter().map(|c| c.cost).sum();
        let breakdown = type_breakdown(calls.iter());

        debug!(
            department = %dept.name,
            total_calls,
            %total_cost,
            "Aggregated invoice figures"
        );

        let invoice = Invoice {
            id: 0,
            department: dept.name.clone(),
            from_date: range.start(),
            to_date: range.end(),
            total_calls,
            total_duration,
            total_cost,
            details: serde_json::to_value(&breakdown)?,
            status: InvoiceStatus::Pending,
            generated_at: chrono::Utc::now(),
        };

        let created = self.invoices.create(&invoice).await?;
        info!(invoice_id = created.id, department = %created.department, "Generated invoice");
        Ok(created)
    }

    /// Fetch a single invoice
    pub async fn get_invoice(&self, id: i32) -> AppResult<Invoice> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or(AppError::InvoiceNotFound(id))
    }

    /// List invoices, optionally restricted to one department
    pub async fn list_invoices(&self, department: Option<&str>) -> AppResult<Vec<Invoice>> {
        self.invoices.list(department).await
    }

    /// Approve a pending invoice
    pub async fn approve_invoice(&self, id: i32) -> AppResult<Invoice> {
        self.invoices
            .update_status(id, InvoiceStatus::Approved)
            .await
    }

    /// Mark an approved invoice as paid
    pub async fn mark_invoice_paid(&self, id: i32) -> AppResult<Invoice> {
        self.invoices.update_status(id, InvoiceStatus::Paid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calls::CallService;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pabx_core::config::BillingConfig;
    use pabx_core::models::{CallType, NewCall};
    use pabx_store::{seed_defaults, MemoryStore};
    use rust_decimal_macros::dec;

    struct Fixture {
        calls: CallService<MemoryStore, MemoryStore>,
        invoices: InvoiceService<MemoryStore, MemoryStore, MemoryStore>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        seed_defaults(&store).await.unwrap();
        Fixture {
            calls: CallService::new(store.clone(), store.clone(), BillingConfig::default()),
            invoices: InvoiceService::new(store.clone(), store.clone(), store),
        }
    }

    fn january() -> DateRange {
        DateRange::full_days(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    async fn sales_call(fx: &Fixture, day: u32, call_type: CallType, duration: i32) {
        fx.calls
            .create_call(NewCall {
                timestamp: Some(Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap()),
                source_extension: "Ext. 1024".to_string(),
                source_department: Some("Sales".to_string()),
                destination_number: "+1 (202) 555-0147".to_string(),
                destination_type: "phone".to_string(),
                call_type,
                duration,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generate_invoice_aggregates_department_calls() {
        let fx = fixture().await;
        // Local 60s: 0.10 + 0.15 = 0.25; long distance 90s: 0.88
        sales_call(&fx, 5, CallType::Local, 60).await;
        sales_call(&fx, 6, CallType::LongDistance, 90).await;
        // Outside the window
        fx.calls
            .create_call(NewCall {
                timestamp: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
                source_extension: "Ext. 1024".to_string(),
                source_department: Some("Sales".to_string()),
                destination_number: "+1 (202) 555-0147".to_string(),
                destination_type: "phone".to_string(),
                call_type: CallType::Local,
                duration: 60,
            })
            .await
            .unwrap();

        let invoice = fx
            .invoices
            .generate_invoice("Sales", &january())
            .await
            .unwrap();

        assert_eq!(invoice.total_calls, 2);
        assert_eq!(invoice.total_duration, 150);
        assert_eq!(invoice.total_cost, dec!(1.13));
        assert_eq!(invoice.status, InvoiceStatus::Pending);

        // Details blob carries the complete per-type breakdown
        let local = &invoice.details["local"];
        assert_eq!(local["count"], 1);
        assert_eq!(invoice.details["international"]["count"], 0);
    }

    #[tokio::test]
    async fn test_generate_invoice_unknown_department() {
        let fx = fixture().await;
        let err = fx
            .invoices
            .generate_invoice("Warehouse", &january())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "department_not_found");
    }

    #[tokio::test]
    async fn test_generate_invoice_empty_range_is_all_zero() {
        let fx = fixture().await;
        let invoice = fx
            .invoices
            .generate_invoice("Finance", &january())
            .await
            .unwrap();
        assert_eq!(invoice.total_calls, 0);
        assert_eq!(invoice.total_cost, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_invoice_lifecycle_and_listing() {
        let fx = fixture().await;
        sales_call(&fx, 5, CallType::Local, 60).await;

        let invoice = fx
            .invoices
            .generate_invoice("Sales", &january())
            .await
            .unwrap();

        let approved = fx.invoices.approve_invoice(invoice.id).await.unwrap();
        assert_eq!(approved.status, InvoiceStatus::Approved);
        let paid = fx.invoices.mark_invoice_paid(invoice.id).await.unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);

        // Figures are frozen at generation time
        assert_eq!(paid.total_cost, invoice.total_cost);

        let sales = fx.invoices.list_invoices(Some("Sales")).await.unwrap();
        assert_eq!(sales.len(), 1);
        let other = fx.invoices.list_invoices(Some("Finance")).await.unwrap();
        assert!(other.is_empty());
    }
}

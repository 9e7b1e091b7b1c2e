//! End-to-end billing flow tests
//!
//! Exercises the full path against the in-memory store: seed rates and
//! departments, create calls through the call service (rate resolution +
//! cost calculation), then verify statistics and invoice generation over
//! the same record set.

use chrono::{NaiveDate, TimeZone, Utc};
use pabx_core::config::BillingConfig;
use pabx_core::models::{CallFilter, CallType, DateRange, NewCall};
use pabx_engine::{CallService, InvoiceService, StatsService};
use pabx_store::{seed_defaults, MemoryStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

struct Services {
    calls: CallService<MemoryStore, MemoryStore>,
    stats: StatsService<MemoryStore, MemoryStore>,
    invoices: InvoiceService<MemoryStore, MemoryStore, MemoryStore>,
}

async fn setup() -> Services {
    let store = Arc::new(MemoryStore::new());
    seed_defaults(&store).await.unwrap();
    Services {
        calls: CallService::new(store.clone(), store.clone(), BillingConfig::default()),
        stats: StatsService::new(store.clone(), store.clone()),
        invoices: InvoiceService::new(store.clone(), store.clone(), store),
    }
}

fn new_call(
    day: u32,
    hour: u32,
    department: &str,
    call_type: CallType,
    duration: i32,
) -> NewCall {
    NewCall {
        timestamp: Some(Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()),
        source_extension: "Ext. 1024".to_string(),
        source_department: Some(department.to_string()),
        destination_number: "+44 20 5550 1234".to_string(),
        destination_type: "phone".to_string(),
        call_type,
        duration,
    }
}

fn january(start_day: u32, end_day: u32) -> DateRange {
    DateRange::full_days(
        NaiveDate::from_ymd_opt(2024, 1, start_day).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, end_day).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn billed_costs_flow_through_statistics() {
    let svc = setup().await;

    // Seeded rates: local 0.15/min + 0.10, long distance 0.25/min + 0.50,
    // international 0.75/min + 1.00, internal free.
    svc.calls
        .create_call(new_call(2, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap(); // 0.25
    svc.calls
        .create_call(new_call(2, 10, "Sales", CallType::LongDistance, 90))
        .await
        .unwrap(); // 0.88
    svc.calls
        .create_call(new_call(3, 11, "Support", CallType::Internal, 600))
        .await
        .unwrap(); // 0.00
    svc.calls
        .create_call(new_call(4, 12, "Support", CallType::International, 120))
        .await
        .unwrap(); // 2.50

    let stats = svc.stats.call_stats(None).await.unwrap();
    assert_eq!(stats.total_calls, 4);
    assert_eq!(stats.total_duration, 870);
    assert_eq!(stats.total_cost, dec!(3.63));
    assert_eq!(stats.calls_by_type[&CallType::Internal], 1);
    assert_eq!(stats.calls_by_type[&CallType::Local], 1);
    assert_eq!(stats.calls_by_type[&CallType::LongDistance], 1);
    assert_eq!(stats.calls_by_type[&CallType::International], 1);

    // total_calls always equals the by-type sum
    let by_type_sum: i64 = stats.calls_by_type.values().sum();
    assert_eq!(stats.total_calls, by_type_sum);
}

#[tokio::test]
async fn windowed_stats_respect_inclusive_boundaries() {
    let svc = setup().await;

    // At both window edges, plus one second before the start
    for timestamp in [
        Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 59).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 4, 23, 59, 59).unwrap(),
    ] {
        svc.calls
            .create_call(NewCall {
                timestamp: Some(timestamp),
                ..new_call(1, 0, "Sales", CallType::Local, 60)
            })
            .await
            .unwrap();
    }

    let stats = svc.stats.call_stats(Some(january(5, 10))).await.unwrap();
    assert_eq!(stats.total_calls, 2);
}

#[tokio::test]
async fn department_stats_cover_every_seeded_department() {
    let svc = setup().await;
    svc.calls
        .create_call(new_call(2, 9, "Marketing", CallType::Local, 120))
        .await
        .unwrap(); // 0.10 + 2 * 0.15 = 0.40

    let stats = svc.stats.department_stats(None).await.unwrap();

    // All five seeded departments, in registration order
    let names: Vec<&str> = stats.iter().map(|s| s.department.as_str()).collect();
    assert_eq!(names, vec!["Sales", "Marketing", "Support", "Finance", "IT"]);

    let marketing = &stats[1];
    assert_eq!(marketing.total_calls, 1);
    assert_eq!(marketing.total_cost, dec!(0.40));
    assert_eq!(marketing.calls_by_type[&CallType::Local].count, 1);

    // Everyone else is zero-filled, not missing
    for dept in stats.iter().filter(|s| s.department != "Marketing") {
        assert_eq!(dept.total_calls, 0);
        assert_eq!(dept.total_cost, Decimal::ZERO);
        assert_eq!(dept.calls_by_type.len(), 4);
    }
}

#[tokio::test]
async fn daily_volume_series_is_gapless() {
    let svc = setup().await;
    svc.calls
        .create_call(new_call(1, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap();
    svc.calls
        .create_call(new_call(2, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap();
    svc.calls
        .create_call(new_call(5, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap();

    let series = svc.stats.daily_call_volume(january(1, 5)).await.unwrap();
    assert_eq!(series.len(), 5);
    assert_eq!(series[2].date, "2024-01-03");
    assert_eq!(series[2].count, 0);
    let counts: Vec<i64> = series.iter().map(|p| p.count).collect();
    assert_eq!(counts, vec![1, 1, 0, 0, 1]);
}

#[tokio::test]
async fn reversed_range_is_rejected_before_aggregation() {
    let err = DateRange::full_days(
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "invalid_date_range");
}

#[tokio::test]
async fn invoice_snapshot_matches_department_stats() {
    let svc = setup().await;
    svc.calls
        .create_call(new_call(2, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap();
    svc.calls
        .create_call(new_call(3, 9, "Sales", CallType::International, 60))
        .await
        .unwrap(); // 1.00 + 0.75 = 1.75

    let range = january(1, 31);
    let dept_stats = svc.stats.department_stats(Some(range)).await.unwrap();
    let sales = dept_stats.iter().find(|s| s.department == "Sales").unwrap();

    let invoice = svc.invoices.generate_invoice("Sales", &range).await.unwrap();
    assert_eq!(invoice.total_calls, sales.total_calls);
    assert_eq!(invoice.total_cost, sales.total_cost);
    assert_eq!(invoice.total_cost, dec!(2.00));

    // Calls created after generation do not change the stored snapshot
    svc.calls
        .create_call(new_call(4, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap();
    let reread = svc.invoices.get_invoice(invoice.id).await.unwrap();
    assert_eq!(reread.total_calls, 2);
}

#[tokio::test]
async fn listing_filters_by_type_and_department() {
    let svc = setup().await;
    svc.calls
        .create_call(new_call(2, 9, "Sales", CallType::Local, 60))
        .await
        .unwrap();
    svc.calls
        .create_call(new_call(2, 10, "IT", CallType::Local, 60))
        .await
        .unwrap();
    svc.calls
        .create_call(new_call(2, 11, "IT", CallType::Internal, 60))
        .await
        .unwrap();

    let (page, total) = svc
        .calls
        .list_calls(
            CallFilter {
                call_type: Some(CallType::Local),
                source_department: Some("IT".to_string()),
            },
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(page[0].source_department.as_deref(), Some("IT"));
}

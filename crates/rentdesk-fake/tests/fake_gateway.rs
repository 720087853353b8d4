//! Table session and dispatcher driven against the fake gateway.

use std::time::Duration;

use chrono::NaiveDate;
use rentdesk_core::{
    ActionDispatcher, ControllerConfig, DateRange, DispatchConfig, FetchOutcome, Gateway,
    PageQuery, PageSize, Pagination, RecordId, ReturnDetails, TableSession,
};
use rentdesk_fake::{DEFAULT_LATENCY, FakeGateway, generate_inventory};
use tokio::time::Instant;

fn range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
    )
}

#[tokio::test(start_paused = true)]
async fn fetch_waits_for_simulated_latency() {
    let gateway = FakeGateway::generated(1, 95);
    let started = Instant::now();

    let query = PageQuery::new(Pagination::new(9, PageSize::Ten));
    let page = gateway.fetch_page(&query).await.unwrap();

    assert!(started.elapsed() >= DEFAULT_LATENCY);
    assert_eq!(page.total_count, 95);
    assert_eq!(page.rows.len(), 5);
    assert_eq!(page.rows[0].id, RecordId(91));
}

#[tokio::test(start_paused = true)]
async fn session_pages_through_inventory() {
    let session = TableSession::new(FakeGateway::generated(1, 45), ControllerConfig::default());
    session.refresh().await;

    session.update(|table| table.last_page()).await;
    assert_eq!(
        session.sync().await,
        Some(FetchOutcome::Applied { refetch: false })
    );

    let view = session.view();
    assert_eq!(view.page_label(), "Page 5 of 5");
    assert_eq!(view.rows.len(), 5);
    assert!(!view.can_next_page);
}

#[tokio::test(start_paused = true)]
async fn injected_failure_keeps_previous_page() {
    let gateway = FakeGateway::generated(1, 45).with_latency(Duration::from_millis(50));
    let session = TableSession::new(gateway.clone(), ControllerConfig::default());
    session.refresh().await;
    let first_page = session.view().rows;

    gateway.fail_next_fetch();
    session.update(|table| table.next_page()).await;
    let outcome = session.sync().await;

    assert!(matches!(outcome, Some(FetchOutcome::Failed(_))));
    let view = session.view();
    assert_eq!(view.rows, first_page);
    assert!(view.error.is_some());

    assert_eq!(
        session.refresh().await,
        FetchOutcome::Applied { refetch: false }
    );
    assert!(session.view().error.is_none());
}

#[tokio::test(start_paused = true)]
async fn booking_and_return_are_stored() {
    let inventory = generate_inventory(5, &[10]);
    let product = inventory[2].clone();
    let gateway = FakeGateway::new(inventory).with_latency(Duration::ZERO);
    let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());

    let booked = dispatcher.book(&[product.clone()], &range()).await;
    assert!(booked[0].is_success(), "{}", booked[0]);

    let details = ReturnDetails {
        mileage_used: 12,
        needs_repair: false,
    };
    let returned = dispatcher
        .return_products(&[product.clone()], &range(), details)
        .await;
    assert!(returned[0].is_success(), "{}", returned[0]);

    let submissions = gateway.submissions().await;
    assert_eq!(submissions.bookings.len(), 1);
    assert_eq!(submissions.returns[0].mileage_used, 12);
    let rate = product.price.unwrap();
    assert_eq!(submissions.bookings[0].price, rate * 3.0);

    let page = gateway.fetch_page(&PageQuery::default()).await.unwrap();
    assert_eq!(page.rows[2].mileage, product.mileage + 12.0);
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_is_reported() {
    let gateway = FakeGateway::generated(5, 10).with_latency(Duration::ZERO);
    let product = gateway.fetch_page(&PageQuery::default()).await.unwrap().rows[0].clone();
    gateway.reject_submissions(Some(409));
    let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());

    let outcomes = dispatcher.book(&[product], &range()).await;
    assert!(!outcomes[0].is_success());
    assert!(outcomes[0].to_string().contains("HTTP 409"));
    assert!(gateway.submissions().await.bookings.is_empty());
}

//! Booking and return submissions.
//!
//! The dispatcher turns the current selection and chosen dates into
//! requests, validates them before anything is sent, and submits them
//! through a [`Gateway`]. It never mutates table state; the outcome is
//! reported back to the caller for display.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{Error, ValidationGap};
use crate::pricing::DateRange;
use crate::traits::Gateway;
use crate::types::{ActionKind, BookingRequest, Record, RecordId, ReturnRequest};

/// Which selected rows a submission acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPolicy {
    /// Exactly one row must be selected.
    #[default]
    Single,
    /// Every selected row gets its own request, submitted one after another.
    Batch,
}

/// Dispatcher settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub target_policy: TargetPolicy,
}

/// Extra fields a return carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDetails {
    pub mileage_used: u32,
    pub needs_repair: bool,
}

/// The user-visible result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// The product the request was for; `None` when nothing was sent.
    pub product: Option<RecordId>,
    pub result: Result<(), Error>,
}

impl ActionOutcome {
    fn failed(kind: ActionKind, product: Option<RecordId>, error: Error) -> Self {
        Self {
            kind,
            product,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.result, self.product) {
            (Ok(()), Some(product)) => write!(f, "{} successful (product {})", self.kind, product),
            (Ok(()), None) => write!(f, "{} successful", self.kind),
            (Err(e), Some(product)) => {
                write!(f, "{} failed (product {}): {}", self.kind, product, e)
            }
            (Err(e), None) => write!(f, "{} failed: {}", self.kind, e),
        }
    }
}

/// Clears the in-flight flag when a submission ends, including when its
/// future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submits bookings and returns, one submission at a time.
#[derive(Debug)]
pub struct ActionDispatcher<G> {
    gateway: G,
    config: DispatchConfig,
    in_flight: AtomicBool,
}

impl<G: Gateway> ActionDispatcher<G> {
    pub fn new(gateway: G, config: DispatchConfig) -> Self {
        Self {
            gateway,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// True while a submission is waiting for its response.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn targets<'a>(&self, selection: &'a [Record]) -> Result<Vec<&'a Record>, ValidationGap> {
        match (self.config.target_policy, selection.len()) {
            (_, 0) => Err(ValidationGap::NoSelection),
            (TargetPolicy::Single, 1) | (TargetPolicy::Batch, _) => Ok(selection.iter().collect()),
            (TargetPolicy::Single, count) => Err(ValidationGap::AmbiguousSelection { count }),
        }
    }

    fn priced<'a>(
        &self,
        selection: &'a [Record],
        range: &DateRange,
    ) -> Result<Vec<(&'a Record, f64)>, ValidationGap> {
        range.require()?;
        self.targets(selection)?
            .into_iter()
            .map(|record| {
                range
                    .estimate_for(record)
                    .map(|price| (record, price))
                    .ok_or(ValidationGap::MissingDailyRate { id: record.id })
            })
            .collect()
    }

    /// Build booking requests for the selection, or the first missing input.
    pub fn build_bookings(
        &self,
        selection: &[Record],
        range: &DateRange,
    ) -> Result<Vec<BookingRequest>, ValidationGap> {
        let (from_date, to_date) = range.require()?;
        Ok(self
            .priced(selection, range)?
            .into_iter()
            .map(|(record, price)| BookingRequest {
                from_date,
                to_date,
                price,
                product: record.id,
            })
            .collect())
    }

    /// Build return requests for the selection, or the first missing input.
    pub fn build_returns(
        &self,
        selection: &[Record],
        range: &DateRange,
        details: ReturnDetails,
    ) -> Result<Vec<ReturnRequest>, ValidationGap> {
        let (from_date, to_date) = range.require()?;
        Ok(self
            .priced(selection, range)?
            .into_iter()
            .map(|(record, price)| ReturnRequest {
                from_date,
                to_date,
                price,
                product: record.id,
                mileage_used: details.mileage_used,
                needs_repair: details.needs_repair,
            })
            .collect())
    }

    fn acquire(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }

    /// Book the selected product(s). Always yields at least one outcome.
    #[instrument(skip(self, selection), fields(selected = selection.len()))]
    pub async fn book(&self, selection: &[Record], range: &DateRange) -> Vec<ActionOutcome> {
        let kind = ActionKind::Booking;
        let Some(_guard) = self.acquire() else {
            warn!("booking rejected, another submission is in flight");
            return vec![ActionOutcome::failed(kind, None, Error::SubmissionInFlight)];
        };

        let requests = match self.build_bookings(selection, range) {
            Ok(requests) => requests,
            Err(gap) => return vec![ActionOutcome::failed(kind, None, gap.into())],
        };

        let mut outcomes = Vec::with_capacity(requests.len());
        for request in &requests {
            let result = self.gateway.submit_booking(request).await;
            outcomes.push(self.report(kind, request.product, result));
        }
        outcomes
    }

    /// Return the selected product(s). Always yields at least one outcome.
    #[instrument(skip(self, selection), fields(selected = selection.len()))]
    pub async fn return_products(
        &self,
        selection: &[Record],
        range: &DateRange,
        details: ReturnDetails,
    ) -> Vec<ActionOutcome> {
        let kind = ActionKind::Return;
        let Some(_guard) = self.acquire() else {
            warn!("return rejected, another submission is in flight");
            return vec![ActionOutcome::failed(kind, None, Error::SubmissionInFlight)];
        };

        let requests = match self.build_returns(selection, range, details) {
            Ok(requests) => requests,
            Err(gap) => return vec![ActionOutcome::failed(kind, None, gap.into())],
        };

        let mut outcomes = Vec::with_capacity(requests.len());
        for request in &requests {
            let result = self.gateway.submit_return(request).await;
            outcomes.push(self.report(kind, request.product, result));
        }
        outcomes
    }

    fn report(&self, kind: ActionKind, product: RecordId, result: crate::Result<()>) -> ActionOutcome {
        match &result {
            Ok(()) => info!(%kind, %product, "submission accepted"),
            Err(e) => warn!(%kind, %product, error = %e, "submission failed"),
        }
        ActionOutcome {
            kind,
            product: Some(product),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::error::StatusError;
    use crate::pricing::parse_date;
    use crate::table::TableController;
    use crate::types::{PageQuery, PageResponse};

    /// Gateway that records submissions and answers with a fixed status.
    #[derive(Default)]
    struct RecordingGateway {
        status: u16,
        delay: Option<Duration>,
        bookings: Mutex<Vec<BookingRequest>>,
        returns: Mutex<Vec<ReturnRequest>>,
    }

    impl RecordingGateway {
        fn answering(status: u16) -> Self {
            Self {
                status,
                ..Self::default()
            }
        }

        fn answer(&self) -> crate::Result<()> {
            if self.status == 201 {
                Ok(())
            } else {
                Err(StatusError::new(self.status, None).into())
            }
        }
    }

    #[async_trait]
    impl Gateway for RecordingGateway {
        async fn fetch_page(&self, _query: &PageQuery) -> crate::Result<PageResponse> {
            Ok(PageResponse {
                rows: Vec::new(),
                total_count: 0,
            })
        }

        async fn submit_booking(&self, request: &BookingRequest) -> crate::Result<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.bookings.lock().unwrap().push(request.clone());
            self.answer()
        }

        async fn submit_return(&self, request: &ReturnRequest) -> crate::Result<()> {
            self.returns.lock().unwrap().push(request.clone());
            self.answer()
        }
    }

    fn range() -> DateRange {
        DateRange::new(
            parse_date("2024-01-01").unwrap(),
            parse_date("2024-01-04").unwrap(),
        )
    }

    fn bike() -> Record {
        Record::new(7, "Bike").with_price(10.0)
    }

    #[tokio::test]
    async fn booking_sends_computed_price() {
        let gateway = Arc::new(RecordingGateway::answering(201));
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());

        let outcomes = dispatcher.book(&[bike()], &range()).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[0].to_string(), "Booking successful (product 7)");

        let sent = gateway.bookings.lock().unwrap();
        assert_eq!(sent[0].price, 30.0);
        assert_eq!(sent[0].product, RecordId(7));
    }

    #[tokio::test]
    async fn return_carries_details() {
        let gateway = Arc::new(RecordingGateway::answering(201));
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());
        let details = ReturnDetails {
            mileage_used: 42,
            needs_repair: true,
        };

        let outcomes = dispatcher.return_products(&[bike()], &range(), details).await;
        assert!(outcomes[0].is_success());

        let sent = gateway.returns.lock().unwrap();
        assert_eq!(sent[0].mileage_used, 42);
        assert!(sent[0].needs_repair);
        assert_eq!(sent[0].price, 30.0);
    }

    #[tokio::test]
    async fn missing_date_is_rejected_before_sending() {
        let gateway = Arc::new(RecordingGateway::answering(201));
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());
        let mut partial = DateRange::default();
        partial.set_from(parse_date("2024-01-01").unwrap());

        let outcomes = dispatcher.book(&[bike()], &partial).await;
        assert_eq!(
            outcomes[0].result,
            Err(Error::Validation(ValidationGap::MissingToDate))
        );
        assert!(gateway.bookings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_and_ambiguous_selection_are_rejected() {
        let gateway = Arc::new(RecordingGateway::answering(201));
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());

        let outcomes = dispatcher.book(&[], &range()).await;
        assert_eq!(
            outcomes[0].result,
            Err(Error::Validation(ValidationGap::NoSelection))
        );

        let two = [bike(), Record::new(8, "Tent").with_price(5.0)];
        let outcomes = dispatcher.book(&two, &range()).await;
        assert_eq!(
            outcomes[0].result,
            Err(Error::Validation(ValidationGap::AmbiguousSelection { count: 2 }))
        );
        assert!(gateway.bookings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unpriced_record_is_rejected() {
        let dispatcher = ActionDispatcher::new(
            Arc::new(RecordingGateway::answering(201)),
            DispatchConfig::default(),
        );
        let outcomes = dispatcher.book(&[Record::new(3, "Canoe")], &range()).await;
        assert_eq!(
            outcomes[0].result,
            Err(Error::Validation(ValidationGap::MissingDailyRate { id: RecordId(3) }))
        );
    }

    #[tokio::test]
    async fn batch_policy_submits_each_row() {
        let gateway = Arc::new(RecordingGateway::answering(201));
        let dispatcher = ActionDispatcher::new(
            gateway.clone(),
            DispatchConfig {
                target_policy: TargetPolicy::Batch,
            },
        );
        let two = [bike(), Record::new(8, "Tent").with_price(5.0)];

        let outcomes = dispatcher.book(&two, &range()).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(ActionOutcome::is_success));

        let sent = gateway.bookings.lock().unwrap();
        assert_eq!(sent[1].product, RecordId(8));
        assert_eq!(sent[1].price, 15.0);
    }

    #[tokio::test]
    async fn parent_row_is_booked_as_one_product() {
        let gateway = Arc::new(RecordingGateway::answering(201));
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());

        let mut parent = Record::new(1, "Bike set").with_price(20.0);
        parent.sub_rows.push(Record::new(2, "Bike").with_price(10.0));
        let mut controller = TableController::default();
        let ticket = controller.begin_fetch();
        controller.complete_fetch(
            &ticket,
            Ok(PageResponse {
                rows: vec![parent],
                total_count: 1,
            }),
        );
        controller.toggle_row_selected(RecordId(1));
        assert!(controller.is_row_selected(RecordId(2)));

        let outcomes = dispatcher.book(&controller.selected_records(), &range()).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_success(), "{}", outcomes[0]);

        let bookings = gateway.bookings.lock().unwrap();
        assert_eq!(bookings[0].product, RecordId(1));
        assert_eq!(bookings[0].price, 60.0);
    }

    #[tokio::test]
    async fn non_created_status_is_a_visible_failure_and_leaves_table_alone() {
        let gateway = Arc::new(RecordingGateway::answering(400));
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());

        let mut controller = TableController::default();
        let ticket = controller.begin_fetch();
        controller.complete_fetch(
            &ticket,
            Ok(PageResponse {
                rows: vec![bike()],
                total_count: 1,
            }),
        );
        controller.toggle_row_selected(RecordId(7));
        let before = (controller.pagination(), controller.selection().clone());

        let outcomes = dispatcher.book(&controller.selected_records(), &range()).await;
        assert!(!outcomes[0].is_success());
        assert_eq!(
            outcomes[0].to_string(),
            "Booking failed (product 7): unexpected status: HTTP 400"
        );
        assert_eq!((controller.pagination(), controller.selection().clone()), before);
        assert!(!dispatcher.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn second_submission_while_in_flight_is_rejected() {
        let gateway = Arc::new(RecordingGateway {
            status: 201,
            delay: Some(Duration::from_millis(500)),
            ..RecordingGateway::default()
        });
        let dispatcher = ActionDispatcher::new(gateway.clone(), DispatchConfig::default());
        let selection = [bike()];
        let dates = range();

        let (first, second) = tokio::join!(dispatcher.book(&selection, &dates), async {
            tokio::task::yield_now().await;
            dispatcher.book(&selection, &dates).await
        });

        assert!(first[0].is_success());
        assert_eq!(second[0].result, Err(Error::SubmissionInFlight));
        assert_eq!(gateway.bookings.lock().unwrap().len(), 1);
        assert!(!dispatcher.is_busy());
    }
}

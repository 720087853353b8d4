//! Fake gateway implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use rentdesk_core::{
    ApiUrl, BookingRequest, Error, Gateway, InvalidInputError, NetworkError, PageQuery,
    PageResponse, Record, Result, ReturnRequest, StatusError,
};

use crate::inventory::generate_inventory;
use crate::store::{MemoryStore, Submissions};

/// Simulated round-trip time when none is configured.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Number of top-level rows generated when none is configured.
pub const DEFAULT_ROWS: usize = 10_000;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// An in-memory gateway with simulated latency and failure injection.
///
/// Clones share the same inventory and submissions.
#[derive(Debug, Clone)]
pub struct FakeGateway {
    store: Arc<Mutex<MemoryStore>>,
    latency: Duration,
    fail_next_fetch: Arc<AtomicBool>,
    reject_status: Arc<AtomicU16>,
}

impl FakeGateway {
    /// Serve the given records.
    pub fn new(inventory: Vec<Record>) -> Self {
        Self {
            store: Arc::new(Mutex::new(MemoryStore::new(inventory))),
            latency: DEFAULT_LATENCY,
            fail_next_fetch: Arc::new(AtomicBool::new(false)),
            reject_status: Arc::new(AtomicU16::new(0)),
        }
    }

    /// Serve `rows` generated top-level records.
    pub fn generated(seed: u64, rows: usize) -> Self {
        Self::new(generate_inventory(seed, &[rows]))
    }

    /// Build a gateway from a `memory://` URL.
    ///
    /// Recognised query parameters are `seed`, `rows` and `latency_ms`.
    pub fn from_api_url(url: &ApiUrl) -> Result<Self> {
        if !url.is_memory() {
            return Err(InvalidInputError::ApiUrl {
                value: url.to_string(),
                reason: "the fake gateway needs a memory:// URL".to_string(),
            }
            .into());
        }

        let seed = param(url, "seed")?.unwrap_or(DEFAULT_SEED);
        let rows = param(url, "rows")?.unwrap_or(DEFAULT_ROWS);
        let latency = param(url, "latency_ms")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LATENCY);

        info!(
            seed,
            rows,
            latency_ms = latency.as_millis() as u64,
            "using fake inventory"
        );
        Ok(Self::generated(seed, rows).with_latency(latency))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Make the next page fetch fail with a connection error.
    pub fn fail_next_fetch(&self) {
        self.fail_next_fetch.store(true, Ordering::Release);
    }

    /// Answer every submission with `status` instead of 201; `None` restores
    /// normal behaviour.
    pub fn reject_submissions(&self, status: Option<u16>) {
        self.reject_status.store(status.unwrap_or(0), Ordering::Release);
    }

    /// Bookings and returns accepted so far.
    pub async fn submissions(&self) -> Submissions {
        self.store.lock().await.submissions().clone()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn rejection(&self) -> Option<Error> {
        match self.reject_status.load(Ordering::Acquire) {
            0 => None,
            status => Some(
                StatusError::new(status, Some("rejected by fake inventory".to_string())).into(),
            ),
        }
    }
}

fn param<T: std::str::FromStr>(url: &ApiUrl, name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    url.query_param(name)
        .map(|value| {
            value.parse::<T>().map_err(|e| {
                Error::from(InvalidInputError::ApiUrl {
                    value: url.to_string(),
                    reason: format!("invalid {}: {}", name, e),
                })
            })
        })
        .transpose()
}

#[async_trait]
impl Gateway for FakeGateway {
    #[instrument(skip(self), fields(limit = query.limit(), offset = query.offset()))]
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResponse> {
        self.simulate_latency().await;

        if self.fail_next_fetch.swap(false, Ordering::AcqRel) {
            debug!("injected fetch failure");
            return Err(NetworkError::Connection {
                message: "simulated outage".to_string(),
            }
            .into());
        }

        let store = self.store.lock().await;
        let page = store.page(query);
        debug!(rows = page.rows.len(), total = store.len(), "served page");
        Ok(page)
    }

    async fn submit_booking(&self, request: &BookingRequest) -> Result<()> {
        self.simulate_latency().await;
        if let Some(rejection) = self.rejection() {
            return Err(rejection);
        }
        self.store.lock().await.book(request)
    }

    async fn submit_return(&self, request: &ReturnRequest) -> Result<()> {
        self.simulate_latency().await;
        if let Some(rejection) = self.rejection() {
            return Err(rejection);
        }
        self.store.lock().await.return_product(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_parameters() {
        let url = ApiUrl::new("memory://?seed=3&rows=25&latency_ms=0").unwrap();
        let gateway = FakeGateway::from_api_url(&url).unwrap();
        assert_eq!(gateway.latency(), Duration::ZERO);
    }

    #[test]
    fn bad_url_parameter() {
        let url = ApiUrl::new("memory://?rows=lots").unwrap();
        let err = FakeGateway::from_api_url(&url).unwrap_err();
        assert!(err.to_string().contains("invalid rows"));
    }

    #[test]
    fn network_url_is_rejected() {
        let url = ApiUrl::new("https://rent.example.com").unwrap();
        assert!(FakeGateway::from_api_url(&url).is_err());
    }
}

//! Gateway trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::{BookingRequest, PageQuery, PageResponse, ReturnRequest};

/// A source of inventory pages and a sink for bookings and returns.
///
/// Implementations report a submission as successful only when the backend
/// confirms creation; any other answer is an error.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch one window of records.
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResponse>;

    /// Submit a booking.
    async fn submit_booking(&self, request: &BookingRequest) -> Result<()>;

    /// Submit a return.
    async fn submit_return(&self, request: &ReturnRequest) -> Result<()>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResponse> {
        (**self).fetch_page(query).await
    }

    async fn submit_booking(&self, request: &BookingRequest) -> Result<()> {
        (**self).submit_booking(request).await
    }

    async fn submit_return(&self, request: &ReturnRequest) -> Result<()> {
        (**self).submit_return(request).await
    }
}

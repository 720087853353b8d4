//! REST-backed gateway implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use rentdesk_core::{
    ApiUrl, BookingRequest, Gateway, PageQuery, PageResponse, Result, ReturnRequest,
};

use crate::client::{ApiClient, ClientConfig};
use crate::endpoints::{BOOKINGS, PRODUCTS, ProductsQuery, ProductsResponse, RETURNS};

/// A network-backed gateway talking to the inventory REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: ApiClient,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
        })
    }

    /// Create a gateway with default timeout and user agent.
    pub fn connect(base_url: ApiUrl) -> Result<Self> {
        Self::new(ClientConfig::new(base_url))
    }

    /// Returns the API base URL for this gateway.
    pub fn url(&self) -> &ApiUrl {
        self.client.base_url()
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    #[instrument(skip(self), fields(limit = query.limit(), offset = query.offset()))]
    async fn fetch_page(&self, query: &PageQuery) -> Result<PageResponse> {
        let response: ProductsResponse = self
            .client
            .get_json(PRODUCTS, &ProductsQuery::from(query))
            .await?;
        debug!(
            count = response.count,
            rows = response.results.len(),
            "fetched products"
        );
        Ok(response.into())
    }

    #[instrument(skip(self), fields(product = %request.product))]
    async fn submit_booking(&self, request: &BookingRequest) -> Result<()> {
        self.client
            .post_expecting(BOOKINGS, request, StatusCode::CREATED)
            .await
    }

    #[instrument(skip(self), fields(product = %request.product))]
    async fn submit_return(&self, request: &ReturnRequest) -> Result<()> {
        self.client
            .post_expecting(RETURNS, request, StatusCode::CREATED)
            .await
    }
}

//! Gateway selection for the CLI.

use anyhow::{Context, Result};
use async_trait::async_trait;

use rentdesk_core::{ApiUrl, BookingRequest, Gateway, PageQuery, PageResponse, ReturnRequest};
use rentdesk_fake::FakeGateway;
use rentdesk_http::{ClientConfig, HttpGateway};

use crate::cli::ConnectionArgs;

/// The gateway a command talks to, chosen by the API URL scheme.
#[derive(Debug, Clone)]
pub enum Backend {
    Http(HttpGateway),
    Fake(FakeGateway),
}

impl Backend {
    pub fn connect(args: &ConnectionArgs) -> Result<Self> {
        let api = ApiUrl::new(&args.api).context("Invalid API URL")?;

        if api.is_memory() {
            let fake = FakeGateway::from_api_url(&api).context("Invalid memory:// URL")?;
            Ok(Backend::Fake(fake))
        } else {
            let config = ClientConfig::new(api)
                .with_timeout(args.timeout())
                .with_user_agent(concat!("rentdesk-cli/", env!("RENTDESK_VERSION")));
            let http = HttpGateway::new(config).context("Failed to create HTTP client")?;
            Ok(Backend::Http(http))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Http(gateway) => gateway.url().to_string(),
            Backend::Fake(gateway) => format!(
                "generated inventory ({} ms latency)",
                gateway.latency().as_millis()
            ),
        }
    }
}

#[async_trait]
impl Gateway for Backend {
    async fn fetch_page(&self, query: &PageQuery) -> rentdesk_core::Result<PageResponse> {
        match self {
            Backend::Http(gateway) => gateway.fetch_page(query).await,
            Backend::Fake(gateway) => gateway.fetch_page(query).await,
        }
    }

    async fn submit_booking(&self, request: &BookingRequest) -> rentdesk_core::Result<()> {
        match self {
            Backend::Http(gateway) => gateway.submit_booking(request).await,
            Backend::Fake(gateway) => gateway.submit_booking(request).await,
        }
    }

    async fn submit_return(&self, request: &ReturnRequest) -> rentdesk_core::Result<()> {
        match self {
            Backend::Http(gateway) => gateway.submit_return(request).await,
            Backend::Fake(gateway) => gateway.submit_return(request).await,
        }
    }
}

//! Subcommand implementations.

pub mod book;
pub mod browse;
pub mod estimate;
pub mod products;

use anyhow::{Result, bail};

use rentdesk_core::{ControllerConfig, FetchOutcome, PageSize, TableSession};

use crate::backend::Backend;

/// Open a session and load the 1-based `page` at `page_size`.
pub(crate) async fn load_page(
    backend: Backend,
    page: usize,
    page_size: usize,
) -> Result<TableSession<Backend>> {
    if page == 0 {
        bail!("Pages are numbered from 1");
    }
    let page_size = PageSize::new(page_size)?;

    let session = TableSession::new(
        backend,
        ControllerConfig {
            page_size,
            ..ControllerConfig::default()
        },
    );
    session.update(|table| table.set_page(page - 1)).await;

    if let FetchOutcome::Failed(failure) = session.refresh().await {
        return Err(failure.into());
    }
    Ok(session)
}

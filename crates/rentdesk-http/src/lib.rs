//! rentdesk-http - Inventory gateway over the REST API.

mod client;
mod endpoints;
mod gateway;

pub use client::{ApiClient, ClientConfig};
pub use gateway::HttpGateway;

//! rentdesk-fake - In-memory gateway over generated inventory.
//!
//! Selected with a `memory://` API URL. Useful for demos and for exercising
//! the table against slow or failing backends without a server.

mod gateway;
mod inventory;
mod store;

pub use gateway::{DEFAULT_LATENCY, DEFAULT_ROWS, DEFAULT_SEED, FakeGateway};
pub use inventory::generate_inventory;
pub use store::Submissions;

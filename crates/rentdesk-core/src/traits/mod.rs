//! Core traits for data sources.

mod gateway;

pub use gateway::Gateway;

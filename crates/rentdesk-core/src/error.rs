//! Error types for rentdesk.
//!
//! This module provides a unified error type with explicit variants for
//! network, status, validation and input errors. Nothing here is fatal to
//! the process: every error is scoped to the single operation that raised it.

use std::fmt;
use thiserror::Error;

use crate::types::RecordId;

/// The unified error type for rentdesk operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// The request never produced a usable response (connection, timeout, decode).
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// The server answered with a status the operation does not accept.
    #[error("unexpected status: {0}")]
    UnexpectedStatus(#[from] StatusError),

    /// A submission was missing something it needs; rejected before dispatch.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationGap),

    /// Input validation errors (page size, URL, date format).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Another submission is still waiting for its response.
    #[error("a submission is already in flight")]
    SubmissionInFlight,
}

/// Transport-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },
}

/// A response whose status code the operation does not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    /// HTTP status code.
    pub status: u16,
    /// Excerpt of the response body, if any.
    pub body: Option<String>,
}

/// Longest body excerpt kept on a [`StatusError`].
const BODY_EXCERPT_LEN: usize = 200;

impl StatusError {
    /// Create a new status error, truncating the body excerpt.
    pub fn new(status: u16, body: Option<String>) -> Self {
        let body = body
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .map(|b| {
                if b.chars().count() > BODY_EXCERPT_LEN {
                    let cut: String = b.chars().take(BODY_EXCERPT_LEN).collect();
                    format!("{}...", cut)
                } else {
                    b
                }
            });
        Self { status, body }
    }

    /// Check if the server blamed the request (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref body) = self.body {
            write!(f, ": {}", body)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {}

/// Something a booking or return needs that the user has not provided yet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationGap {
    /// No start date chosen.
    #[error("no from date chosen")]
    MissingFromDate,

    /// No end date chosen.
    #[error("no to date chosen")]
    MissingToDate,

    /// No row is selected.
    #[error("no product selected")]
    NoSelection,

    /// More than one row is selected under the single-target policy.
    #[error("{count} products selected, exactly one is required")]
    AmbiguousSelection { count: usize },

    /// The selected record carries no daily rate, so no price can be computed.
    #[error("product {id} has no daily rate")]
    MissingDailyRate { id: RecordId },
}

/// Input validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    /// Page size outside the supported set.
    #[error("invalid page size {value}: must be one of 10, 20, 30, 40, 50")]
    PageSize { value: usize },

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid calendar date.
    #[error("invalid date '{value}': {reason}")]
    Date { value: String, reason: String },

    /// Unknown table column.
    #[error("unknown column '{value}'")]
    Column { value: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

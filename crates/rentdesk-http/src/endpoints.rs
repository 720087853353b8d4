//! REST endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use rentdesk_core::{PageQuery, PageResponse, Record};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Paginated product listing.
pub const PRODUCTS: &str = "api/v1/products";

/// Booking creation. The trailing slash is part of the route.
pub const BOOKINGS: &str = "api/v1/bookings/";

/// Return creation. The trailing slash is part of the route.
pub const RETURNS: &str = "api/v1/returns/";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the product listing.
#[derive(Debug, Serialize)]
pub struct ProductsQuery {
    pub limit: usize,
    pub offset: usize,
}

impl From<&PageQuery> for ProductsQuery {
    fn from(query: &PageQuery) -> Self {
        Self {
            limit: query.limit(),
            offset: query.offset(),
        }
    }
}

/// Response from the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub count: usize,
    #[serde(default)]
    pub results: Vec<Record>,
}

impl From<ProductsResponse> for PageResponse {
    fn from(response: ProductsResponse) -> Self {
        PageResponse {
            rows: response.results,
            total_count: response.count,
        }
    }
}

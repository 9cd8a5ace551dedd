//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

/// Query parameters for paged searches
///
/// Extracted from URL query strings. All parameters have defaults.
///
/// # Example
/// ```rust,ignore
/// GET /location?page=2&limit=10
/// GET /location?search=north&order_by=name&asc=false
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Free-text search on the name field
    pub search: Option<String>,

    /// Page number (starts at 0)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Field to sort by
    pub order_by: String,

    /// Ascending when true, descending otherwise
    pub asc: bool,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search: None,
            page: 0,
            limit: 10,
            order_by: "id".to_string(),
            asc: true,
        }
    }
}

impl QueryParams {
    /// Search term, if any
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// One page of results plus the total match count
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// The page's items
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    /// Wrap one page of items
    ///
    /// The total is counted separately from the fetch, so the two can
    /// disagree when records change in between; the total never drops below
    /// the number of items actually returned.
    pub fn new(data: Vec<T>, page: usize, limit: usize, total: usize) -> Self {
        let total = if total < data.len() {
            tracing::warn!(
                total,
                returned = data.len(),
                "record count is lower than the page size returned, adjusting"
            );
            data.len()
        } else {
            total
        };
        let pagination = PaginationMeta::new(page, limit, total);
        Self { data, pagination }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Current page number (starts at 0)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of matching items
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = page.saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 0,
        }
    }
}

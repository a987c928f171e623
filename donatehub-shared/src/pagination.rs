/// Pagination and list-query primitives
///
/// Every listing operation in DonateHub accepts the same page/limit/sort shape
/// and returns the same pagination envelope. This module owns that shape so
/// the clamping rules and the `totalPages` arithmetic live in exactly one
/// place, independent of the storage engine.
///
/// # Rules
///
/// - `limit` is clamped to `[1, 100]`
/// - `page` is clamped to `>= 1`
/// - `offset = (page - 1) * limit`
/// - `total_pages = ceil(total_items / limit)`
/// - `has_next` iff `current_page < total_pages`; `has_prev` iff `current_page > 1`
///
/// # Example
///
/// ```
/// use donatehub_shared::pagination::{PageParams, Pagination};
///
/// let params = PageParams::new(Some(2), Some(10));
/// assert_eq!(params.offset(), 10);
///
/// let pagination = Pagination::new(params.page, params.limit, 25);
/// assert_eq!(pagination.total_pages, 3);
/// assert!(pagination.has_next);
/// ```

use serde::{Deserialize, Serialize};

/// Maximum page size accepted from clients
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default page size when the client does not specify one
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Sort direction for listing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized page/limit pair
///
/// Build one with [`PageParams::new`] from raw (possibly absent, possibly
/// out-of-range) client input; the constructor applies the clamping rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number, always >= 1
    pub page: i64,

    /// Page size, always in [1, MAX_PAGE_LIMIT]
    pub limit: i64,
}

impl PageParams {
    /// Creates page params from raw client input, clamping to valid ranges
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        Self { page, limit }
    }

    /// Number of rows to skip for this page
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination envelope returned alongside every listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The page that was returned (1-based)
    pub current_page: i64,

    /// Total number of pages for this query
    pub total_pages: i64,

    /// Total number of matching items across all pages
    pub total_items: i64,

    /// Whether a later page exists
    pub has_next: bool,

    /// Whether an earlier page exists
    pub has_prev: bool,
}

impl Pagination {
    /// Computes the pagination envelope for a query result
    ///
    /// `total_items` is the unpaginated match count; `page`/`limit` are the
    /// already-clamped request values.
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + limit - 1) / limit
        };

        Self {
            current_page: page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// A page of items plus its pagination envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, params: PageParams, total_items: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(params.page, params.limit, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_params_clamping() {
        // page below 1 clamps up
        assert_eq!(PageParams::new(Some(0), None).page, 1);
        assert_eq!(PageParams::new(Some(-5), None).page, 1);

        // limit clamps into [1, 100]
        assert_eq!(PageParams::new(None, Some(0)).limit, 1);
        assert_eq!(PageParams::new(None, Some(1000)).limit, MAX_PAGE_LIMIT);
        assert_eq!(PageParams::new(None, Some(50)).limit, 50);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageParams::new(Some(1), Some(10)).offset(), 0);
        assert_eq!(PageParams::new(Some(2), Some(10)).offset(), 10);
        assert_eq!(PageParams::new(Some(3), Some(25)).offset(), 50);
    }

    #[test]
    fn test_pagination_law() {
        // 25 items, limit 10 -> 3 pages; page sizes sum back to 25
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let mut seen = 0;
        for page in 1..=p.total_pages {
            let on_page = std::cmp::min(10, 25 - (page - 1) * 10);
            seen += on_page;
        }
        assert_eq!(seen, 25);
    }

    #[test]
    fn test_pagination_boundaries() {
        // empty result set
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);

        // exact multiple of limit
        let p = Pagination::new(3, 10, 30);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_next);
        assert!(p.has_prev);

        // last page has_next false
        let p = Pagination::new(3, 10, 25);
        assert!(!p.has_next);
    }

    #[test]
    fn test_sort_order_sql() {
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }
}

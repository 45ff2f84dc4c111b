//! Paging of the purchase request list.
//!
//! The list endpoint takes `page` and `perPage` query parameters and answers
//! with the rows of that page plus a `meta` block describing the whole list.

use serde::{Deserialize, Serialize};

const FIRST_PAGE: u32 = 1;
const ROWS_PER_PAGE: u32 = 10;

/// Which slice of the request list to fetch.
///
/// Pages count from 1. Zero values are sent as 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page to fetch.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Rows shown on one page of the list.
    #[serde(default = "rows_per_page")]
    pub per_page: u32,
}

const fn first_page() -> u32 {
    FIRST_PAGE
}

const fn rows_per_page() -> u32 {
    ROWS_PER_PAGE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            per_page: ROWS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Index of the first row of the page within the whole list.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// `page` and `perPage` query parameters of the list call.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.max(FIRST_PAGE).to_string()),
            ("perPage", self.per_page.max(1).to_string()),
        ]
    }
}

/// Where a page sits in the request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Page these rows belong to.
    pub page: u32,
    /// Page size the backend applied.
    pub per_page: u32,
    /// Requests matching the filter, over all pages.
    pub total: u64,
    /// Number of pages; an empty list still has one.
    pub total_pages: u32,
}

impl PageMeta {
    /// Describes page `page` of a list of `total` rows.
    #[must_use]
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let pages = total.div_ceil(u64::from(per_page.max(1))).max(1);
        Self {
            page,
            per_page,
            total,
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }
}

/// One page of the request list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Rows of this page.
    pub data: Vec<T>,
    /// Position of the page.
    pub meta: PageMeta,
}

impl<T> PageResponse<T> {
    /// Wraps the rows of page `page` of a list of `total` rows.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(page, per_page, total),
        }
    }

    /// Returns true if the list continues past this page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.meta.page < self.meta.total_pages
    }
}

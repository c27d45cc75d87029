// src/pagination.rs
//! Page-count arithmetic shared by real upstream totals and synthetic
//! fallback totals.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Validated `(page, page_size)` pair for one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Result<Self, FetchError> {
        if page == 0 {
            return Err(FetchError::InvalidInput("page must be >= 1".into()));
        }
        if page_size == 0 {
            return Err(FetchError::InvalidInput("pageSize must be >= 1".into()));
        }
        Ok(Self { page, page_size })
    }

    /// Parse from raw query values (signed, so that `-1` is reported as
    /// invalid input rather than a decode failure). `None` takes the default.
    pub fn from_query(
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
    ) -> Result<Self, FetchError> {
        let page = parse_positive("page", page, 1)?;
        let page_size = parse_positive("pageSize", page_size, default_page_size)?;
        Self::new(page, page_size)
    }

    /// Zero-based index of the first item on this page.
    pub fn start_index(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: u32) -> Result<u32, FetchError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(default);
    };
    let v: i64 = raw
        .parse()
        .map_err(|_| FetchError::InvalidInput(format!("{name} must be an integer, got '{raw}'")))?;
    if v < 1 {
        return Err(FetchError::InvalidInput(format!("{name} must be >= 1, got {v}")));
    }
    u32::try_from(v).map_err(|_| FetchError::InvalidInput(format!("{name} is too large")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub page_size: u32,
    /// Provider-reported count. The aggregator raises it when the provider
    /// under-reports relative to the articles already served.
    pub total_results: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationInfo {
    pub fn next_page(&self) -> Option<u32> {
        self.has_next_page.then(|| self.current_page + 1)
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev_page.then(|| self.current_page - 1)
    }

    /// Page numbers shown by a pagination strip: `1..=total_pages`.
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.total_pages
    }
}

/// Derive pagination metadata. Total for every input: a zero page size or
/// requested page is treated as 1.
pub fn paginate(total_results: u32, page_size: u32, requested_page: u32) -> PaginationInfo {
    let page_size = page_size.max(1);
    let total_pages = total_results.div_ceil(page_size).max(1);
    let current_page = requested_page.clamp(1, total_pages);

    PaginationInfo {
        current_page,
        page_size,
        total_results,
        total_pages,
        has_next_page: current_page < total_pages,
        has_prev_page: current_page > 1,
    }
}

//! Page estimation for search endpoints that may not report a total count.
//!
//! The first request asks for exactly one page. If the response carries a total it
//! is used as-is. Otherwise the same offset is requested again with one extra
//! record: the extra record only proves a next page exists, it is never shown.

use serde_json::Value;
use shared::PageResult;
use std::future::Future;

use crate::error::ApiError;
use crate::fields::{FieldPath, key, to_count};

/// Total-count field names, highest priority first.
pub const TOTAL_FIELDS: [FieldPath; 7] = [
    key("total"),
    key("Total"),
    key("count"),
    key("total_count"),
    key("TotalCount"),
    key("totalItems"),
    key("TotalItems"),
];

/// Reported total, if any. `0` is a real total, distinct from "not reported".
pub fn pick_total(raw: &Value) -> Option<u64> {
    TOTAL_FIELDS
        .iter()
        .filter_map(|path| path.get(raw))
        .find_map(to_count)
}

/// Largest page size sent to a backend; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Pages are 1-based; page size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// What a single search request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

/// Fetches one page through `fetch(offset, limit)`, overfetching when no total is reported.
pub async fn fetch_page<T, F, Fut>(request: PageRequest, mut fetch: F) -> Result<PageResult<T>, ApiError>
where
    F: FnMut(u64, u32) -> Fut,
    Fut: Future<Output = Result<RawPage<T>, ApiError>>,
{
    let offset = request.offset();
    let page_size = request.page_size as usize;

    let first = fetch(offset, request.page_size).await?;
    if let Some(total) = first.total {
        let mut items = first.items;
        items.truncate(page_size);
        let has_next = offset + (items.len() as u64) < total;
        return Ok(PageResult {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
            has_next,
            total_is_exact: true,
        });
    }

    let overfetch = request.page_size.saturating_add(1);
    log::debug!(
        "No total reported at offset {}, overfetching {} records",
        offset,
        overfetch
    );
    let over = fetch(offset, overfetch).await?;
    let has_next = over.items.len() > page_size;
    let mut items = over.items;
    items.truncate(page_size);

    let total = if has_next {
        offset + u64::from(request.page_size) + 1
    } else {
        offset + items.len() as u64
    };

    Ok(PageResult {
        items,
        page: request.page,
        page_size: request.page_size,
        total,
        has_next,
        total_is_exact: !has_next,
    })
}

use serde::{Deserialize, Serialize};

/// Cursor metadata for one page of a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: usize,
    /// 1-based current page, already clamped to `1..=page_count`.
    pub page: usize,
    pub page_count: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageInfo {
    #[must_use]
    pub fn new(total: usize, page: usize, page_size: usize) -> PageInfo {
        let count = page_count(total, page_size);
        let page = page.clamp(1, count.max(1));
        PageInfo {
            total,
            page,
            page_count: count,
            has_prev: page > 1,
            has_next: page < count,
        }
    }
}

/// `ceil(total / page_size)`; zero results make zero pages.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

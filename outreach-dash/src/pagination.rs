//! Page arithmetic for paged dashboard lists

/// Timeline entries per page ("View more" step)
pub const TIMELINE_PAGE_SIZE: i64 = 5;

/// Sanitized page position within a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    /// Index of the first item on this page
    pub offset: i64,
}

impl Pagination {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Clamp `requested_page` into `[1, total_pages]` and compute its offset
///
/// ```
/// use outreach_dash::pagination::calculate_pagination;
///
/// // 12 entries at 5 per page = 3 pages (5 + 5 + 2)
/// let p = calculate_pagination(12, 2, 5);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 5);
///
/// let p = calculate_pagination(12, 99, 5);
/// assert_eq!(p.page, 3);
/// ```
pub fn calculate_pagination(total_items: i64, requested_page: i64, page_size: i64) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = (total_items.max(0) + page_size - 1) / page_size;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        page_size,
        total_pages,
        offset,
    }
}

use serde::Serialize;

/// Page size used by the JSON list endpoints.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.per_page
    }
}

/// A page of items plus what templates need to render page links.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub previous_page: Option<usize>,
    pub next_page: Option<usize>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_pages: usize) -> Self {
        let page = page.max(1);
        Self {
            items,
            page,
            total_pages,
            previous_page: (page > 1).then(|| page - 1),
            next_page: (page < total_pages).then(|| page + 1),
        }
    }

    /// Build a page from a total row count and a page size.
    pub fn from_total(items: Vec<T>, page: usize, total: usize, per_page: usize) -> Self {
        Self::new(items, page, total.div_ceil(per_page.max(1)))
    }
}

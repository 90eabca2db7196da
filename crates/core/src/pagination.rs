//! Fixed-size page windows over an ordered collection.

use serde::Serialize;

/// Products per page in the listing grid.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Slice out 1-based `page` of `size` items: `[(page-1)*size, page*size)`.
///
/// Page 0 is treated as page 1. Pages past the end, and a zero `size`, yield
/// an empty window.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(size);
    let end = start.saturating_add(size).min(items.len());
    items.get(start..end).unwrap_or_default()
}

/// Number of pages needed for `total` items, never less than one.
#[must_use]
pub fn total_pages(total: usize, size: usize) -> usize {
    if size == 0 {
        return 1;
    }
    total.div_ceil(size).max(1)
}

/// One page of a listing plus what navigation controls need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T: Clone> Page<T> {
    /// Cut page `page` out of `items`.
    #[must_use]
    pub fn new(items: &[T], page: usize, size: usize) -> Self {
        let current_page = page.max(1);
        let total_pages = total_pages(items.len(), size);

        Self {
            items: paginate(items, current_page, size).to_vec(),
            current_page,
            total_pages,
            total_items: items.len(),
            page_size: size,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

impl<T> Page<T> {
    /// Transform the items, keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            page_size: self.page_size,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

//! Pagination engine

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page sizes offered by the grid
///
/// `All` is turned into the current item count when a page is computed, so
/// it follows the data as it grows or shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    Entries(usize),
    All,
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Entries(DEFAULT_PAGE_SIZE)
    }
}

impl PageSize {
    /// Concrete size for `len` items, never zero
    pub fn resolve(&self, len: usize) -> usize {
        match self {
            PageSize::Entries(n) => (*n).max(1),
            PageSize::All => len.max(1),
        }
    }
}

/// One page of an ordered sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    /// 0-based, inclusive
    pub start_index: usize,
    /// exclusive
    pub end_index: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// "Showing X to Y of Z entries"
    pub fn range_label(&self) -> (usize, usize, usize) {
        let first = if self.total_items == 0 {
            0
        } else {
            self.start_index + 1
        };
        (first, self.end_index, self.total_items)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Clamp a 1-based page request into `[1, total_pages]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

pub fn paginate<T: Clone>(items: &[T], page_size: PageSize, page: usize) -> Page<T> {
    let size = page_size.resolve(items.len());
    let total_pages = total_pages(items.len(), size);
    let current_page = clamp_page(page, total_pages);
    let start_index = ((current_page - 1) * size).min(items.len());
    let end_index = (start_index + size).min(items.len());

    Page {
        items: items[start_index..end_index].to_vec(),
        current_page,
        total_pages,
        start_index,
        end_index,
        total_items: items.len(),
    }
}

/// Entry in the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Number(usize),
    Ellipsis,
}

/// First, last, current and its neighbours, with gaps marked
pub fn page_window(current: usize, total: usize) -> Vec<PageLink> {
    let total = total.max(1);
    let current = clamp_page(current, total);

    let shown: Vec<usize> = (1..=total)
        .filter(|&p| p == 1 || p == total || p.abs_diff(current) <= 1)
        .collect();

    let mut links = Vec::with_capacity(shown.len() * 2);
    let mut previous = 0;
    for page in shown {
        if previous != 0 && page > previous + 1 {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Number(page));
        previous = page;
    }
    links
}

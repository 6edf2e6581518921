//! Page slicing and the sliding window of page-number buttons.

use serde::{Deserialize, Serialize};

/// Number of page buttons shown around the current page.
pub const DEFAULT_WINDOW: usize = 3;

/// Items per page when a collection does not configure its own size.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Current page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
}

impl PageState {
    /// `page_size` of zero is bumped to one; a page always holds something.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to `page` when it lies in `1..=total_pages`. Returns whether
    /// the page changed state.
    pub fn go_to(&mut self, page: usize, total_pages: usize) -> bool {
        if page < 1 || page > total_pages {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Snaps the current page into `1..=total_pages`.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current_page = self.current_page.clamp(1, total_pages.max(1));
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.page_size)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// `max(1, ceil(total_items / page_size))`.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Contiguous run of at most `window` page numbers centred on `current`.
pub fn visible_page_numbers(current: usize, total_pages: usize, window: usize) -> Vec<usize> {
    let total_pages = total_pages.max(1);
    let window = window.max(1);
    if total_pages <= window {
        return (1..=total_pages).collect();
    }

    let current = current.clamp(1, total_pages) as isize;
    let window = window as isize;
    let total = total_pages as isize;

    let mut start = current - window / 2;
    let mut end = start + window - 1;
    if start < 1 {
        start = 1;
        end = window;
    }
    if end > total {
        end = total;
        start = total - window + 1;
    }
    let start = start.max(1);

    (start as usize..=end as usize).collect()
}

/// Render-ready slice of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub visible_pages: Vec<usize>,
    pub has_previous: bool,
    pub has_next: bool,
    /// 1-based index of the first item shown; 0 when the page is empty.
    pub first_item_index: usize,
    /// 1-based index of the last item shown; 0 when the page is empty.
    pub last_item_index: usize,
}

impl<T> PageView<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageView<U> {
        PageView {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            visible_pages: self.visible_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
            first_item_index: self.first_item_index,
            last_item_index: self.last_item_index,
        }
    }
}

/// Stateless paginator parameterised by the button window width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    window: usize,
}

impl Pager {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Slices `results` for `state`. Out-of-range pages yield an empty slice.
    pub fn paginate<T: Clone>(&self, results: &[T], state: &PageState) -> PageView<T> {
        let total_items = results.len();
        let total_pages = total_pages(total_items, state.page_size());
        let current_page = state.current_page();

        let start = (current_page - 1).saturating_mul(state.page_size());
        let end = start.saturating_add(state.page_size()).min(total_items);
        let items: Vec<T> = if start < total_items {
            results[start..end].to_vec()
        } else {
            Vec::new()
        };

        let (first_item_index, last_item_index) = if items.is_empty() {
            (0, 0)
        } else {
            (start + 1, start + items.len())
        };

        PageView {
            items,
            current_page,
            total_pages,
            total_items,
            visible_pages: visible_page_numbers(current_page, total_pages, self.window),
            has_previous: current_page > 1 && total_items > 0,
            has_next: current_page < total_pages,
            first_item_index,
            last_item_index,
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

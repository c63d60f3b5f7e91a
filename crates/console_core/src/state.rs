use console_api::{ListParams, QueryFilters};

use crate::view_model::PageView;

pub const FIRST_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Local replica of one page of a remote list, plus the search that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T, F> {
    items: Vec<T>,
    total: u64,
    current_page: u32,
    page_size: u32,
    filters: F,
    in_flight: usize,
    latest_request: u64,
    dirty: bool,
}

impl<T, F: Default> Default for PageState<T, F> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current_page: FIRST_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filters: F::default(),
            in_flight: 0,
            latest_request: 0,
            dirty: false,
        }
    }
}

impl<T, F> PageState<T, F> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Registers a new fetch and returns its ticket. Only the most recent
    /// ticket may write rows back.
    pub(crate) fn begin_load(&mut self) -> u64 {
        self.in_flight += 1;
        self.latest_request += 1;
        self.dirty = true;
        self.latest_request
    }

    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        ticket == self.latest_request
    }

    pub(crate) fn end_load(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dirty = true;
    }

    /// Replaces the page contents. Rows beyond the page size are dropped.
    pub(crate) fn replace_page(&mut self, mut items: Vec<T>, total: u64) -> usize {
        let limit = self.page_size as usize;
        let dropped = items.len().saturating_sub(limit);
        items.truncate(limit);
        self.items = items;
        self.total = total;
        self.dirty = true;
        dropped
    }

    /// Drops the first row matching `is_target` and shrinks the total by one.
    pub(crate) fn remove_one(&mut self, is_target: impl Fn(&T) -> bool) -> bool {
        let removed = match self.items.iter().position(is_target) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        };
        self.total = self.total.saturating_sub(1);
        self.dirty = true;
        removed
    }
}

impl<T: Clone, F: QueryFilters> PageState<T, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PageView<T, F> {
        PageView {
            items: self.items.clone(),
            total: self.total,
            current_page: self.current_page,
            page_size: self.page_size,
            filters: self.filters.clone(),
            loading: self.is_loading(),
        }
    }

    /// Folds a fetch request into the persisted search and returns the
    /// parameters to send.
    pub(crate) fn merge_search(
        &mut self,
        page_num: Option<u32>,
        page_size: Option<u32>,
        filters: F,
    ) -> ListParams<F> {
        if let Some(page_num) = page_num {
            self.current_page = page_num;
        }
        match page_size {
            Some(0) => self.page_size = DEFAULT_PAGE_SIZE,
            Some(page_size) => self.page_size = page_size,
            None => {}
        }
        self.filters.merge_from(filters);
        self.dirty = true;
        ListParams::new(self.current_page, self.page_size, self.filters.clone())
    }

    pub(crate) fn reset_search(&mut self) {
        self.filters = F::default();
        self.current_page = FIRST_PAGE;
        self.dirty = true;
    }
}

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use console_api::TransportError;
use console_logging::{console_debug, console_warn};

use crate::{PageState, PageView, PagedResource};

/// Arguments of [`ListViewModel::fetch_data_list`].
///
/// Unset pagination keeps the current page/size; set filter fields overwrite
/// the persisted ones and unset fields keep their earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParams<F> {
    pub page_num: Option<u32>,
    pub page_size: Option<u32>,
    pub filters: F,
}

impl<F: Default> FetchParams<F> {
    pub fn page(page_num: u32) -> Self {
        Self {
            page_num: Some(page_num),
            ..Self::default()
        }
    }

    pub fn filtered(filters: F) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

type SharedState<R> =
    Mutex<PageState<<R as PagedResource>::Item, <R as PagedResource>::Filters>>;

/// Paginated, filterable list of one resource.
///
/// Clones share the same state, so a renderer can read `view()` while a fetch
/// is awaiting the backend.
pub struct ListViewModel<R: PagedResource> {
    resource: Arc<R>,
    state: Arc<SharedState<R>>,
}

impl<R: PagedResource> Clone for ListViewModel<R> {
    fn clone(&self) -> Self {
        Self {
            resource: Arc::clone(&self.resource),
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: PagedResource> ListViewModel<R> {
    pub fn new(resource: R) -> Self {
        Self::from_shared(Arc::new(resource))
    }

    pub fn from_shared(resource: Arc<R>) -> Self {
        Self {
            resource,
            state: Arc::new(Mutex::new(PageState::default())),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Merges `params` into the persisted search, requests that page and, if
    /// the reply carries an item array, replaces the local rows and total.
    ///
    /// A reply without an item array leaves the rows untouched, and so does a
    /// reply that arrives after a newer fetch was started. `loading` is
    /// cleared when this returns, fails or is dropped.
    pub async fn fetch_data_list(
        &self,
        params: FetchParams<R::Filters>,
    ) -> Result<(), TransportError> {
        let (ticket, request) = {
            let mut state = self.lock();
            let ticket = state.begin_load();
            let request = state.merge_search(params.page_num, params.page_size, params.filters);
            (ticket, request)
        };
        let _loading = LoadingGuard { state: &*self.state };

        let response = self.resource.list(&request).await?;

        let mut state = self.lock();
        if !state.is_latest(ticket) {
            console_debug!(
                "Discarding reply for page {}; a newer fetch is pending",
                request.page_num
            );
            return Ok(());
        }
        match response.data.list {
            Some(items) => {
                let count = items.len();
                let total = response.data.total.unwrap_or(0);
                let dropped = state.replace_page(items, total);
                if dropped > 0 {
                    console_warn!(
                        "List reply had {} rows for page size {}; dropped {}",
                        count,
                        request.page_size,
                        dropped
                    );
                }
                console_debug!(
                    "Loaded page {} ({} rows, total {})",
                    request.page_num,
                    count - dropped,
                    total
                );
            }
            None => {
                console_warn!(
                    "List reply for page {} carried no item array; keeping {} stale rows",
                    request.page_num,
                    state.items().len()
                );
            }
        }
        Ok(())
    }

    /// Deletes `id` remotely, then drops the row locally and shrinks the total.
    ///
    /// On failure the local rows are left as they were.
    pub async fn delete_data(&self, id: &R::Id) -> Result<(), TransportError> {
        self.resource.delete(id).await?;
        let removed = self.lock().remove_one(|item| R::item_id(item) == id);
        if !removed {
            console_debug!("Deleted row was not on the current page");
        }
        Ok(())
    }

    /// Clears every filter and goes back to the first page without fetching.
    pub fn reset_search_params(&self) {
        self.lock().reset_search();
    }

    pub fn data_list(&self) -> Vec<R::Item> {
        self.lock().items().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading()
    }

    pub fn total(&self) -> u64 {
        self.lock().total()
    }

    pub fn current_page(&self) -> u32 {
        self.lock().current_page()
    }

    pub fn page_size(&self) -> u32 {
        self.lock().page_size()
    }

    pub fn search_params(&self) -> R::Filters {
        self.lock().filters().clone()
    }

    pub fn view(&self) -> PageView<R::Item, R::Filters> {
        self.lock().view()
    }

    /// True once after any state change; lets a renderer skip idle frames.
    pub fn consume_dirty(&self) -> bool {
        self.lock().consume_dirty()
    }

    fn lock(&self) -> MutexGuard<'_, PageState<R::Item, R::Filters>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LoadingGuard<'a, T, F> {
    state: &'a Mutex<PageState<T, F>>,
}

impl<T, F> Drop for LoadingGuard<'_, T, F> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .end_load();
    }
}

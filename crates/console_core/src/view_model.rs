/// Read-only snapshot of a list view-model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T, F> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub filters: F,
    pub loading: bool,
}

impl<T, F> PageView<T, F> {
    /// Number of pages needed to show `total` rows; at least one.
    pub fn page_count(&self) -> u64 {
        let size = u64::from(self.page_size.max(1));
        self.total.div_ceil(size).max(1)
    }
}

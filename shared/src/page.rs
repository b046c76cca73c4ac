use serde::{Deserialize, Serialize};

/// One page of a paginated search.
///
/// `total` is either the count reported by the backend (`total_is_exact == true`)
/// or a soft lower bound estimated by overfetching one record. Consumers showing
/// "page X of Y" should render an inexact total as "at least".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub has_next: bool,
    pub total_is_exact: bool,
}

impl<T> PageResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts the items, dropping those `f` rejects. Paging metadata is kept as-is.
    pub fn filter_map_items<U>(self, f: impl FnMut(T) -> Option<U>) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().filter_map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            has_next: self.has_next,
            total_is_exact: self.total_is_exact,
        }
    }

    /// Pages needed to show `total` records. Only a lower bound when the total is soft.
    pub fn page_count(&self) -> u64 {
        let size = u64::from(self.page_size.max(1));
        self.total.div_ceil(size)
    }
}

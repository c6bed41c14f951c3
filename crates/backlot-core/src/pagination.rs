//! Pagination primitives
//!
//! List endpoints accept `page`/`perPage` query parameters; responses carry a
//! `meta` block derived from [`Paginated`].

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 25;
const MAX_PER_PAGE: i64 = 100;

/// Normalized paging parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageParams {
    /// Clamp page to >= 1 and perPage to 1..=100.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.normalized().per_page
    }

    pub fn offset(&self) -> i64 {
        let n = self.normalized();
        (n.page - 1) * n.per_page
    }
}

/// Pagination metadata serialized into list envelopes.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

/// A page of rows plus the total count behind it.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        let params = params.normalized();
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: if self.total == 0 {
                0
            } else {
                (self.total + self.per_page - 1) / self.per_page
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_page_one_per_page_twenty_five() {
        let params = PageParams::default();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn per_page_is_capped_at_one_hundred() {
        let params = PageParams { page: 1, per_page: 500 };
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn zero_and_negative_values_normalize() {
        let params = PageParams { page: 0, per_page: -3 };
        assert_eq!(params.normalized().page, 1);
        assert_eq!(params.normalized().per_page, 1);
    }

    #[test]
    fn offset_derives_from_page() {
        let params = PageParams { page: 3, per_page: 10 };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2, 3], 31, PageParams { page: 1, per_page: 10 });
        assert_eq!(page.meta().total_pages, 4);

        let empty = Paginated::<i32>::new(vec![], 0, PageParams::default());
        assert_eq!(empty.meta().total_pages, 0);
    }
}

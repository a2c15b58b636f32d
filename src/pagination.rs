use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `page`/`page_size` query parameters for list endpoints. Out-of-range
/// values are clamped, never rejected.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size", alias = "pageSize")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn clamped(self) -> Self {
        let page = if self.page < 1 { 1 } else { self.page };
        let page_size = if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        let p = self.clamped();
        (p.page - 1) * p.page_size
    }

    pub fn limit(&self) -> i64 {
        self.clamped().page_size
    }
}

/// Response envelope for paginated lists.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, params: PageParams) -> Self {
        let params = params.clamped();
        // clamped() keeps page_size >= 1, but guard the division anyway
        let page_size = if params.page_size > 0 {
            params.page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        let total_pages = (total + page_size - 1) / page_size;
        Self {
            data,
            total,
            page: params.page,
            page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, page_size: i64) -> PageParams {
        PageParams { page, page_size }
    }

    #[test]
    fn out_of_range_params_are_clamped_to_defaults() {
        let p = params(0, 0).clamped();
        assert_eq!((p.page, p.page_size), (1, 10));

        let p = params(-3, 101).clamped();
        assert_eq!((p.page, p.page_size), (1, 10));

        let p = params(2, 100).clamped();
        assert_eq!((p.page, p.page_size), (2, 100));
    }

    #[test]
    fn offset_is_page_minus_one_times_size() {
        assert_eq!(params(1, 10).offset(), 0);
        assert_eq!(params(3, 25).offset(), 50);
        assert_eq!(params(0, 0).offset(), 0);
    }

    #[test]
    fn total_pages_is_ceil_of_total_over_page_size() {
        let page = Page::new(vec![1, 2, 3], 3, params(1, 10));
        assert_eq!(page.total_pages, 1);

        let page = Page::<i32>::new(vec![], 21, params(1, 10));
        assert_eq!(page.total_pages, 3);

        let page = Page::<i32>::new(vec![], 20, params(1, 10));
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn zero_total_means_zero_pages() {
        let page = Page::<i32>::new(vec![], 0, params(1, 10));
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn zero_page_size_does_not_divide_by_zero() {
        let page = Page::<i32>::new(vec![], 15, params(1, 0));
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn page_size_alias_is_accepted() {
        let p: PageParams = serde_json::from_str(r#"{"page": 2, "pageSize": 50}"#).unwrap();
        assert_eq!((p.page, p.page_size), (2, 50));

        let p: PageParams = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!((p.page, p.page_size), (1, 10));
    }
}

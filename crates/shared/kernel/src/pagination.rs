//! Page window arithmetic for list endpoints.

use crate::params::QueryParams;

#[pdl_derive::pdl_error]
pub enum PaginationError {
    #[error("expected :page in 1..{pages}; got {page}")]
    Overflow { page: u64, pages: u64 },
}

/// One page of a counted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub count: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
    pub offset: u64,
    pub next: Option<u64>,
    pub prev: Option<u64>,
}

impl PageWindow {
    /// `page` and `limit` below 1 are raised to 1; an empty collection still has one page.
    ///
    /// # Errors
    /// [`PaginationError::Overflow`] when `page` is past the last page.
    pub fn new(count: u64, limit: u64, page: u64) -> Result<Self, PaginationError> {
        let limit = limit.max(1);
        let page = page.max(1);
        let pages = count.div_ceil(limit).max(1);
        if page > pages {
            return Err(PaginationError::Overflow { page, pages });
        }

        Ok(Self {
            count,
            page,
            limit,
            pages,
            offset: (page - 1) * limit,
            next: (page < pages).then_some(page + 1),
            prev: (page > 1).then_some(page - 1),
        })
    }
}

/// Requested page and page size, before the total is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Reads `page` / `per_page`: a blank or non-positive size falls back to `default`,
    /// larger sizes are capped at `max`, and pages below 1 become 1.
    #[must_use]
    pub fn from_params(params: &QueryParams, default: u64, max: u64) -> Self {
        Self::read(params, "page", "per_page", default, max, 1)
    }

    /// Shared parser for the v1 and LDA parameter styles. `first_page` is 1 for 1-based
    /// page numbers and 0 for LDA's `_page`; the returned page is always 1-based.
    #[must_use]
    pub fn read(
        params: &QueryParams,
        page_name: &str,
        size_name: &str,
        default: u64,
        max: u64,
        first_page: i64,
    ) -> Self {
        let per_page = params
            .present(size_name)
            .map(crate::params::parse_leading_int)
            .and_then(|size| u64::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(default)
            .min(max);

        let requested = params.int(page_name).unwrap_or(first_page).max(first_page);
        let page = u64::try_from(requested - first_page).unwrap_or(0) + 1;

        Self { page, per_page }
    }

    /// # Errors
    /// See [`PageWindow::new`].
    pub fn paginate(self, count: u64) -> Result<PageWindow, PaginationError> {
        PageWindow::new(count, self.per_page, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_collection_has_one_page() {
        let window = PageWindow::new(0, 20, 1).unwrap();
        assert_eq!(window.pages, 1);
        assert_eq!(window.offset, 0);
        assert_eq!(window.next, None);
        assert_eq!(window.prev, None);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let window = PageWindow::new(95, 20, 3).unwrap();
        assert_eq!(window.pages, 5);
        assert_eq!(window.offset, 40);
        assert_eq!(window.next, Some(4));
        assert_eq!(window.prev, Some(2));
    }

    #[test]
    fn overflow_names_the_valid_range() {
        let err = PageWindow::new(30, 20, 7).unwrap_err();
        assert_eq!(err.to_string(), "expected :page in 1..2; got 7");
    }

    #[test]
    fn v1_parameters_are_normalised() {
        let request = PageRequest::from_params(&QueryParams::parse("page=-2&per_page=0"), 20, 250);
        assert_eq!(request, PageRequest { page: 1, per_page: 20 });

        let request = PageRequest::from_params(&QueryParams::parse("page=3x&per_page=900"), 20, 250);
        assert_eq!(request, PageRequest { page: 3, per_page: 250 });

        let request = PageRequest::from_params(&QueryParams::parse("per_page=abc"), 20, 250);
        assert_eq!(request.per_page, 20);
    }

    #[test]
    fn zero_based_pages_are_shifted() {
        let params = QueryParams::parse("_page=2&_pageSize=5");
        let request = PageRequest::read(&params, "_page", "_pageSize", 10, 500, 0);
        assert_eq!(request, PageRequest { page: 3, per_page: 5 });

        let params = QueryParams::parse("_page=-4");
        let request = PageRequest::read(&params, "_page", "_pageSize", 10, 500, 0);
        assert_eq!(request, PageRequest { page: 1, per_page: 10 });
    }

    proptest! {
        #[test]
        fn in_range_pages_cover_the_collection(count in 0u64..10_000, limit in 1u64..300, page in 1u64..60) {
            match PageWindow::new(count, limit, page) {
                Ok(window) => {
                    prop_assert!(window.page <= window.pages);
                    prop_assert!(window.pages >= 1);
                    prop_assert!(count == 0 || window.offset < count);
                    prop_assert_eq!(window.next.is_some(), window.page < window.pages);
                    prop_assert_eq!(window.prev.is_some(), window.page > 1);
                    prop_assert!((window.pages - 1) * limit < count.max(1));
                },
                Err(PaginationError::Overflow { page: p, pages }) => {
                    prop_assert_eq!(p, page);
                    prop_assert!(page > pages);
                },
            }
        }

        #[test]
        fn parsed_sizes_stay_in_bounds(raw in "-?[0-9]{0,6}[a-z]{0,2}") {
            let params = QueryParams::from_pairs([("per_page", raw.as_str()), ("page", raw.as_str())]);
            let request = PageRequest::from_params(&params, 20, 250);
            prop_assert!((1..=250).contains(&request.per_page));
            prop_assert!(request.page >= 1);
        }
    }
}

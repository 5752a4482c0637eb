//! View state for one paginated table.
//!
//! DESIGN
//! ======
//! A page asks [`ListState::start`] for the page number to fetch, sends the
//! request, and hands the result to [`ListState::settle`]. Rows and
//! pagination only change on success; a failure leaves the previous page on
//! screen. When a refetch after a delete comes back empty past the new end of
//! the list, `settle` answers [`ListOutcome::StepBack`] with the last page
//! that still has rows and the caller fetches that instead.
//!
//! There is no cancellation. If the operator clicks through pages quickly,
//! whichever response settles last is shown, labelled with the page the
//! server says it is. [`load_settled`] drives the fetch and step-back loop.

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

use std::future::Future;

use schema::{PageResponse, Pagination};

use crate::error::ApiError;

/// What the caller should do after [`ListState::settle`].
#[derive(Debug)]
pub enum ListOutcome {
    /// The response is now on screen.
    Shown,
    /// The requested page is past the end; fetch this page instead.
    StepBack(u32),
    /// Nothing changed; show a notification.
    Failed(ApiError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
    pub loading: bool,
    requested: Option<u32>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self { rows: Vec::new(), pagination: Pagination::default(), loading: false, requested: None }
    }
}

impl<T> ListState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch of `page` as outstanding and return the page to request.
    pub fn start(&mut self, page: u32) -> u32 {
        let page = page.max(1);
        self.loading = true;
        self.requested = Some(page);
        page
    }

    /// Page to reload after a mutation: the one currently shown.
    #[must_use]
    pub fn refetch_page(&self) -> u32 {
        self.pagination.current
    }

    /// Page whose fetch is outstanding, if any.
    #[must_use]
    pub fn requested(&self) -> Option<u32> {
        self.requested
    }

    /// Apply a finished fetch.
    ///
    /// The page number shown is the one the server answered for, so a stale
    /// response that settles last is displayed under its own page.
    pub fn settle(&mut self, result: Result<PageResponse<T>, ApiError>) -> ListOutcome {
        self.requested = None;
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.loading = false;
                return ListOutcome::Failed(err);
            }
        };

        let pagination = response.pagination();
        let last_page = pagination.last_page();
        if response.data.is_empty() && pagination.current > last_page {
            self.requested = Some(last_page);
            return ListOutcome::StepBack(last_page);
        }

        self.rows = response.data;
        self.pagination = pagination;
        self.loading = false;
        ListOutcome::Shown
    }
}

/// Fetch `page` and hand each response to `settle`, following step-backs
/// until a page is shown or a fetch fails.
///
/// `settle` returns `None` when the list it feeds is gone; the loop then
/// stops without fetching again.
pub async fn load_settled<T, F, Fut, S>(mut page: u32, fetch: F, mut settle: S) -> Option<ListOutcome>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<PageResponse<T>, ApiError>>,
    S: FnMut(Result<PageResponse<T>, ApiError>) -> Option<ListOutcome>,
{
    loop {
        match settle(fetch(page).await)? {
            ListOutcome::StepBack(target) => page = target,
            outcome => return Some(outcome),
        }
    }
}

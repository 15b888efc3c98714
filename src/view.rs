//! Per-view fetch state: pagination bookkeeping plus stale-response
//! sequencing.
//!
//! Only the most recent request for a view may update its state. Every
//! outgoing fetch takes a tag from the view; a response is applied only if
//! its tag is still the newest, so a slow page-2 response cannot overwrite a
//! later page-3 result, and a response for a dismissed view is discarded.

use crate::model::Pagination;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTag(u64);

/// State holder for one paginated list on screen.
#[derive(Clone, Debug)]
pub struct ListView<T> {
    items: Vec<T>,
    pagination: Option<Pagination>,
    page: u32,
    latest: u64,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: None,
            page: 1,
            latest: 0,
        }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page the next fetch should request.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn has_next(&self) -> bool {
        self.pagination.as_ref().is_some_and(Pagination::has_next)
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.as_ref().is_some_and(Pagination::has_prev)
    }

    /// Begin a fetch for the current page, superseding any in-flight one.
    pub fn begin_fetch(&mut self) -> RequestTag {
        self.latest += 1;
        RequestTag(self.latest)
    }

    /// Advance to the next page and begin its fetch. No-op tag reuse is not
    /// possible: callers only move when `has_next()` holds.
    pub fn begin_next_page(&mut self) -> Option<RequestTag> {
        if !self.has_next() {
            return None;
        }
        self.page += 1;
        Some(self.begin_fetch())
    }

    pub fn begin_prev_page(&mut self) -> Option<RequestTag> {
        if !self.has_prev() {
            return None;
        }
        self.page -= 1;
        Some(self.begin_fetch())
    }

    /// Apply a completed fetch. Returns false (and changes nothing) when a
    /// newer fetch for this view has since been issued.
    pub fn apply(&mut self, tag: RequestTag, items: Vec<T>, pagination: Option<Pagination>) -> bool {
        if tag.0 != self.latest {
            return false;
        }
        if let Some(p) = &pagination {
            self.page = p.page;
        }
        self.items = items;
        self.pagination = pagination;
        true
    }

    /// Reset to page 1 with nothing loaded (view dismissed or re-entered).
    /// Outstanding tags from before the reset are stale afterwards.
    pub fn reset(&mut self) {
        self.items.clear();
        self.pagination = None;
        self.page = 1;
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(page: u32, next: Option<u32>) -> Pagination {
        Pagination {
            page,
            pages: 3,
            next,
            prev: if page > 1 { Some(page - 1) } else { None },
            count: None,
            items: None,
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut view: ListView<&str> = ListView::new();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        // The slow first response arrives after the second was issued.
        assert!(!view.apply(first, vec!["old"], Some(meta(1, Some(2)))));
        assert!(view.items().is_empty());

        assert!(view.apply(second, vec!["new"], Some(meta(1, Some(2)))));
        assert_eq!(view.items(), &["new"]);
    }

    #[test]
    fn pagination_controls_follow_metadata() {
        let mut view: ListView<u8> = ListView::new();
        let tag = view.begin_fetch();
        view.apply(tag, vec![1, 2], Some(meta(2, Some(3))));
        assert!(view.has_prev());
        assert!(view.has_next());

        let tag = view.begin_next_page().expect("next enabled");
        assert_eq!(view.page(), 3);
        view.apply(tag, vec![3], Some(meta(3, None)));
        assert!(!view.has_next());
        assert!(view.begin_next_page().is_none());
    }

    #[test]
    fn reset_invalidates_outstanding_tags() {
        let mut view: ListView<u8> = ListView::new();
        let tag = view.begin_fetch();
        view.reset();
        assert!(!view.apply(tag, vec![9], None));
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn prev_from_first_page_is_disabled() {
        let mut view: ListView<u8> = ListView::new();
        let tag = view.begin_fetch();
        view.apply(tag, vec![1], Some(meta(1, Some(2))));
        assert!(view.begin_prev_page().is_none());
    }
}

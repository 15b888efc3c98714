use serde::{Deserialize, Serialize};

/// Server-supplied position of a list response within the full result set.
///
/// Only `page` and `next` drive client behavior; the rest is carried for
/// display and JSON output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,

    #[serde(default)]
    pub next: Option<u32>,

    #[serde(default)]
    pub prev: Option<u32>,

    #[serde(default)]
    pub count: Option<u64>,

    #[serde(default)]
    pub items: Option<u32>,
}

impl Pagination {
    /// A next page exists iff the server reported one.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// A previous page exists iff we are past the first page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn summary(&self) -> String {
        format!("page {} of {}", self.page, self.pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(page: u32, pages: u32, next: Option<u32>) -> Pagination {
        Pagination {
            page,
            pages,
            next,
            prev: if page > 1 { Some(page - 1) } else { None },
            count: None,
            items: None,
        }
    }

    #[test]
    fn middle_page_enables_both_directions() {
        let p = meta(2, 3, Some(3));
        assert!(p.has_prev());
        assert!(p.has_next());
    }

    #[test]
    fn last_page_disables_next() {
        let p = meta(3, 3, None);
        assert!(p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn first_page_disables_prev() {
        let p = meta(1, 3, Some(2));
        assert!(!p.has_prev());
        assert!(p.has_next());
    }

    #[test]
    fn null_next_parses_as_none() {
        let p: Pagination =
            serde_json::from_str(r#"{"page":3,"pages":3,"next":null,"prev":2}"#).unwrap();
        assert!(!p.has_next());
        assert_eq!(p.prev, Some(2));
    }
}

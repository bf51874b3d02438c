//! # API Route Modules
//!
//! Route modules for the catalog API surface:
//!
//! - `floors` — floor listings: expositions on a floor with exhibit counts,
//!   gated by the floor visibility rule.
//! - `expositions` — exposition listing (exhibits within) and admin curation
//!   (create/update/delete with storage re-parenting).
//! - `exhibits` — exhibit detail and admin curation.
//! - `profile` — own-profile editing and public profile views.
//! - `pages` — static informational pages (index/about/rules).
//!
//! All listing endpoints paginate with a fixed page size of 10 and a 1-based
//! `page` query parameter.

use serde::Deserialize;
use utoipa::IntoParams;

pub mod exhibits;
pub mod expositions;
pub mod floors;
pub mod pages;
pub mod profile;

/// Fixed page size for all listing endpoints.
pub const PAGE_SIZE: usize = 10;

/// Query parameters shared by paginated listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number. Defaults to 1; values past the end yield an
    /// empty page, not an error.
    pub page: Option<u32>,
}

impl PageQuery {
    /// The effective 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Slice a sorted result set into the requested page.
///
/// Returns the page's items and the total item count (before slicing).
pub fn paginate<T>(items: Vec<T>, page: u32) -> (Vec<T>, usize) {
    let total = items.len();
    let start = (page as usize - 1).saturating_mul(PAGE_SIZE);
    let page_items = items.into_iter().skip(start).take(PAGE_SIZE).collect();
    (page_items, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_fixed_pages() {
        let items: Vec<u32> = (0..25).collect();
        let (first, total) = paginate(items.clone(), 1);
        assert_eq!(total, 25);
        assert_eq!(first, (0..10).collect::<Vec<_>>());

        let (third, _) = paginate(items.clone(), 3);
        assert_eq!(third, (20..25).collect::<Vec<_>>());

        let (past_end, total) = paginate(items, 4);
        assert_eq!(total, 25);
        assert!(past_end.is_empty());
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(PageQuery { page: None }.page(), 1);
        assert_eq!(PageQuery { page: Some(0) }.page(), 1);
        assert_eq!(PageQuery { page: Some(7) }.page(), 7);
    }
}

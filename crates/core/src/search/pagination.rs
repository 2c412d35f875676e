//! Parameter normalization and result windowing.
//!
//! Requests carry signed integers so that zero and negative values can be
//! normalized to defaults rather than rejected.

use crate::config;

/// A 1-based page of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub limit: usize,
}

impl PageWindow {
    /// `page <= 0` becomes 1, `limit <= 0` becomes [`config::DEFAULT_LIMIT`].
    pub fn normalize(page: i64, limit: i64) -> Self {
        Self {
            page: if page <= 0 {
                config::DEFAULT_PAGE
            } else {
                page as usize
            },
            limit: if limit <= 0 {
                config::DEFAULT_LIMIT
            } else {
                limit as usize
            },
        }
    }

    /// Index of the first item on this page.
    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Keeps `items[start .. start + limit]`; empty when `start` is past the end.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.start())
            .take(self.limit)
            .collect()
    }
}

/// `top_k <= 0` becomes [`config::DEFAULT_TOP_K`].
pub fn normalize_top_k(top_k: i64) -> usize {
    if top_k <= 0 {
        config::DEFAULT_TOP_K
    } else {
        top_k as usize
    }
}

/// Normalizes list parameters: `limit <= 0` becomes [`config::DEFAULT_LIMIT`],
/// `offset < 0` becomes 0. Returns `(limit, offset)`.
pub fn normalize_list(limit: i64, offset: i64) -> (usize, usize) {
    let limit = if limit <= 0 {
        config::DEFAULT_LIMIT
    } else {
        limit as usize
    };
    (limit, offset.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        assert_eq!(
            PageWindow::normalize(0, -3),
            PageWindow { page: 1, limit: 10 }
        );
        assert_eq!(
            PageWindow::normalize(3, 5),
            PageWindow { page: 3, limit: 5 }
        );
        assert_eq!(normalize_top_k(0), 10);
        assert_eq!(normalize_top_k(-1), 10);
        assert_eq!(normalize_top_k(2), 2);
        assert_eq!(normalize_list(0, -4), (10, 0));
        assert_eq!(normalize_list(25, 7), (25, 7));
    }

    #[test]
    fn test_apply_windows() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(PageWindow::normalize(1, 10).apply(items.clone()).len(), 10);
        assert_eq!(
            PageWindow::normalize(3, 10).apply(items.clone()),
            (20..25).collect::<Vec<_>>()
        );
        assert!(PageWindow::normalize(4, 10).apply(items.clone()).is_empty());
    }

    #[test]
    fn test_apply_huge_page_does_not_overflow() {
        let window = PageWindow::normalize(i64::MAX, i64::MAX);
        assert!(window.apply(vec![1, 2, 3]).is_empty());
    }
}

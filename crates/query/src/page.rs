//! Pagination window.

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// An `(offset, limit)` window over filtered, sorted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Rows to skip
    pub offset: usize,
    /// Maximum rows to return
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Window for zero-based page `index` of `size` rows.
    pub fn page(index: usize, size: usize) -> Self {
        Self {
            offset: index.saturating_mul(size),
            limit: size,
        }
    }

    /// First page of `size` rows.
    pub fn first(size: usize) -> Self {
        Self::page(0, size)
    }

    /// Zero-based page index this window starts on.
    pub fn index(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.offset / self.limit
        }
    }

    /// Number of pages needed for `total` rows.
    pub fn page_count(&self, total: usize) -> usize {
        if self.limit == 0 {
            0
        } else {
            total.div_ceil(self.limit)
        }
    }

    /// Move a window that starts past `total` back onto the last page.
    pub fn clamp(self, total: usize) -> Self {
        if self.limit == 0 || self.offset < total || self.offset == 0 {
            return self;
        }
        let last = total.saturating_sub(1) / self.limit;
        Self::page(last, self.limit)
    }

    /// Apply the window to `rows`.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.offset.min(rows.len());
        let end = start.saturating_add(self.limit).min(rows.len());
        &rows[start..end]
    }
}
